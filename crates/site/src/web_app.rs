use desktop_runtime::{
    ContentHandle, ContentRegistry, DesktopAction, DesktopProvider, DesktopShell,
    HostCommand, HostCommandEvent, HostCommandHandler, MenuEntry, MenuItem, OpenWindowRequest,
};
use leptos::*;
use leptos_meta::*;

const WELCOME: ContentHandle = ContentHandle(1);
const NOTEPAD: ContentHandle = ContentHandle(2);
const MY_COMPUTER: ContentHandle = ContentHandle(3);

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Retro Desktop" />
        <Meta name="description" content="A Windows 98 style desktop running in the browser." />

        <main class="site-root">
            <DesktopEntry />
        </main>
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    let content = demo_content();
    let on_host_command = HostCommandHandler::new(handle_host_command);

    view! {
        <DesktopProvider content=content on_host_command=on_host_command>
            <DesktopShell start_menu=start_menu_items()>
                <BootWindows />
            </DesktopShell>
        </DesktopProvider>
    }
}

/// Opens the welcome window once the shell is mounted.
#[component]
fn BootWindows() -> impl IntoView {
    let runtime = desktop_runtime::use_desktop_runtime();
    runtime.dispatch_action(DesktopAction::OpenWindow(welcome_window()));
}

fn demo_content() -> ContentRegistry {
    let content = ContentRegistry::default();
    content.register(WELCOME, |_| {
        view! {
            <div class="welcome">
                <h1>"Welcome"</h1>
                <p>
                    "Drag windows by their title bar and resize them from any edge. "
                    "Right-click the desktop or a taskbar button for menus."
                </p>
            </div>
        }
    });
    content.register(NOTEPAD, |window_id| {
        view! {
            <textarea
                class="notepad"
                spellcheck="false"
                data-owner=window_id.0.to_string()
            ></textarea>
        }
    });
    content.register(MY_COMPUTER, |_| {
        view! {
            <ul class="drive-list">
                <li>"3½ Floppy (A:)"</li>
                <li>"Local Disk (C:)"</li>
                <li>"CD-ROM (D:)"</li>
            </ul>
        }
    });
    content
}

fn welcome_window() -> OpenWindowRequest {
    OpenWindowRequest::new("Welcome", WELCOME, 420, 260)
        .at(60, 40)
        .with_menu_bar(false)
        .with_icon("icons/help_book_big-0.png")
}

fn launch_request(command: &str) -> Option<OpenWindowRequest> {
    match command {
        "launch.notepad" | "desktop.new.text" => Some(
            OpenWindowRequest::new("Untitled - Notepad", NOTEPAD, 480, 320)
                .with_icon("icons/notepad-0.png"),
        ),
        "launch.my-computer" => Some(
            OpenWindowRequest::new("My Computer", MY_COMPUTER, 360, 280)
                .with_icon("icons/computer_explorer-0.png"),
        ),
        "launch.welcome" => Some(welcome_window()),
        _ => None,
    }
}

fn handle_host_command(event: HostCommandEvent) {
    let command = event.command.as_str();
    match launch_request(command) {
        Some(request) => event
            .runtime
            .dispatch_action(DesktopAction::OpenWindow(request)),
        None => logging::log!(
            "host command `{command}` from {:?} has no handler",
            event.window
        ),
    }
}

fn start_menu_items() -> Vec<MenuEntry> {
    let launch = |label: &str, key: &str| {
        MenuEntry::Item(MenuItem::new(label, HostCommand::new(key)))
    };
    vec![
        MenuEntry::Item(MenuItem::submenu(
            "Programs",
            vec![
                MenuEntry::Item(MenuItem::submenu(
                    "Accessories",
                    vec![launch("Notepad", "launch.notepad")],
                )),
                launch("My Computer", "launch.my-computer"),
            ],
        )),
        launch("Help", "launch.welcome"),
        MenuEntry::Separator,
        launch("Shut Down...", "session.shut-down"),
    ]
}
