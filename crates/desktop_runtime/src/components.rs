//! Desktop shell UI composition: desktop surface, window layer, menu layer and taskbar.

mod menus;
mod taskbar;
mod window;

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use leptos::*;

use self::{menus::MenuLayer, taskbar::Taskbar, window::DesktopWindow};
use crate::{
    menus::{ClickTarget, HostCommand, MenuEntry, MenuItem},
    model::{ContentHandle, MenuId, PointerPosition, WindowId},
    reducer::DesktopAction,
};

pub use crate::runtime_context::{
    use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, HostCommandEvent,
    HostCommandHandler,
};

/// Attribute carried by every rendered menu so document clicks can be attributed to it.
pub const MENU_ID_ATTRIBUTE: &str = "data-menu-id";
/// Attribute carried by every rendered window frame.
pub const WINDOW_ID_ATTRIBUTE: &str = "data-window-id";

type ContentBuilder = Rc<dyn Fn(WindowId) -> View>;

#[derive(Clone, Default)]
/// Collaborator-supplied builders that turn a [`ContentHandle`] into window content.
pub struct ContentRegistry {
    builders: Rc<RefCell<HashMap<ContentHandle, ContentBuilder>>>,
}

impl ContentRegistry {
    pub fn register<F, V>(&self, handle: ContentHandle, build: F)
    where
        F: Fn(WindowId) -> V + 'static,
        V: IntoView,
    {
        self.builders
            .borrow_mut()
            .insert(handle, Rc::new(move |window_id| build(window_id).into_view()));
    }

    /// Builds the content for `handle`; unknown handles render nothing.
    pub fn render(&self, handle: ContentHandle, window_id: WindowId) -> View {
        let builder = self.builders.borrow().get(&handle).cloned();
        match builder {
            Some(build) => build(window_id),
            None => {
                logging::warn!("no content registered for {handle:?}");
                ().into_view()
            }
        }
    }
}

/// Right-click menu of the desktop background.
pub fn desktop_menu_items() -> Vec<MenuEntry> {
    let host = |label: &str, key: &str| {
        MenuEntry::Item(MenuItem::new(label, HostCommand::new(key)))
    };
    vec![
        MenuEntry::Item(MenuItem::submenu(
            "Arrange Icons",
            vec![
                host("by Name", "desktop.arrange.name"),
                host("by Type", "desktop.arrange.type"),
                host("by Size", "desktop.arrange.size"),
                host("by Date", "desktop.arrange.date"),
            ],
        )),
        host("Line up Icons", "desktop.line-up"),
        MenuEntry::Separator,
        host("Paste", "desktop.paste"),
        MenuEntry::Separator,
        MenuEntry::Item(MenuItem::submenu(
            "New",
            vec![
                host("Folder", "desktop.new.folder"),
                host("Text Document", "desktop.new.text"),
            ],
        )),
        MenuEntry::Separator,
        host("Properties", "desktop.properties"),
    ]
}

#[component]
/// Renders the desktop shell. `start_menu` is the tree shown by the start button.
pub fn DesktopShell(
    #[prop(optional)] start_menu: Vec<MenuEntry>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let start_menu = store_value(start_menu);

    let resize_listener = window_event_listener(ev::resize, move |_| {
        runtime.dispatch_action(DesktopAction::SetViewport {
            viewport: crate::host::current_viewport(),
        });
    });
    on_cleanup(move || resize_listener.remove());

    // Registered on the window so it runs after every element handler of the same click.
    let document_click = window_event_listener(ev::click, move |ev| {
        let target = click_target(&ev);
        if runtime.wm.with_untracked(|wm| !wm.menus().menus().is_empty()) {
            runtime.dispatch_action(DesktopAction::DocumentClick { target });
        }
    });
    on_cleanup(move || document_click.remove());

    let window_ids = move || runtime.wm.with(|wm| wm.window_ids());

    view! {
        <div class="desktop-shell">
            <div
                class="desktop"
                on:contextmenu=move |ev: web_sys::MouseEvent| {
                    ev.prevent_default();
                    runtime.dispatch_action(DesktopAction::OpenContextMenu {
                        pointer: pointer_from_mouse_event(&ev),
                        items: desktop_menu_items(),
                    });
                }
            >
                {children.map(|children| children())}
                <For each=window_ids key=|id| id.0 let:window_id>
                    <DesktopWindow window_id=window_id />
                </For>
            </div>
            <Taskbar start_menu=start_menu />
            <MenuLayer />
        </div>
    }
}

pub(crate) fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

pub(crate) fn pointer_from_mouse_event(ev: &web_sys::MouseEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

/// Resolves the menu (if any) under a click.
fn click_target(ev: &web_sys::MouseEvent) -> ClickTarget {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        let menu_id = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            .and_then(|element| element.closest(&format!("[{MENU_ID_ATTRIBUTE}]")).ok().flatten())
            .and_then(|menu| menu.get_attribute(MENU_ID_ATTRIBUTE))
            .and_then(|raw| raw.parse::<u64>().ok());
        if let Some(id) = menu_id {
            return ClickTarget::Menu(MenuId(id));
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = ev;

    ClickTarget::Elsewhere
}
