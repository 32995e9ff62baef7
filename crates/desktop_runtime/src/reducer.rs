//! Reducer actions, side-effect intents, and the transition entry point for the desktop runtime.

use leptos::logging;

use crate::{
    chrome::ChromeTarget,
    error::WmError,
    menus::{ClickTarget, HostCommand, MenuEntry, TimerOutcome, TimerRequest},
    model::{
        MenuId, OpenWindowRequest, PointerButton, PointerPosition, TaskButtonHandle, TimerToken,
        Viewport, WindowId, WindowRect,
    },
    window_manager::WindowManager,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`].
pub enum DesktopAction {
    /// Create a window and activate it.
    OpenWindow(OpenWindowRequest),
    CloseWindow {
        window_id: WindowId,
    },
    ActivateWindow {
        window_id: WindowId,
    },
    MinimizeWindow {
        window_id: WindowId,
    },
    /// Bring a minimized window back and activate it.
    RestoreWindow {
        window_id: WindowId,
    },
    MaximizeWindow {
        window_id: WindowId,
    },
    /// Leave the maximized state, returning to the saved bounds.
    RestoreWindowSize {
        window_id: WindowId,
    },
    ToggleMaximize {
        window_id: WindowId,
    },
    /// Pointer pressed on a window's chrome.
    ChromePointerDown {
        target: ChromeTarget,
        pointer: PointerPosition,
        button: PointerButton,
    },
    /// Completed click on a window's chrome.
    ChromeClick {
        target: ChromeTarget,
    },
    ChromeDoubleClick {
        target: ChromeTarget,
    },
    /// Pointer moved while a drag or resize session is installed.
    PointerMove {
        pointer: PointerPosition,
    },
    /// Pointer released while a drag or resize session is installed.
    PointerUp,
    TaskButtonClick {
        handle: TaskButtonHandle,
    },
    TaskButtonContextMenu {
        handle: TaskButtonHandle,
        pointer: PointerPosition,
    },
    /// Menu-bar item clicked; `item_rect` is the item's screen rect.
    OpenMenuBar {
        window_id: WindowId,
        index: usize,
        item_rect: WindowRect,
    },
    OpenContextMenu {
        pointer: PointerPosition,
        items: Vec<MenuEntry>,
    },
    ToggleStartMenu {
        items: Vec<MenuEntry>,
    },
    MenuItemActivated {
        menu_id: MenuId,
        index: usize,
    },
    MenuHoverEnter {
        menu_id: MenuId,
        index: usize,
    },
    MenuHoverLeave {
        menu_id: MenuId,
        index: usize,
    },
    /// Click anywhere in the document, reported after the target's own handler ran.
    DocumentClick {
        target: ClickTarget,
    },
    /// A timer scheduled through [`RuntimeEffect::ScheduleTimer`] elapsed.
    TimerFired {
        token: TimerToken,
    },
    SetViewport {
        viewport: Viewport,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// Call back with [`DesktopAction::TimerFired`] after `delay_ms`.
    ScheduleTimer { token: TimerToken, delay_ms: u32 },
    /// Drop a scheduled timer; a late fire is ignored anyway.
    CancelTimer(TimerToken),
    /// Start forwarding window-level pointer move/up events.
    InstallPointerSession,
    /// Stop forwarding window-level pointer events.
    ReleasePointerSession,
    /// Hand a menu command to the collaborator that owns it.
    RunHostCommand {
        window: Option<WindowId>,
        command: HostCommand,
    },
    /// Move focus into the newly activated window's primary input.
    FocusWindowInput(WindowId),
}

/// Applies a [`DesktopAction`] to the window manager and collects resulting side effects.
///
/// # Errors
///
/// Returns the [`WmError`] of the failed operation. Failures are checked before anything is
/// mutated, so state is left as it was.
pub fn reduce_desktop(
    wm: &mut WindowManager,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, WmError> {
    let was_captured = wm.interaction().is_captured();
    let mut effects = Vec::new();

    match action {
        DesktopAction::OpenWindow(request) => {
            let window_id = wm.create(request);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CloseWindow { window_id } => wm.close(window_id)?,
        DesktopAction::ActivateWindow { window_id } => {
            wm.activate(window_id)?;
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MinimizeWindow { window_id } => wm.minimize(window_id)?,
        DesktopAction::RestoreWindow { window_id } => {
            wm.restore(window_id)?;
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MaximizeWindow { window_id } => wm.maximize(window_id)?,
        DesktopAction::RestoreWindowSize { window_id } => wm.restore_size(window_id)?,
        DesktopAction::ToggleMaximize { window_id } => wm.toggle_maximize(window_id)?,
        DesktopAction::ChromePointerDown {
            target,
            pointer,
            button,
        } => match wm.pointer_down(target, pointer, button) {
            // A second press during a drag or resize is dropped.
            Err(WmError::SessionActive) => {}
            result => result?,
        },
        DesktopAction::ChromeClick { target } => wm.click(target)?,
        DesktopAction::ChromeDoubleClick { target } => wm.double_click(target)?,
        DesktopAction::PointerMove { pointer } => {
            wm.pointer_move(pointer);
        }
        DesktopAction::PointerUp => {
            wm.pointer_up();
        }
        DesktopAction::TaskButtonClick { handle } => {
            wm.click_task_button(handle)?;
            if let Some(window_id) = wm.active_window() {
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::TaskButtonContextMenu { handle, pointer } => {
            wm.open_task_button_menu(handle, pointer)?;
        }
        DesktopAction::OpenMenuBar {
            window_id,
            index,
            item_rect,
        } => {
            wm.open_menu_bar(window_id, index, item_rect)?;
        }
        DesktopAction::OpenContextMenu { pointer, items } => {
            wm.open_context_menu(pointer, items)?;
        }
        DesktopAction::ToggleStartMenu { items } => {
            wm.toggle_start_menu(items);
        }
        DesktopAction::MenuItemActivated { menu_id, index } => {
            if let Some((window, command)) = wm.activate_menu_item(menu_id, index)? {
                effects.push(RuntimeEffect::RunHostCommand { window, command });
            }
        }
        DesktopAction::MenuHoverEnter { menu_id, index } => wm.menu_hover_enter(menu_id, index)?,
        DesktopAction::MenuHoverLeave { menu_id, index } => wm.menu_hover_leave(menu_id, index),
        DesktopAction::DocumentClick { target } => {
            wm.document_click(target);
        }
        DesktopAction::TimerFired { token } => {
            if wm.timer_fired(token) == TimerOutcome::Stale {
                logging::log!("ignoring stale timer {token:?}");
            }
        }
        DesktopAction::SetViewport { viewport } => wm.set_viewport(viewport),
    }

    effects.extend(
        wm.take_timer_requests()
            .into_iter()
            .map(|request| match request {
                TimerRequest::Schedule { token, delay_ms } => {
                    RuntimeEffect::ScheduleTimer { token, delay_ms }
                }
                TimerRequest::Cancel(token) => RuntimeEffect::CancelTimer(token),
            }),
    );
    match (was_captured, wm.interaction().is_captured()) {
        (false, true) => effects.push(RuntimeEffect::InstallPointerSession),
        (true, false) => effects.push(RuntimeEffect::ReleasePointerSession),
        _ => {}
    }
    Ok(effects)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        chrome::ChromePart,
        config::WmConfig,
        menus::MenuItem,
        model::{ContentHandle, ResizeEdge, WindowState},
    };

    fn manager() -> WindowManager {
        WindowManager::new(
            WmConfig {
                placement_seed: Some(3),
                ..WmConfig::default()
            },
            Viewport {
                width: 800,
                height: 600,
            },
        )
    }

    fn open(wm: &mut WindowManager, x: i32, y: i32) -> WindowId {
        reduce_desktop(
            wm,
            DesktopAction::OpenWindow(
                OpenWindowRequest::new("Notepad", ContentHandle(1), 300, 200).at(x, y),
            ),
        )
        .expect("open window");
        wm.active_window().expect("new window is active")
    }

    fn schedule_token(effects: &[RuntimeEffect], delay: u32) -> TimerToken {
        effects
            .iter()
            .find_map(|effect| match effect {
                RuntimeEffect::ScheduleTimer { token, delay_ms } if *delay_ms == delay => {
                    Some(*token)
                }
                _ => None,
            })
            .expect("scheduled timer")
    }

    fn at(x: i32, y: i32) -> PointerPosition {
        PointerPosition { x, y }
    }

    #[test]
    fn open_window_requests_input_focus() {
        let mut wm = manager();
        let effects = reduce_desktop(
            &mut wm,
            DesktopAction::OpenWindow(OpenWindowRequest::new("A", ContentHandle(1), 300, 200)),
        )
        .unwrap();

        let id = wm.active_window().unwrap();
        assert_eq!(effects, vec![RuntimeEffect::FocusWindowInput(id)]);
    }

    #[test]
    fn drag_installs_and_releases_exactly_one_pointer_session() {
        let mut wm = manager();
        let id = open(&mut wm, 100, 100);
        let target = ChromeTarget::new(id, ChromePart::TitleBar);

        let down = reduce_desktop(
            &mut wm,
            DesktopAction::ChromePointerDown {
                target,
                pointer: at(120, 105),
                button: PointerButton::Primary,
            },
        )
        .unwrap();
        assert_eq!(down, vec![RuntimeEffect::InstallPointerSession]);

        let moved =
            reduce_desktop(&mut wm, DesktopAction::PointerMove { pointer: at(140, 125) }).unwrap();
        assert!(moved.is_empty());

        let up = reduce_desktop(&mut wm, DesktopAction::PointerUp).unwrap();
        assert_eq!(up, vec![RuntimeEffect::ReleasePointerSession]);
        assert_eq!(wm.window(id).unwrap().bounds, WindowRect::new(120, 120, 300, 200));
    }

    #[test]
    fn press_during_drag_is_dropped_without_error() {
        let mut wm = manager();
        let first = open(&mut wm, 0, 0);
        let second = open(&mut wm, 100, 100);
        reduce_desktop(
            &mut wm,
            DesktopAction::ChromePointerDown {
                target: ChromeTarget::new(second, ChromePart::TitleBar),
                pointer: at(120, 105),
                button: PointerButton::Primary,
            },
        )
        .unwrap();
        let z_before = wm.window(first).unwrap().z_order;

        let effects = reduce_desktop(
            &mut wm,
            DesktopAction::ChromePointerDown {
                target: ChromeTarget::new(first, ChromePart::TitleBar),
                pointer: at(10, 5),
                button: PointerButton::Primary,
            },
        )
        .expect("second press is not an error");

        assert!(effects.is_empty());
        assert_eq!(wm.active_window(), Some(second));
        assert_eq!(wm.window(first).unwrap().z_order, z_before);
        assert!(wm.interaction().is_captured());
    }

    #[test]
    fn closing_during_resize_releases_the_session() {
        let mut wm = manager();
        let id = open(&mut wm, 100, 100);
        reduce_desktop(
            &mut wm,
            DesktopAction::ChromePointerDown {
                target: ChromeTarget::new(id, ChromePart::ResizeHandle(ResizeEdge::SouthEast)),
                pointer: at(400, 300),
                button: PointerButton::Primary,
            },
        )
        .unwrap();

        let effects =
            reduce_desktop(&mut wm, DesktopAction::CloseWindow { window_id: id }).unwrap();

        assert!(effects.contains(&RuntimeEffect::ReleasePointerSession));
    }

    #[test]
    fn unknown_window_is_an_error_and_changes_nothing() {
        let mut wm = manager();
        let id = open(&mut wm, 0, 0);

        let err = reduce_desktop(
            &mut wm,
            DesktopAction::MinimizeWindow {
                window_id: WindowId(999),
            },
        )
        .unwrap_err();

        assert!(matches!(err, WmError::WindowNotFound(WindowId(999))));
        assert_eq!(wm.active_window(), Some(id));
        assert_eq!(wm.window(id).unwrap().state, WindowState::Normal);
    }

    #[test]
    fn context_menu_arms_on_zero_delay_timer() {
        let mut wm = manager();
        let items = vec![MenuEntry::Item(MenuItem::new(
            "Arrange Icons",
            HostCommand::new("desktop.arrange-icons"),
        ))];

        let effects = reduce_desktop(
            &mut wm,
            DesktopAction::OpenContextMenu {
                pointer: at(10, 10),
                items,
            },
        )
        .unwrap();
        let token = schedule_token(&effects, 0);

        reduce_desktop(
            &mut wm,
            DesktopAction::DocumentClick {
                target: ClickTarget::Elsewhere,
            },
        )
        .unwrap();
        assert_eq!(wm.menus().menus().len(), 1);

        reduce_desktop(&mut wm, DesktopAction::TimerFired { token }).unwrap();
        reduce_desktop(
            &mut wm,
            DesktopAction::DocumentClick {
                target: ClickTarget::Elsewhere,
            },
        )
        .unwrap();
        assert!(wm.menus().menus().is_empty());
    }

    #[test]
    fn host_command_is_surfaced_with_owner() {
        let mut wm = manager();
        let id = open(&mut wm, 0, 0);
        reduce_desktop(
            &mut wm,
            DesktopAction::OpenMenuBar {
                window_id: id,
                index: 3,
                item_rect: WindowRect::new(120, 40, 40, 18),
            },
        )
        .unwrap();
        let menu_id = wm.menus().menus()[0].id;

        let effects = reduce_desktop(
            &mut wm,
            DesktopAction::MenuItemActivated { menu_id, index: 0 },
        )
        .unwrap();

        assert!(effects.contains(&RuntimeEffect::RunHostCommand {
            window: Some(id),
            command: HostCommand::new("help.about"),
        }));
        assert!(effects
            .iter()
            .any(|effect| matches!(effect, RuntimeEffect::CancelTimer(_))));
    }

    #[test]
    fn start_menu_submenu_opens_after_hover_delay() {
        let mut wm = manager();
        let items = vec![MenuEntry::Item(MenuItem::submenu(
            "Programs",
            vec![MenuEntry::Item(MenuItem::new(
                "Notepad",
                HostCommand::new("launch.notepad"),
            ))],
        ))];
        reduce_desktop(&mut wm, DesktopAction::ToggleStartMenu { items }).unwrap();
        let start = wm.menus().menus()[0].id;

        let effects = reduce_desktop(
            &mut wm,
            DesktopAction::MenuHoverEnter {
                menu_id: start,
                index: 0,
            },
        )
        .unwrap();
        let token = schedule_token(&effects, 300);
        assert_eq!(wm.menus().menus().len(), 1);

        let effects = reduce_desktop(&mut wm, DesktopAction::TimerFired { token }).unwrap();
        assert_eq!(wm.menus().menus().len(), 2);
        schedule_token(&effects, 0);
    }

    #[test]
    fn task_button_click_cycles_minimize_and_restore() {
        let mut wm = manager();
        let id = open(&mut wm, 0, 0);
        let handle = wm.window(id).unwrap().task_button.unwrap();

        reduce_desktop(&mut wm, DesktopAction::TaskButtonClick { handle }).unwrap();
        assert!(wm.window(id).unwrap().is_minimized());

        let effects = reduce_desktop(&mut wm, DesktopAction::TaskButtonClick { handle }).unwrap();
        assert_eq!(effects, vec![RuntimeEffect::FocusWindowInput(id)]);
        assert_eq!(wm.active_window(), Some(id));
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut wm = manager();
        let effects =
            reduce_desktop(&mut wm, DesktopAction::TimerFired { token: TimerToken(77) }).unwrap();
        assert!(effects.is_empty());
    }
}
