//! Task buttons bound one-to-one to windows that asked for taskbar integration.

use crate::{
    error::WmError,
    menus::{MenuEntry, MenuItem, WindowCommand},
    model::{TaskButtonHandle, WindowId, WindowRecord},
};

/// Contract the owner of the task strip exposes to the window manager.
pub trait TaskStrip {
    /// Appends a button for `record` and returns its handle. Called once per created window.
    fn add_task_button(&mut self, record: &WindowRecord) -> TaskButtonHandle;
    /// Removes a button; returns `false` when the handle is unknown.
    fn remove_task_button(&mut self, handle: TaskButtonHandle) -> bool;
    /// Toggles the pressed ("active") look of a button.
    fn set_button_active(&mut self, handle: TaskButtonHandle, active: bool);
    /// Toggles the minimized look of a button.
    fn set_button_minimized(&mut self, handle: TaskButtonHandle, minimized: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskButton {
    pub handle: TaskButtonHandle,
    pub window_id: WindowId,
    pub label: String,
    pub icon: String,
    pub active: bool,
    pub minimized: bool,
}

/// What a click on a task button should do to its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarDispatch {
    Restore,
    Minimize,
    Activate,
}

impl TaskbarDispatch {
    /// Minimized windows are restored, the active window is minimized, anything else is
    /// activated.
    pub fn for_window(minimized: bool, active: bool) -> Self {
        if minimized {
            Self::Restore
        } else if active {
            Self::Minimize
        } else {
            Self::Activate
        }
    }
}

/// Context menu of a task button. Every row acts on the button's window.
pub fn task_button_menu(record: &WindowRecord) -> Vec<MenuEntry> {
    let mut entries = Vec::with_capacity(5);
    if record.is_minimized() || record.is_maximized() {
        entries.push(MenuEntry::Item(MenuItem::new("Restore", WindowCommand::Restore)));
    }
    if !record.is_minimized() {
        entries.push(MenuEntry::Item(MenuItem::new("Minimize", WindowCommand::Minimize)));
    }
    if !record.is_maximized() {
        entries.push(MenuEntry::Item(MenuItem::new("Maximize", WindowCommand::Maximize)));
    }
    entries.push(MenuEntry::Separator);
    entries.push(MenuEntry::Item(MenuItem::new("Close", WindowCommand::Close)));
    entries
}

/// A static notification-area icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrayIcon {
    pub src: &'static str,
    pub alt: &'static str,
    pub title: &'static str,
}

/// Icons shown left of the clock, in display order.
pub const TRAY_ICONS: [TrayIcon; 4] = [
    TrayIcon {
        src: "icons/loudspeaker_rays-0.png",
        alt: "Volume",
        title: "Volume",
    },
    TrayIcon {
        src: "icons/network-0.png",
        alt: "Network",
        title: "Network",
    },
    TrayIcon {
        src: "icons/modem-0.png",
        alt: "Modem",
        title: "Dial-up Connection",
    },
    TrayIcon {
        src: "icons/ac_plug-0.png",
        alt: "Power",
        title: "Power Management",
    },
];

/// Wall-clock time of day as read for the tray clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    /// 0..=23
    pub hour: u32,
    pub minute: u32,
}

impl ClockReading {
    pub fn now() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let date = js_sys::Date::new_0();
            Self {
                hour: date.get_hours(),
                minute: date.get_minutes(),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self { hour: 0, minute: 0 }
        }
    }

    /// Twelve-hour `h:mm AM|PM` label; midnight and noon read as 12.
    pub fn label(self) -> String {
        let suffix = if self.hour >= 12 { "PM" } else { "AM" };
        let hour = match self.hour % 12 {
            0 => 12,
            hour => hour,
        };
        format!("{hour}:{:02} {suffix}", self.minute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskbarBinding {
    buttons: Vec<TaskButton>,
    next_handle: u64,
}

impl TaskbarBinding {
    /// Buttons in strip order (window creation order).
    pub fn buttons(&self) -> &[TaskButton] {
        &self.buttons
    }

    pub fn button(&self, handle: TaskButtonHandle) -> Option<&TaskButton> {
        self.buttons.iter().find(|b| b.handle == handle)
    }

    /// Resolves the window a click on `handle` targets.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::TaskButtonNotFound`] for a destroyed or unknown button.
    pub fn window_for(&self, handle: TaskButtonHandle) -> Result<WindowId, WmError> {
        self.button(handle)
            .map(|b| b.window_id)
            .ok_or(WmError::TaskButtonNotFound(handle))
    }

    /// Decides what a click on `handle` does from the button's mirrored window state.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::TaskButtonNotFound`] for a destroyed or unknown button.
    pub fn click_dispatch(
        &self,
        handle: TaskButtonHandle,
    ) -> Result<(WindowId, TaskbarDispatch), WmError> {
        let button = self
            .button(handle)
            .ok_or(WmError::TaskButtonNotFound(handle))?;
        Ok((
            button.window_id,
            TaskbarDispatch::for_window(button.minimized, button.active),
        ))
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    fn button_mut(&mut self, handle: TaskButtonHandle) -> Option<&mut TaskButton> {
        self.buttons.iter_mut().find(|b| b.handle == handle)
    }
}

impl TaskStrip for TaskbarBinding {
    fn add_task_button(&mut self, record: &WindowRecord) -> TaskButtonHandle {
        self.next_handle = self.next_handle.saturating_add(1);
        let handle = TaskButtonHandle(self.next_handle);
        self.buttons.push(TaskButton {
            handle,
            window_id: record.id,
            label: record.title.clone(),
            icon: record.icon.clone(),
            active: false,
            minimized: record.is_minimized(),
        });
        handle
    }

    fn remove_task_button(&mut self, handle: TaskButtonHandle) -> bool {
        let before = self.buttons.len();
        self.buttons.retain(|b| b.handle != handle);
        self.buttons.len() != before
    }

    fn set_button_active(&mut self, handle: TaskButtonHandle, active: bool) {
        if let Some(button) = self.button_mut(handle) {
            button.active = active;
        }
    }

    fn set_button_minimized(&mut self, handle: TaskButtonHandle, minimized: bool) {
        if let Some(button) = self.button_mut(handle) {
            button.minimized = minimized;
        }
    }
}
