//! Error type shared by the window manager core.

use thiserror::Error;

use crate::model::{MenuId, TaskButtonHandle, WindowId};

#[derive(Debug, Error)]
/// Failures reported by window manager operations.
///
/// None of these are fatal: the runtime dispatcher logs them and leaves state untouched.
pub enum WmError {
    /// The target window is not (or no longer) registered.
    #[error("window {0} not found")]
    WindowNotFound(WindowId),
    /// The task button is not (or no longer) on the task strip.
    #[error("task button {0:?} not found")]
    TaskButtonNotFound(TaskButtonHandle),
    /// The menu is not (or no longer) open.
    #[error("menu {0:?} not found")]
    MenuNotFound(MenuId),
    /// A drag or resize session already owns the pointer.
    #[error("a pointer session is already active")]
    SessionActive,
    /// A configuration value is out of range.
    #[error("invalid window manager config: {0}")]
    InvalidConfig(String),
    /// Configuration JSON could not be parsed.
    #[error("window manager config parse failed: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
