pub mod chrome;
pub mod components;
pub mod config;
mod effect_executor;
pub mod error;
pub mod geometry;
pub mod host;
pub mod menus;
pub mod model;
pub mod placement;
pub mod reducer;
pub mod registry;
mod runtime_context;
pub mod taskbar;
pub mod window_manager;

pub use components::{
    desktop_menu_items, use_desktop_runtime, ContentRegistry, DesktopProvider,
    DesktopRuntimeContext, DesktopShell, HostCommandEvent, HostCommandHandler,
};
pub use config::WmConfig;
pub use error::WmError;
pub use menus::{HostCommand, MenuEntry, MenuItem, WindowCommand};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, RuntimeEffect};
pub use window_manager::WindowManager;
