//! Window chrome: the frame around collaborator content, and the layer that owns it.
//!
//! Chrome parts carry stable class names so collaborators can reach inside a rendered window
//! (for example to replace the menu bar). Pointer targets are resolved to a [`ChromeTarget`]
//! rather than by querying the rendered tree.

use std::collections::BTreeMap;

use crate::{
    menus::{HostCommand, MenuEntry, MenuItem, WindowCommand},
    model::{ResizeEdge, WindowId, WindowRecord},
};

/// Class names of the rendered chrome.
pub mod class {
    pub const WINDOW: &str = "window";
    pub const TITLE_BAR: &str = "window-titlebar";
    pub const ICON: &str = "window-icon";
    pub const TITLE: &str = "window-title";
    pub const CONTROLS: &str = "window-controls";
    pub const CONTROL: &str = "window-control";
    pub const MINIMIZE: &str = "window-minimize";
    pub const MAXIMIZE: &str = "window-maximize";
    pub const CLOSE: &str = "window-close";
    pub const MENU_BAR: &str = "window-menubar";
    pub const MENU_BAR_ITEM: &str = "window-menu-item";
    pub const CONTENT: &str = "window-content";
    pub const RESIZE_HANDLE: &str = "resize-handle";
    pub const ACTIVE: &str = "active";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromePart {
    Frame,
    TitleBar,
    Icon,
    Title,
    MinimizeControl,
    MaximizeControl,
    CloseControl,
    MenuBar,
    MenuBarItem(usize),
    Content,
    ResizeHandle(ResizeEdge),
}

impl ChromePart {
    /// Class list rendered on the element for this part.
    pub fn class_name(self) -> String {
        match self {
            Self::Frame => class::WINDOW.to_string(),
            Self::TitleBar => class::TITLE_BAR.to_string(),
            Self::Icon => class::ICON.to_string(),
            Self::Title => class::TITLE.to_string(),
            Self::MinimizeControl => format!("{} {}", class::CONTROL, class::MINIMIZE),
            Self::MaximizeControl => format!("{} {}", class::CONTROL, class::MAXIMIZE),
            Self::CloseControl => format!("{} {}", class::CONTROL, class::CLOSE),
            Self::MenuBar => class::MENU_BAR.to_string(),
            Self::MenuBarItem(_) => class::MENU_BAR_ITEM.to_string(),
            Self::Content => class::CONTENT.to_string(),
            Self::ResizeHandle(edge) => format!(
                "{} {}-{}",
                class::RESIZE_HANDLE,
                class::RESIZE_HANDLE,
                edge.suffix()
            ),
        }
    }

    /// Controls and menu-bar items sit on the title bar area but never start a drag.
    pub fn blocks_drag(self) -> bool {
        matches!(
            self,
            Self::MinimizeControl
                | Self::MaximizeControl
                | Self::CloseControl
                | Self::MenuBar
                | Self::MenuBarItem(_)
        )
    }

    /// Parts that move the window when pressed.
    pub fn is_drag_handle(self) -> bool {
        matches!(self, Self::TitleBar | Self::Icon | Self::Title)
    }
}

/// A pointer target inside some window's chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChromeTarget {
    pub window_id: WindowId,
    pub part: ChromePart,
}

impl ChromeTarget {
    pub fn new(window_id: WindowId, part: ChromePart) -> Self {
        Self { window_id, part }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaximizeGlyph {
    Maximize,
    Restore,
}

impl MaximizeGlyph {
    pub fn icon_src(self) -> &'static str {
        match self {
            Self::Maximize => "icons/maximize.svg",
            Self::Restore => "icons/restore.svg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Maximize => "Maximize",
            Self::Restore => "Restore",
        }
    }
}

/// One top-level entry of a window menu bar and the dropdown it opens.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuBarEntry {
    pub label: String,
    pub items: Vec<MenuEntry>,
}

impl MenuBarEntry {
    pub fn new(label: impl Into<String>, items: Vec<MenuEntry>) -> Self {
        Self {
            label: label.into(),
            items,
        }
    }
}

/// File/Edit/View/Help bar used by windows that ask for a menu bar.
pub fn default_menu_bar() -> Vec<MenuBarEntry> {
    let host = |label: &str, key: &str| {
        MenuEntry::Item(MenuItem::new(label, HostCommand::new(key)))
    };
    vec![
        MenuBarEntry::new(
            "File",
            vec![
                host("Properties", "file.properties"),
                MenuEntry::Separator,
                MenuEntry::Item(MenuItem::new("Close", WindowCommand::Close)),
            ],
        ),
        MenuBarEntry::new(
            "Edit",
            vec![
                host("Undo", "edit.undo"),
                MenuEntry::Separator,
                host("Cut", "edit.cut"),
                host("Copy", "edit.copy"),
                host("Paste", "edit.paste"),
                MenuEntry::Separator,
                host("Select All", "edit.select-all"),
            ],
        ),
        MenuBarEntry::new(
            "View",
            vec![
                host("Large Icons", "view.large-icons"),
                host("Small Icons", "view.small-icons"),
                host("List", "view.list"),
                host("Details", "view.details"),
                MenuEntry::Separator,
                host("Refresh", "view.refresh"),
            ],
        ),
        MenuBarEntry::new("Help", vec![host("About", "help.about")]),
    ]
}

/// Visual state of one window's frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowChrome {
    pub window_id: WindowId,
    pub title: String,
    pub icon: String,
    pub active: bool,
    pub hidden: bool,
    pub maximize_glyph: MaximizeGlyph,
    pub menu_bar: Option<Vec<MenuBarEntry>>,
}

impl WindowChrome {
    /// Builds inactive, visible chrome for a freshly registered record.
    pub fn for_record(record: &WindowRecord) -> Self {
        Self {
            window_id: record.id,
            title: record.title.clone(),
            icon: record.icon.clone(),
            active: false,
            hidden: false,
            maximize_glyph: MaximizeGlyph::Maximize,
            menu_bar: record.has_menu_bar.then(default_menu_bar),
        }
    }

    pub fn menu_bar_entry(&self, index: usize) -> Option<&MenuBarEntry> {
        self.menu_bar.as_ref()?.get(index)
    }

    /// The eight resize affordances, rendered in a fixed order.
    pub fn resize_handles(&self) -> [ChromePart; 8] {
        ResizeEdge::ALL.map(ChromePart::ResizeHandle)
    }
}

/// The rendered chrome of every live window, keyed by window id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChromeLayer {
    chromes: BTreeMap<WindowId, WindowChrome>,
}

impl ChromeLayer {
    pub fn mount(&mut self, chrome: WindowChrome) {
        self.chromes.insert(chrome.window_id, chrome);
    }

    pub fn unmount(&mut self, window_id: WindowId) -> Option<WindowChrome> {
        self.chromes.remove(&window_id)
    }

    pub fn get(&self, window_id: WindowId) -> Option<&WindowChrome> {
        self.chromes.get(&window_id)
    }

    pub fn get_mut(&mut self, window_id: WindowId) -> Option<&mut WindowChrome> {
        self.chromes.get_mut(&window_id)
    }

    pub fn contains(&self, window_id: WindowId) -> bool {
        self.chromes.contains_key(&window_id)
    }

    pub fn len(&self) -> usize {
        self.chromes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromes.is_empty()
    }
}
