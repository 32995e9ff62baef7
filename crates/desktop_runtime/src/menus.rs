//! Transient menus (context menus, start menu, menu-bar dropdowns, submenus) and their
//! open/dismiss protocol.
//!
//! Menus never own windows and are not part of the window registry. Timing is explicit: the
//! coordinator queues [`TimerRequest`]s for the host and acts when the host reports a fired
//! [`TimerToken`] back through [`MenuCoordinator::timer_fired`].

use std::collections::BTreeMap;

use crate::{
    error::WmError,
    model::{MenuId, PointerPosition, TimerToken, Viewport, WindowId, WindowRect},
};

/// Height of a clickable menu row.
pub const MENU_ROW_HEIGHT: i32 = 22;
/// Height of a separator row.
pub const MENU_SEPARATOR_HEIGHT: i32 = 9;
/// Padding above the first and below the last row.
pub const MENU_PADDING: i32 = 3;
const MENU_CHAR_WIDTH: i32 = 7;
const MENU_WIDTH_EXTRA: i32 = 64;
const MENU_MIN_WIDTH: i32 = 150;

/// Collaborator-defined command key; the window manager never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostCommand(pub String);

impl HostCommand {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Commands the window manager executes itself against a menu's owner window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    Restore,
    Minimize,
    Maximize,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    Window(WindowCommand),
    Host(HostCommand),
}

impl From<WindowCommand> for MenuCommand {
    fn from(command: WindowCommand) -> Self {
        Self::Window(command)
    }
}

impl From<HostCommand> for MenuCommand {
    fn from(command: HostCommand) -> Self {
        Self::Host(command)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub label: String,
    pub icon: Option<String>,
    pub command: Option<MenuCommand>,
    pub children: Vec<MenuEntry>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, command: impl Into<MenuCommand>) -> Self {
        Self {
            label: label.into(),
            icon: None,
            command: Some(command.into()),
            children: Vec::new(),
        }
    }

    /// An item that opens a nested menu instead of running a command.
    pub fn submenu(label: impl Into<String>, children: Vec<MenuEntry>) -> Self {
        Self {
            label: label.into(),
            icon: None,
            command: None,
            children,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn has_submenu(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator,
}

impl MenuEntry {
    pub fn as_item(&self) -> Option<&MenuItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::Separator => None,
        }
    }

    fn height(&self) -> i32 {
        match self {
            Self::Item(_) => MENU_ROW_HEIGHT,
            Self::Separator => MENU_SEPARATOR_HEIGHT,
        }
    }
}

/// Sibling category. Opening a root menu closes other open root menus of the same kind;
/// opening a submenu closes the other submenus of the same parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Context,
    Start,
    MenuBar,
    Submenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSize {
    pub width: i32,
    pub height: i32,
}

impl MenuSize {
    /// Size a menu renders at for `items`; the renderer applies it verbatim.
    pub fn for_items(items: &[MenuEntry]) -> Self {
        let longest = items
            .iter()
            .filter_map(MenuEntry::as_item)
            .map(|item| item.label.chars().count() as i32)
            .max()
            .unwrap_or(0);
        Self {
            width: (longest * MENU_CHAR_WIDTH + MENU_WIDTH_EXTRA).max(MENU_MIN_WIDTH),
            height: items.iter().map(MenuEntry::height).sum::<i32>() + MENU_PADDING * 2,
        }
    }
}

/// Moves `origin` inward so a menu of `size` stays inside the viewport.
pub fn clamp_to_viewport(
    origin: PointerPosition,
    size: MenuSize,
    viewport: Viewport,
) -> PointerPosition {
    let mut position = origin;
    if position.x + size.width > viewport.width {
        position.x = viewport.width - size.width;
    }
    if position.y + size.height > viewport.height {
        position.y = viewport.height - size.height;
    }
    PointerPosition {
        x: position.x.max(0),
        y: position.y.max(0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// Waiting for the turn that opened the menu to finish.
    Deferred(TimerToken),
    /// Clicks outside the menu's subtree close it.
    Armed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransientMenu {
    pub id: MenuId,
    pub kind: MenuKind,
    pub anchor: WindowRect,
    pub position: PointerPosition,
    pub size: MenuSize,
    pub items: Vec<MenuEntry>,
    pub parent: Option<MenuId>,
    /// Window the menu acts on (menu-bar dropdowns, task-button menus).
    pub owner: Option<WindowId>,
    /// Index of the item (in the parent menu or menu bar) that opened this menu.
    pub trigger: Option<usize>,
    pub dismissal: Dismissal,
}

impl TransientMenu {
    pub fn rect(&self) -> WindowRect {
        WindowRect::new(
            self.position.x,
            self.position.y,
            self.size.width,
            self.size.height,
        )
    }

    /// Screen rect of the row at `index`.
    pub fn item_rect(&self, index: usize) -> Option<WindowRect> {
        let entry = self.items.get(index)?;
        let offset: i32 = self.items[..index].iter().map(MenuEntry::height).sum();
        Some(WindowRect::new(
            self.position.x,
            self.position.y + MENU_PADDING + offset,
            self.size.width,
            entry.height(),
        ))
    }

    pub fn is_armed(&self) -> bool {
        self.dismissal == Dismissal::Armed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenMenuRequest {
    pub kind: MenuKind,
    pub anchor: WindowRect,
    /// Desired top-left corner before viewport clamping.
    pub origin: PointerPosition,
    pub items: Vec<MenuEntry>,
    pub parent: Option<MenuId>,
    pub owner: Option<WindowId>,
    pub trigger: Option<usize>,
    /// Rendered size; measured from the items when absent.
    pub size: Option<MenuSize>,
}

impl OpenMenuRequest {
    /// A context menu whose top-left corner sits at the pointer.
    pub fn context(at: PointerPosition, items: Vec<MenuEntry>) -> Self {
        Self {
            kind: MenuKind::Context,
            anchor: WindowRect::new(at.x, at.y, 0, 0),
            origin: at,
            items,
            parent: None,
            owner: None,
            trigger: None,
            size: None,
        }
    }

    /// A dropdown hanging below a menu-bar item of `owner`.
    pub fn menu_bar(
        owner: WindowId,
        index: usize,
        item_rect: WindowRect,
        items: Vec<MenuEntry>,
    ) -> Self {
        Self {
            kind: MenuKind::MenuBar,
            anchor: item_rect,
            origin: PointerPosition {
                x: item_rect.x,
                y: item_rect.bottom(),
            },
            items,
            parent: None,
            owner: Some(owner),
            trigger: Some(index),
            size: None,
        }
    }

    /// The start menu, rising from the taskbar's top-left corner.
    pub fn start(viewport: Viewport, taskbar_height: i32, items: Vec<MenuEntry>) -> Self {
        let size = MenuSize::for_items(&items);
        let taskbar_top = viewport.height - taskbar_height;
        Self {
            kind: MenuKind::Start,
            anchor: WindowRect::new(0, taskbar_top, 0, taskbar_height),
            origin: PointerPosition {
                x: 0,
                y: taskbar_top - size.height,
            },
            items,
            parent: None,
            owner: None,
            trigger: None,
            size: None,
        }
    }

    pub fn owned_by(mut self, owner: WindowId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_size(mut self, size: MenuSize) -> Self {
        self.size = Some(size);
        self
    }
}

/// Where a document-level click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Menu(MenuId),
    Elsewhere,
}

/// Host timer work queued by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRequest {
    Schedule { token: TimerToken, delay_ms: u32 },
    Cancel(TimerToken),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingHover {
    token: TimerToken,
    parent: MenuId,
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuTimer {
    ArmDismissal(MenuId),
    HoverOpen,
}

/// Outcome of [`MenuCoordinator::timer_fired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    Armed(MenuId),
    SubmenuOpened(MenuId),
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuCoordinator {
    menus: Vec<TransientMenu>,
    timers: BTreeMap<TimerToken, MenuTimer>,
    pending_hover: Option<PendingHover>,
    outbox: Vec<TimerRequest>,
    submenu_offset: PointerPosition,
    next_menu_id: u64,
    next_token: u64,
}

impl MenuCoordinator {
    pub fn new(submenu_offset_x: i32, submenu_offset_y: i32) -> Self {
        Self {
            menus: Vec::new(),
            timers: BTreeMap::new(),
            pending_hover: None,
            outbox: Vec::new(),
            submenu_offset: PointerPosition {
                x: submenu_offset_x,
                y: submenu_offset_y,
            },
            next_menu_id: 1,
            next_token: 1,
        }
    }

    /// Open menus, oldest first.
    pub fn menus(&self) -> &[TransientMenu] {
        &self.menus
    }

    pub fn get(&self, menu_id: MenuId) -> Option<&TransientMenu> {
        self.menus.iter().find(|m| m.id == menu_id)
    }

    pub fn is_open(&self, menu_id: MenuId) -> bool {
        self.get(menu_id).is_some()
    }

    pub fn open_of_kind(&self, kind: MenuKind) -> Option<&TransientMenu> {
        self.menus.iter().find(|m| m.kind == kind)
    }

    /// Drains timer work for the host.
    pub fn take_timer_requests(&mut self) -> Vec<TimerRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Opens a menu, closing its siblings first, and defers outside-click dismissal to the next
    /// event-loop turn.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::MenuNotFound`] when `request.parent` is not open.
    pub fn open(
        &mut self,
        request: OpenMenuRequest,
        viewport: Viewport,
    ) -> Result<MenuId, WmError> {
        match request.parent {
            Some(parent) => {
                if !self.is_open(parent) {
                    return Err(WmError::MenuNotFound(parent));
                }
                let siblings: Vec<MenuId> = self
                    .menus
                    .iter()
                    .filter(|m| m.parent == Some(parent))
                    .map(|m| m.id)
                    .collect();
                for sibling in siblings {
                    self.close(sibling);
                }
            }
            None => {
                let siblings: Vec<MenuId> = self
                    .menus
                    .iter()
                    .filter(|m| m.parent.is_none() && m.kind == request.kind)
                    .map(|m| m.id)
                    .collect();
                for sibling in siblings {
                    self.close(sibling);
                }
            }
        }

        let size = request
            .size
            .unwrap_or_else(|| MenuSize::for_items(&request.items));
        let id = MenuId(self.next_menu_id);
        self.next_menu_id = self.next_menu_id.saturating_add(1);
        let token = self.schedule(MenuTimer::ArmDismissal(id), 0);

        self.menus.push(TransientMenu {
            id,
            kind: request.kind,
            anchor: request.anchor,
            position: clamp_to_viewport(request.origin, size, viewport),
            size,
            items: request.items,
            parent: request.parent,
            owner: request.owner,
            trigger: request.trigger,
            dismissal: Dismissal::Deferred(token),
        });
        Ok(id)
    }

    /// Opens the submenu of `parent`'s item at `index` next to that item.
    ///
    /// Returns `None` when the entry has no submenu. An already open submenu for the same item
    /// is kept.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::MenuNotFound`] when `parent` is not open.
    pub fn open_submenu(
        &mut self,
        parent: MenuId,
        index: usize,
        viewport: Viewport,
    ) -> Result<Option<MenuId>, WmError> {
        let menu = self.get(parent).ok_or(WmError::MenuNotFound(parent))?;
        let Some(item) = menu.items.get(index).and_then(MenuEntry::as_item) else {
            return Ok(None);
        };
        if !item.has_submenu() {
            return Ok(None);
        }
        if let Some(existing) = self
            .menus
            .iter()
            .find(|m| m.parent == Some(parent) && m.trigger == Some(index))
        {
            return Ok(Some(existing.id));
        }

        let Some(item_rect) = menu.item_rect(index) else {
            return Ok(None);
        };
        let request = OpenMenuRequest {
            kind: MenuKind::Submenu,
            anchor: item_rect,
            origin: PointerPosition {
                x: item_rect.right() + self.submenu_offset.x,
                y: item_rect.y + self.submenu_offset.y,
            },
            items: item.children.clone(),
            parent: Some(parent),
            owner: menu.owner,
            trigger: Some(index),
            size: None,
        };
        self.open(request, viewport).map(Some)
    }

    /// Closes a menu and, transitively, every submenu below it. Parents stay open.
    ///
    /// Returns `false` when the menu was not open.
    pub fn close(&mut self, menu_id: MenuId) -> bool {
        if !self.is_open(menu_id) {
            return false;
        }
        let mut doomed = vec![menu_id];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let current = doomed[cursor];
            doomed.extend(
                self.menus
                    .iter()
                    .filter(|m| m.parent == Some(current))
                    .map(|m| m.id),
            );
            cursor += 1;
        }

        for id in &doomed {
            if let Some(menu) = self.get(*id) {
                if let Dismissal::Deferred(token) = menu.dismissal {
                    self.cancel(token);
                }
            }
        }
        if let Some(pending) = self.pending_hover {
            if doomed.contains(&pending.parent) {
                self.pending_hover = None;
                self.cancel(pending.token);
            }
        }
        self.menus.retain(|m| !doomed.contains(&m.id));
        true
    }

    /// Closes menus acting on a window that is going away.
    pub fn close_owned_by(&mut self, window_id: WindowId) {
        let owned: Vec<MenuId> = self
            .menus
            .iter()
            .filter(|m| m.owner == Some(window_id) && m.parent.is_none())
            .map(|m| m.id)
            .collect();
        for id in owned {
            self.close(id);
        }
    }

    /// Opens or closes the start menu.
    pub fn toggle_start(
        &mut self,
        viewport: Viewport,
        taskbar_height: i32,
        items: Vec<MenuEntry>,
    ) -> Option<MenuId> {
        if let Some(open) = self.open_of_kind(MenuKind::Start).map(|m| m.id) {
            self.close(open);
            return None;
        }
        self.open(OpenMenuRequest::start(viewport, taskbar_height, items), viewport)
            .ok()
    }

    /// Routes a document-level click: every armed menu whose subtree does not contain the
    /// target closes. Menus still waiting for their deferred arm ignore the click.
    pub fn document_click(&mut self, target: ClickTarget) -> Vec<MenuId> {
        let outside: Vec<MenuId> = self
            .menus
            .iter()
            .filter(|m| m.is_armed())
            .filter(|m| match target {
                ClickTarget::Menu(hit) => !self.subtree_contains(m.id, hit),
                ClickTarget::Elsewhere => true,
            })
            .map(|m| m.id)
            .collect();

        let mut closed = Vec::new();
        for id in outside {
            if self.close(id) {
                closed.push(id);
            }
        }
        closed
    }

    /// Starts the hover debounce for `parent`'s item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::MenuNotFound`] when `parent` is not open.
    pub fn hover_enter(
        &mut self,
        parent: MenuId,
        index: usize,
        delay_ms: u32,
    ) -> Result<(), WmError> {
        let menu = self.get(parent).ok_or(WmError::MenuNotFound(parent))?;
        let opens_submenu = menu
            .items
            .get(index)
            .and_then(MenuEntry::as_item)
            .map(MenuItem::has_submenu)
            .unwrap_or(false);
        let already_open = self
            .menus
            .iter()
            .any(|m| m.parent == Some(parent) && m.trigger == Some(index));

        self.cancel_pending_hover();
        if opens_submenu && !already_open {
            let token = self.schedule(MenuTimer::HoverOpen, delay_ms);
            self.pending_hover = Some(PendingHover {
                token,
                parent,
                index,
            });
        }
        Ok(())
    }

    /// Cancels a pending hover-open if the pointer left the trigger before the delay elapsed.
    pub fn hover_leave(&mut self, parent: MenuId, index: usize) {
        if let Some(pending) = self.pending_hover {
            if pending.parent == parent && pending.index == index {
                self.cancel_pending_hover();
            }
        }
    }

    /// Handles a fired host timer.
    pub fn timer_fired(&mut self, token: TimerToken, viewport: Viewport) -> TimerOutcome {
        let Some(timer) = self.timers.remove(&token) else {
            return TimerOutcome::Stale;
        };
        match timer {
            MenuTimer::ArmDismissal(menu_id) => {
                let Some(menu) = self.menus.iter_mut().find(|m| m.id == menu_id) else {
                    return TimerOutcome::Stale;
                };
                if menu.dismissal != Dismissal::Deferred(token) {
                    return TimerOutcome::Stale;
                }
                menu.dismissal = Dismissal::Armed;
                TimerOutcome::Armed(menu_id)
            }
            MenuTimer::HoverOpen => {
                let Some(pending) = self.pending_hover.filter(|p| p.token == token) else {
                    return TimerOutcome::Stale;
                };
                self.pending_hover = None;
                match self.open_submenu(pending.parent, pending.index, viewport) {
                    Ok(Some(id)) => TimerOutcome::SubmenuOpened(id),
                    _ => TimerOutcome::Stale,
                }
            }
        }
    }

    /// Runs a menu row: items with a submenu open it, other items close the whole menu tree and
    /// hand back their command together with the menu's owner.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::MenuNotFound`] when `menu_id` is not open.
    pub fn activate_item(
        &mut self,
        menu_id: MenuId,
        index: usize,
        viewport: Viewport,
    ) -> Result<Option<(Option<WindowId>, MenuCommand)>, WmError> {
        let menu = self.get(menu_id).ok_or(WmError::MenuNotFound(menu_id))?;
        let owner = menu.owner;
        let Some(item) = menu.items.get(index).and_then(MenuEntry::as_item) else {
            return Ok(None);
        };
        if item.has_submenu() {
            self.cancel_pending_hover();
            self.open_submenu(menu_id, index, viewport)?;
            return Ok(None);
        }
        let command = item.command.clone();
        let root = self.root_of(menu_id);
        self.close(root);
        Ok(command.map(|command| (owner, command)))
    }

    fn root_of(&self, menu_id: MenuId) -> MenuId {
        let mut current = menu_id;
        while let Some(parent) = self.get(current).and_then(|m| m.parent) {
            current = parent;
        }
        current
    }

    fn subtree_contains(&self, root: MenuId, candidate: MenuId) -> bool {
        let mut current = Some(candidate);
        while let Some(id) = current {
            if id == root {
                return true;
            }
            current = self.get(id).and_then(|m| m.parent);
        }
        false
    }

    fn schedule(&mut self, timer: MenuTimer, delay_ms: u32) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token = self.next_token.saturating_add(1);
        self.timers.insert(token, timer);
        self.outbox.push(TimerRequest::Schedule { token, delay_ms });
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        if self.timers.remove(&token).is_some() {
            self.outbox.push(TimerRequest::Cancel(token));
        }
    }

    fn cancel_pending_hover(&mut self) {
        if let Some(pending) = self.pending_hover.take() {
            self.cancel(pending.token);
        }
    }
}
