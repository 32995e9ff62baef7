//! Window lifecycle: creation, activation, minimize/maximize/restore, close, and routing of
//! chrome pointer input.
//!
//! [`WindowManager`] is the single owner of window-manager state. Records, chrome, task buttons,
//! the pointer session and open menus are only mutated through it.

use leptos::logging;

use crate::{
    chrome::{ChromeLayer, ChromePart, ChromeTarget, MaximizeGlyph, WindowChrome},
    config::WmConfig,
    error::WmError,
    geometry::{InteractionState, PointerSession},
    menus::{
        ClickTarget, HostCommand, MenuCommand, MenuCoordinator, MenuEntry, OpenMenuRequest,
        TimerOutcome, TimerRequest, WindowCommand,
    },
    model::{
        MenuId, OpenWindowRequest, PointerButton, PointerPosition, TaskButtonHandle, TimerToken,
        Viewport, WindowId, WindowRecord, WindowRect, WindowState,
    },
    placement::Placement,
    registry::WindowRegistry,
    taskbar::{task_button_menu, TaskStrip, TaskbarBinding, TaskbarDispatch},
};

const DEFAULT_PLACEMENT_SEED: u64 = 0x5eed_0098;

#[derive(Debug, Clone)]
pub struct WindowManager {
    config: WmConfig,
    viewport: Viewport,
    registry: WindowRegistry,
    chrome: ChromeLayer,
    taskbar: TaskbarBinding,
    interaction: InteractionState,
    menus: MenuCoordinator,
    placement: Placement,
    active: Option<WindowId>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(WmConfig::default(), Viewport::default())
    }
}

impl WindowManager {
    pub fn new(config: WmConfig, viewport: Viewport) -> Self {
        let seed = config.placement_seed.unwrap_or(DEFAULT_PLACEMENT_SEED);
        Self {
            registry: WindowRegistry::new(config.z_index_base),
            menus: MenuCoordinator::new(config.submenu_offset_x, config.submenu_offset_y),
            placement: Placement::seeded(seed),
            chrome: ChromeLayer::default(),
            taskbar: TaskbarBinding::default(),
            interaction: InteractionState::default(),
            active: None,
            viewport,
            config,
        }
    }

    pub fn config(&self) -> &WmConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn active_window(&self) -> Option<WindowId> {
        self.active
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.registry.get(window_id)
    }

    /// Live records in creation order.
    pub fn windows(&self) -> impl Iterator<Item = &WindowRecord> {
        self.registry.iter()
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.registry.iter().map(|w| w.id).collect()
    }

    /// Window ids from bottom to top.
    pub fn stacking_order(&self) -> Vec<WindowId> {
        self.registry.stacking_order()
    }

    pub fn chrome(&self) -> &ChromeLayer {
        &self.chrome
    }

    pub fn taskbar(&self) -> &TaskbarBinding {
        &self.taskbar
    }

    pub fn menus(&self) -> &MenuCoordinator {
        &self.menus
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Creates a window and makes it the active one.
    pub fn create(&mut self, request: OpenWindowRequest) -> WindowId {
        let w = request.width.max(self.config.min_window_width);
        let h = request.height.max(self.config.min_window_height);
        let origin = request.position.unwrap_or_else(|| {
            self.placement.next_position(
                w,
                h,
                self.viewport,
                self.config.placement_bottom_margin,
            )
        });

        let id = self.registry.next_window_id();
        let mut record = WindowRecord {
            id,
            title: request.title,
            content: request.content,
            icon: request
                .icon
                .unwrap_or_else(|| self.config.default_icon.clone()),
            bounds: WindowRect::new(origin.x, origin.y, w, h),
            z_order: 0,
            state: WindowState::Normal,
            saved_bounds: None,
            task_button: None,
            has_menu_bar: request.has_menu_bar,
        };

        self.chrome.mount(WindowChrome::for_record(&record));
        if request.task_button {
            record.task_button = Some(self.taskbar.add_task_button(&record));
        }
        self.registry.register(record);
        self.raise(id);
        id
    }

    /// Makes `window_id` the single active window and brings it to the top of the stack.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::WindowNotFound`] for an unknown window.
    pub fn activate(&mut self, window_id: WindowId) -> Result<(), WmError> {
        self.require(window_id)?;
        self.raise(window_id);
        Ok(())
    }

    /// Hides a window and drops it from the active slot. No other window is activated.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::WindowNotFound`] for an unknown window.
    pub fn minimize(&mut self, window_id: WindowId) -> Result<(), WmError> {
        let record = self
            .registry
            .get_mut(window_id)
            .ok_or(WmError::WindowNotFound(window_id))?;
        if record.is_minimized() {
            return Ok(());
        }
        record.state = WindowState::Minimized;
        let task_button = record.task_button;

        self.update_chrome(window_id, |chrome| {
            chrome.hidden = true;
            chrome.active = false;
        });
        if let Some(handle) = task_button {
            self.taskbar.set_button_active(handle, false);
            self.taskbar.set_button_minimized(handle, true);
        }
        if self.active == Some(window_id) {
            self.active = None;
        }
        Ok(())
    }

    /// Brings a minimized window back (to its maximized fill when it was maximized) and
    /// activates it.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::WindowNotFound`] for an unknown window.
    pub fn restore(&mut self, window_id: WindowId) -> Result<(), WmError> {
        self.activate(window_id)
    }

    /// Fills the viewport above the taskbar, remembering the current bounds.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::WindowNotFound`] for an unknown window.
    pub fn maximize(&mut self, window_id: WindowId) -> Result<(), WmError> {
        let record = self.require(window_id)?;
        if record.is_maximized() {
            return Ok(());
        }
        if record.is_minimized() {
            self.raise(window_id);
        }

        let fill = self.maximized_rect();
        if let Some(record) = self.registry.get_mut(window_id) {
            if record.saved_bounds.is_none() {
                record.saved_bounds = Some(record.bounds);
            }
            record.bounds = fill;
            record.state = WindowState::Maximized;
        }
        self.update_chrome(window_id, |chrome| {
            chrome.maximize_glyph = MaximizeGlyph::Restore;
        });
        Ok(())
    }

    /// Puts a maximized window back at the bounds it had before maximizing.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::WindowNotFound`] for an unknown window.
    pub fn restore_size(&mut self, window_id: WindowId) -> Result<(), WmError> {
        let record = self
            .registry
            .get_mut(window_id)
            .ok_or(WmError::WindowNotFound(window_id))?;
        if !record.is_maximized() {
            return Ok(());
        }
        if let Some(saved) = record.saved_bounds.take() {
            record.bounds = saved;
        }
        record.state = WindowState::Normal;
        self.update_chrome(window_id, |chrome| {
            chrome.maximize_glyph = MaximizeGlyph::Maximize;
        });
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`WmError::WindowNotFound`] for an unknown window.
    pub fn toggle_maximize(&mut self, window_id: WindowId) -> Result<(), WmError> {
        if self.require(window_id)?.is_maximized() {
            self.restore_size(window_id)
        } else {
            self.maximize(window_id)
        }
    }

    /// Destroys a window with its chrome, task button, pointer session and owned menus.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::WindowNotFound`] for an unknown window; nothing changes in that case.
    pub fn close(&mut self, window_id: WindowId) -> Result<(), WmError> {
        let record = self
            .registry
            .unregister(window_id)
            .ok_or(WmError::WindowNotFound(window_id))?;

        if self.chrome.unmount(window_id).is_none() {
            logging::warn!("window {window_id} closed without chrome");
        }
        if let Some(handle) = record.task_button {
            self.taskbar.remove_task_button(handle);
        }
        if self.active == Some(window_id) {
            self.active = None;
        }
        if self
            .interaction
            .session()
            .is_some_and(|session| session.window_id() == window_id)
        {
            self.interaction.end();
        }
        self.menus.close_owned_by(window_id);
        Ok(())
    }

    /// Runs the task-button click rule and reports which branch was taken.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::TaskButtonNotFound`] for a removed button.
    pub fn click_task_button(
        &mut self,
        handle: TaskButtonHandle,
    ) -> Result<TaskbarDispatch, WmError> {
        let (window_id, dispatch) = self.taskbar.click_dispatch(handle)?;
        match dispatch {
            TaskbarDispatch::Restore => self.restore(window_id)?,
            TaskbarDispatch::Minimize => self.minimize(window_id)?,
            TaskbarDispatch::Activate => self.activate(window_id)?,
        }
        Ok(dispatch)
    }

    /// Handles a press inside a window's chrome: the window is activated first, then a primary
    /// press on the title bar starts a drag and one on a resize affordance starts a resize.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::SessionActive`] while another session owns the pointer (nothing
    /// changes) and [`WmError::WindowNotFound`] for a stale target.
    pub fn pointer_down(
        &mut self,
        target: ChromeTarget,
        pointer: PointerPosition,
        button: PointerButton,
    ) -> Result<(), WmError> {
        if self.interaction.is_captured() {
            return Err(WmError::SessionActive);
        }
        let record = self
            .registry
            .find_by_element(&target)
            .ok_or(WmError::WindowNotFound(target.window_id))?;
        let bounds = record.bounds;
        let maximized = record.is_maximized();

        self.raise(target.window_id);

        if button != PointerButton::Primary || maximized || target.part.blocks_drag() {
            return Ok(());
        }
        match target.part {
            part if part.is_drag_handle() => {
                self.interaction
                    .begin_drag(target.window_id, pointer, bounds)
            }
            ChromePart::ResizeHandle(edge) => {
                self.interaction
                    .begin_resize(target.window_id, edge, pointer, bounds)
            }
            _ => Ok(()),
        }
    }

    /// Runs the control under a completed click.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::WindowNotFound`] for a stale target.
    pub fn click(&mut self, target: ChromeTarget) -> Result<(), WmError> {
        self.require(target.window_id)?;
        match target.part {
            ChromePart::MinimizeControl => self.minimize(target.window_id),
            ChromePart::MaximizeControl => self.toggle_maximize(target.window_id),
            ChromePart::CloseControl => self.close(target.window_id),
            _ => Ok(()),
        }
    }

    /// A double click on the title bar toggles maximize.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::WindowNotFound`] for a stale target.
    pub fn double_click(&mut self, target: ChromeTarget) -> Result<(), WmError> {
        self.require(target.window_id)?;
        if target.part.is_drag_handle() {
            self.toggle_maximize(target.window_id)?;
        }
        Ok(())
    }

    /// Moves or resizes the captured window. Returns `false` when no session is active.
    pub fn pointer_move(&mut self, pointer: PointerPosition) -> bool {
        let Some((window_id, rect)) = self.interaction.track(
            pointer,
            self.config.min_window_width,
            self.config.min_window_height,
        ) else {
            return false;
        };
        match self.registry.get_mut(window_id) {
            Some(record) => {
                record.bounds = rect;
                true
            }
            None => false,
        }
    }

    /// Ends the current drag or resize session.
    pub fn pointer_up(&mut self) -> Option<PointerSession> {
        self.interaction.end()
    }

    /// Records a new viewport; maximized windows are refitted to it.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let fill = self.maximized_rect();
        let ids: Vec<WindowId> = self
            .registry
            .iter()
            .filter(|w| w.is_maximized() || (w.is_minimized() && w.saved_bounds.is_some()))
            .map(|w| w.id)
            .collect();
        for id in ids {
            if let Some(record) = self.registry.get_mut(id) {
                record.bounds = fill;
            }
        }
    }

    /// Opens (or, when already open, closes) the dropdown of a window's menu-bar item.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::WindowNotFound`] for an unknown window.
    pub fn open_menu_bar(
        &mut self,
        window_id: WindowId,
        index: usize,
        item_rect: WindowRect,
    ) -> Result<Option<MenuId>, WmError> {
        self.require(window_id)?;
        let open_here = self
            .menus
            .menus()
            .iter()
            .find(|m| m.parent.is_none() && m.owner == Some(window_id) && m.trigger == Some(index))
            .map(|m| m.id);
        if let Some(menu_id) = open_here {
            self.menus.close(menu_id);
            return Ok(None);
        }

        let Some(items) = self
            .chrome
            .get(window_id)
            .and_then(|chrome| chrome.menu_bar_entry(index))
            .map(|entry| entry.items.clone())
        else {
            logging::warn!("window {window_id} has no menu-bar item {index}");
            return Ok(None);
        };
        let request = OpenMenuRequest::menu_bar(window_id, index, item_rect, items);
        self.menus.open(request, self.viewport).map(Some)
    }

    /// Opens a context menu at the pointer.
    pub fn open_context_menu(
        &mut self,
        at: PointerPosition,
        items: Vec<MenuEntry>,
    ) -> Result<MenuId, WmError> {
        self.menus
            .open(OpenMenuRequest::context(at, items), self.viewport)
    }

    /// Opens the Restore/Minimize/Maximize/Close menu of a task button.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::TaskButtonNotFound`] for a removed button.
    pub fn open_task_button_menu(
        &mut self,
        handle: TaskButtonHandle,
        at: PointerPosition,
    ) -> Result<MenuId, WmError> {
        let window_id = self.taskbar.window_for(handle)?;
        let record = self.require(window_id)?;
        let request = OpenMenuRequest::context(at, task_button_menu(record)).owned_by(window_id);
        self.menus.open(request, self.viewport)
    }

    pub fn toggle_start_menu(&mut self, items: Vec<MenuEntry>) -> Option<MenuId> {
        self.menus
            .toggle_start(self.viewport, self.config.taskbar_height, items)
    }

    /// Activates a menu row. Window commands run here; host commands are handed back with the
    /// window they target.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::MenuNotFound`] for a closed menu and [`WmError::WindowNotFound`] when
    /// the menu's window is gone.
    pub fn activate_menu_item(
        &mut self,
        menu_id: MenuId,
        index: usize,
    ) -> Result<Option<(Option<WindowId>, HostCommand)>, WmError> {
        match self.menus.activate_item(menu_id, index, self.viewport)? {
            None => Ok(None),
            Some((owner, MenuCommand::Host(command))) => Ok(Some((owner, command))),
            Some((Some(owner), MenuCommand::Window(command))) => {
                self.run_window_command(owner, command)?;
                Ok(None)
            }
            Some((None, MenuCommand::Window(command))) => {
                logging::warn!("window command {command:?} from a menu without an owner");
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`WmError::MenuNotFound`] for a closed menu.
    pub fn menu_hover_enter(&mut self, menu_id: MenuId, index: usize) -> Result<(), WmError> {
        self.menus
            .hover_enter(menu_id, index, self.config.submenu_hover_delay_ms)
    }

    pub fn menu_hover_leave(&mut self, menu_id: MenuId, index: usize) {
        self.menus.hover_leave(menu_id, index);
    }

    pub fn document_click(&mut self, target: ClickTarget) -> Vec<MenuId> {
        self.menus.document_click(target)
    }

    pub fn timer_fired(&mut self, token: TimerToken) -> TimerOutcome {
        self.menus.timer_fired(token, self.viewport)
    }

    /// Drains timer work queued by the menu coordinator.
    pub fn take_timer_requests(&mut self) -> Vec<TimerRequest> {
        self.menus.take_timer_requests()
    }

    fn run_window_command(
        &mut self,
        window_id: WindowId,
        command: WindowCommand,
    ) -> Result<(), WmError> {
        match command {
            WindowCommand::Restore => {
                if self.require(window_id)?.is_minimized() {
                    self.restore(window_id)
                } else {
                    self.restore_size(window_id)?;
                    self.activate(window_id)
                }
            }
            WindowCommand::Minimize => self.minimize(window_id),
            WindowCommand::Maximize => {
                self.maximize(window_id)?;
                self.activate(window_id)
            }
            WindowCommand::Close => self.close(window_id),
        }
    }

    fn require(&self, window_id: WindowId) -> Result<&WindowRecord, WmError> {
        self.registry
            .get(window_id)
            .ok_or(WmError::WindowNotFound(window_id))
    }

    fn maximized_rect(&self) -> WindowRect {
        WindowRect::new(
            0,
            0,
            self.viewport.width,
            self.viewport.height - self.config.taskbar_height,
        )
        .clamped_min(self.config.min_window_width, self.config.min_window_height)
    }

    /// Activation body; callers have checked that the record exists.
    fn raise(&mut self, window_id: WindowId) {
        if let Some(previous) = self.active.filter(|id| *id != window_id) {
            self.set_active_visuals(previous, false);
        }

        let z = self.registry.next_z();
        let Some(record) = self.registry.get_mut(window_id) else {
            return;
        };
        let was_minimized = record.is_minimized();
        if was_minimized {
            record.state = if record.saved_bounds.is_some() {
                WindowState::Maximized
            } else {
                WindowState::Normal
            };
        }
        record.z_order = z;
        let task_button = record.task_button;

        if was_minimized {
            self.update_chrome(window_id, |chrome| chrome.hidden = false);
            if let Some(handle) = task_button {
                self.taskbar.set_button_minimized(handle, false);
            }
        }
        self.active = Some(window_id);
        self.set_active_visuals(window_id, true);
    }

    fn set_active_visuals(&mut self, window_id: WindowId, active: bool) {
        self.update_chrome(window_id, |chrome| chrome.active = active);
        if let Some(handle) = self.registry.get(window_id).and_then(|w| w.task_button) {
            self.taskbar.set_button_active(handle, active);
        }
    }

    fn update_chrome(&mut self, window_id: WindowId, apply: impl FnOnce(&mut WindowChrome)) {
        match self.chrome.get_mut(window_id) {
            Some(chrome) => apply(chrome),
            None => logging::warn!("window {window_id} has no chrome; visual update skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        menus::MenuSize,
        model::{ContentHandle, ResizeEdge},
    };

    const VIEWPORT: Viewport = Viewport {
        width: 800,
        height: 600,
    };

    fn manager() -> WindowManager {
        let config = WmConfig {
            placement_seed: Some(11),
            ..WmConfig::default()
        };
        WindowManager::new(config, VIEWPORT)
    }

    fn open(wm: &mut WindowManager, title: &str, x: i32, y: i32) -> WindowId {
        wm.create(OpenWindowRequest::new(title, ContentHandle(0), 300, 200).at(x, y))
    }

    fn at(x: i32, y: i32) -> PointerPosition {
        PointerPosition { x, y }
    }

    fn title_bar(window_id: WindowId) -> ChromeTarget {
        ChromeTarget::new(window_id, ChromePart::TitleBar)
    }

    fn button(wm: &WindowManager, window_id: WindowId) -> TaskButtonHandle {
        wm.window(window_id)
            .and_then(|w| w.task_button)
            .expect("task button")
    }

    fn assert_single_active(wm: &WindowManager) {
        let active_chrome: Vec<WindowId> = wm
            .window_ids()
            .into_iter()
            .filter(|id| wm.chrome().get(*id).is_some_and(|c| c.active))
            .collect();
        let active_buttons = wm.taskbar().buttons().iter().filter(|b| b.active).count();
        assert!(active_chrome.len() <= 1, "active chrome {active_chrome:?}");
        assert!(active_buttons <= 1);
        assert_eq!(active_chrome.first().copied(), wm.active_window());
        if let Some(id) = wm.active_window() {
            assert!(!wm.window(id).expect("active record").is_minimized());
        }
    }

    #[test]
    fn scenario_two_windows_then_activate_first() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 10, 10);
        let b = open(&mut wm, "B", 20, 20);

        assert_eq!(wm.window(a).unwrap().z_order, 101);
        assert_eq!(wm.window(b).unwrap().z_order, 102);
        assert_eq!(wm.active_window(), Some(b));

        wm.activate(a).unwrap();

        assert_eq!(wm.window(a).unwrap().z_order, 103);
        assert_eq!(wm.active_window(), Some(a));
        assert!(wm.chrome().get(a).unwrap().active);
        assert!(!wm.chrome().get(b).unwrap().active);
        assert_eq!(wm.stacking_order(), vec![b, a]);
        assert_single_active(&wm);
    }

    #[test]
    fn scenario_task_button_minimizes_active_then_restores() {
        let mut wm = manager();
        let _other = open(&mut wm, "Other", 0, 0);
        let a = open(&mut wm, "A", 10, 10);
        let handle = button(&wm, a);
        let bounds_before = wm.window(a).unwrap().bounds;
        let title_before = wm.window(a).unwrap().title.clone();

        assert_eq!(wm.click_task_button(handle).unwrap(), TaskbarDispatch::Minimize);
        assert_eq!(wm.window(a).unwrap().state, WindowState::Minimized);
        assert!(wm.chrome().get(a).unwrap().hidden);
        assert_eq!(wm.active_window(), None);
        assert!(wm.taskbar().button(handle).unwrap().minimized);

        let z_before = wm.window(a).unwrap().z_order;
        assert_eq!(wm.click_task_button(handle).unwrap(), TaskbarDispatch::Restore);
        assert_eq!(wm.window(a).unwrap().state, WindowState::Normal);
        assert!(!wm.chrome().get(a).unwrap().hidden);
        assert_eq!(wm.active_window(), Some(a));
        assert!(wm.window(a).unwrap().z_order > z_before);
        assert!(!wm.taskbar().button(handle).unwrap().minimized);
        assert_eq!(wm.window(a).unwrap().bounds, bounds_before);
        assert_eq!(wm.window(a).unwrap().title, title_before);
        assert_single_active(&wm);
    }

    #[test]
    fn task_button_of_inactive_window_activates_it() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        let _b = open(&mut wm, "B", 10, 10);

        assert_eq!(
            wm.click_task_button(button(&wm, a)).unwrap(),
            TaskbarDispatch::Activate
        );
        assert_eq!(wm.active_window(), Some(a));
    }

    #[test]
    fn scenario_resize_west_clamps_at_minimum_width() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 100, 100);

        wm.pointer_down(
            ChromeTarget::new(a, ChromePart::ResizeHandle(ResizeEdge::West)),
            at(100, 150),
            PointerButton::Primary,
        )
        .unwrap();
        assert!(wm.pointer_move(at(600, 150)));
        wm.pointer_up();

        let bounds = wm.window(a).unwrap().bounds;
        assert_eq!(bounds.w, 200);
        assert_eq!(bounds.x, 200);
        assert_eq!(bounds.right(), 400);
    }

    #[test]
    fn scenario_maximize_restore_round_trip_is_exact() {
        let mut wm = manager();
        let a = wm.create(OpenWindowRequest::new("A", ContentHandle(1), 400, 300).at(50, 50));

        wm.click(ChromeTarget::new(a, ChromePart::MaximizeControl))
            .unwrap();
        let record = wm.window(a).unwrap();
        assert_eq!(record.bounds, WindowRect::new(0, 0, 800, 572));
        assert_eq!(record.state, WindowState::Maximized);
        assert_eq!(
            wm.chrome().get(a).unwrap().maximize_glyph,
            MaximizeGlyph::Restore
        );

        wm.click(ChromeTarget::new(a, ChromePart::MaximizeControl))
            .unwrap();
        let record = wm.window(a).unwrap();
        assert_eq!(record.bounds, WindowRect::new(50, 50, 400, 300));
        assert_eq!(record.state, WindowState::Normal);
        assert_eq!(record.saved_bounds, None);
        assert_eq!(
            wm.chrome().get(a).unwrap().maximize_glyph,
            MaximizeGlyph::Maximize
        );
    }

    #[test]
    fn maximizing_twice_keeps_the_first_saved_bounds() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 30, 40);

        wm.maximize(a).unwrap();
        wm.maximize(a).unwrap();
        wm.restore_size(a).unwrap();

        assert_eq!(wm.window(a).unwrap().bounds, WindowRect::new(30, 40, 300, 200));
    }

    #[test]
    fn minimized_maximized_window_restores_maximized() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 30, 40);
        wm.maximize(a).unwrap();
        wm.minimize(a).unwrap();

        wm.restore(a).unwrap();

        let record = wm.window(a).unwrap();
        assert_eq!(record.state, WindowState::Maximized);
        assert_eq!(record.saved_bounds, Some(WindowRect::new(30, 40, 300, 200)));
    }

    #[test]
    fn z_order_only_grows_and_reactivation_bumps_it() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        let b = open(&mut wm, "B", 0, 0);

        let mut last = wm.window(b).unwrap().z_order;
        for target in [a, a, b, a] {
            wm.activate(target).unwrap();
            let z = wm.window(target).unwrap().z_order;
            assert_eq!(z, last + 1);
            last = z;
        }
        let mut zs: Vec<u32> = wm.windows().map(|w| w.z_order).collect();
        zs.sort_unstable();
        zs.dedup();
        assert_eq!(zs.len(), 2);
        assert_eq!(wm.registry.current_z(), last);
    }

    #[test]
    fn minimize_does_not_activate_another_window() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        let b = open(&mut wm, "B", 0, 0);

        wm.minimize(b).unwrap();

        assert_eq!(wm.active_window(), None);
        assert!(!wm.chrome().get(a).unwrap().active);
        assert_single_active(&wm);
    }

    #[test]
    fn close_removes_record_chrome_and_button() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        let handle = button(&wm, a);

        wm.close(a).unwrap();

        assert!(wm.window(a).is_none());
        assert!(!wm.chrome().contains(a));
        assert!(wm.taskbar().button(handle).is_none());
        assert_eq!(wm.active_window(), None);
        assert!(matches!(wm.close(a), Err(WmError::WindowNotFound(id)) if id == a));
    }

    #[test]
    fn close_ends_a_session_on_the_window_and_its_menus() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        wm.pointer_down(title_bar(a), at(5, 5), PointerButton::Primary)
            .unwrap();
        let menu = wm.open_menu_bar(a, 0, WindowRect::new(4, 40, 40, 18)).unwrap();
        assert!(menu.is_some());

        wm.close(a).unwrap();

        assert!(!wm.interaction().is_captured());
        assert!(wm.menus().menus().is_empty());
    }

    #[test]
    fn windows_without_taskbar_integration_have_no_button() {
        let mut wm = manager();
        let a = wm.create(
            OpenWindowRequest::new("Dialog", ContentHandle(3), 250, 160)
                .at(0, 0)
                .without_task_button(),
        );

        assert_eq!(wm.window(a).unwrap().task_button, None);
        assert!(wm.taskbar().is_empty());
        wm.close(a).unwrap();
    }

    #[test]
    fn creation_clamps_small_requests_and_places_inside_viewport() {
        let mut wm = manager();
        let a = wm.create(OpenWindowRequest::new("Tiny", ContentHandle(0), 10, 10));

        let bounds = wm.window(a).unwrap().bounds;
        assert_eq!((bounds.w, bounds.h), (200, 150));
        assert!(bounds.x >= 0 && bounds.right() <= 800);
        assert!(bounds.y >= 0 && bounds.bottom() <= 600 - 40);
        assert_eq!(wm.window(a).unwrap().icon, "icons/windows-0.png");
    }

    #[test]
    fn title_bar_drag_moves_window_and_controls_do_not() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 100, 100);

        wm.pointer_down(
            ChromeTarget::new(a, ChromePart::CloseControl),
            at(390, 105),
            PointerButton::Primary,
        )
        .unwrap();
        assert!(!wm.interaction().is_captured());

        wm.pointer_down(title_bar(a), at(150, 105), PointerButton::Primary)
            .unwrap();
        wm.pointer_move(at(170, 145));
        assert!(wm.pointer_up().is_some());

        assert_eq!(wm.window(a).unwrap().bounds, WindowRect::new(120, 140, 300, 200));
        assert!(!wm.pointer_move(at(500, 500)));
    }

    #[test]
    fn secondary_button_activates_without_dragging() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        let _b = open(&mut wm, "B", 0, 0);

        wm.pointer_down(title_bar(a), at(5, 5), PointerButton::Secondary)
            .unwrap();

        assert_eq!(wm.active_window(), Some(a));
        assert!(!wm.interaction().is_captured());
    }

    #[test]
    fn maximized_window_cannot_be_dragged() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        wm.maximize(a).unwrap();

        wm.pointer_down(title_bar(a), at(5, 5), PointerButton::Primary)
            .unwrap();

        assert!(!wm.interaction().is_captured());
    }

    #[test]
    fn second_press_during_session_changes_nothing() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        let b = open(&mut wm, "B", 50, 50);
        wm.pointer_down(title_bar(b), at(60, 55), PointerButton::Primary)
            .unwrap();

        let err = wm
            .pointer_down(title_bar(a), at(5, 5), PointerButton::Primary)
            .unwrap_err();

        assert!(matches!(err, WmError::SessionActive));
        assert_eq!(wm.active_window(), Some(b));
    }

    #[test]
    fn double_click_on_title_toggles_maximize() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 10, 10);

        wm.double_click(ChromeTarget::new(a, ChromePart::Title)).unwrap();
        assert!(wm.window(a).unwrap().is_maximized());
        wm.double_click(ChromeTarget::new(a, ChromePart::Content)).unwrap();
        assert!(wm.window(a).unwrap().is_maximized());
        wm.double_click(title_bar(a)).unwrap();
        assert!(!wm.window(a).unwrap().is_maximized());
    }

    #[test]
    fn missing_chrome_skips_visuals_but_still_updates_record() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        wm.chrome.unmount(a);

        wm.minimize(a).unwrap();
        assert_eq!(wm.window(a).unwrap().state, WindowState::Minimized);

        wm.restore(a).unwrap();
        assert_eq!(wm.active_window(), Some(a));
        wm.close(a).unwrap();
        assert!(wm.window(a).is_none());
    }

    #[test]
    fn viewport_change_refits_maximized_windows() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 10, 10);
        let b = open(&mut wm, "B", 20, 20);
        wm.maximize(a).unwrap();

        wm.set_viewport(Viewport {
            width: 1280,
            height: 720,
        });

        assert_eq!(wm.window(a).unwrap().bounds, WindowRect::new(0, 0, 1280, 692));
        assert_eq!(wm.window(b).unwrap().bounds, WindowRect::new(20, 20, 300, 200));
    }

    #[test]
    fn viewport_change_refits_minimized_maximized_window() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 10, 10);
        wm.maximize(a).unwrap();
        wm.minimize(a).unwrap();

        wm.set_viewport(Viewport {
            width: 1024,
            height: 768,
        });
        wm.restore(a).unwrap();

        let record = wm.window(a).unwrap();
        assert_eq!(record.state, WindowState::Maximized);
        assert_eq!(record.bounds, WindowRect::new(0, 0, 1024, 740));
        assert_eq!(record.saved_bounds, Some(WindowRect::new(10, 10, 300, 200)));
    }

    #[test]
    fn file_close_in_menu_bar_closes_owner() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        let menu = wm
            .open_menu_bar(a, 0, WindowRect::new(4, 40, 40, 18))
            .unwrap()
            .expect("file menu");
        let close_index = wm
            .menus()
            .get(menu)
            .unwrap()
            .items
            .iter()
            .position(|entry| entry.as_item().is_some_and(|item| item.label == "Close"))
            .expect("close row");

        assert_eq!(wm.activate_menu_item(menu, close_index).unwrap(), None);
        assert!(wm.window(a).is_none());
    }

    #[test]
    fn menu_bar_item_click_toggles_its_dropdown() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        let rect = WindowRect::new(4, 40, 40, 18);

        let file = wm.open_menu_bar(a, 0, rect).unwrap().expect("file");
        let edit = wm.open_menu_bar(a, 1, rect).unwrap().expect("edit");
        assert!(!wm.menus().is_open(file));
        assert!(wm.menus().is_open(edit));

        assert_eq!(wm.open_menu_bar(a, 1, rect).unwrap(), None);
        assert!(wm.menus().menus().is_empty());
    }

    #[test]
    fn host_commands_come_back_with_their_window() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 0, 0);
        let menu = wm
            .open_menu_bar(a, 1, WindowRect::new(40, 40, 40, 18))
            .unwrap()
            .expect("edit menu");

        let result = wm.activate_menu_item(menu, 2).unwrap();

        assert_eq!(result, Some((Some(a), HostCommand::new("edit.cut"))));
    }

    #[test]
    fn task_button_menu_maximizes_background_window() {
        let mut wm = manager();
        let a = open(&mut wm, "A", 10, 10);
        let _b = open(&mut wm, "B", 20, 20);
        let menu = wm.open_task_button_menu(button(&wm, a), at(30, 590)).unwrap();
        let maximize = wm
            .menus()
            .get(menu)
            .unwrap()
            .items
            .iter()
            .position(|entry| entry.as_item().is_some_and(|item| item.label == "Maximize"))
            .expect("maximize row");

        wm.activate_menu_item(menu, maximize).unwrap();

        assert!(wm.window(a).unwrap().is_maximized());
        assert_eq!(wm.active_window(), Some(a));
        assert!(wm.menus().menus().is_empty());
    }

    #[test]
    fn scenario_context_menu_near_right_edge_is_clamped() {
        let mut wm = manager();
        let items = vec![MenuEntry::Item(crate::menus::MenuItem::new(
            "Arrange Icons",
            HostCommand::new("desktop.arrange"),
        ))];
        let request = OpenMenuRequest::context(at(750, 100), items).with_size(MenuSize {
            width: 200,
            height: 120,
        });

        let menu = wm.menus.open(request, wm.viewport()).unwrap();
        let menu = wm.menus().get(menu).unwrap();

        assert_eq!(menu.position, at(600, 100));
        assert_eq!(menu.rect().right(), 800);
    }

    #[test]
    fn desktop_context_menu_uses_measured_size() {
        let mut wm = manager();
        let items = vec![MenuEntry::Item(crate::menus::MenuItem::new(
            "Paste",
            HostCommand::new("desktop.paste"),
        ))];

        let menu = wm.open_context_menu(at(790, 590), items).unwrap();
        let menu = wm.menus().get(menu).unwrap();

        assert_eq!(menu.size.width, 150);
        assert_eq!(menu.position, at(650, 600 - menu.size.height));
        assert!(menu.rect().right() <= 800);
        assert!(menu.rect().bottom() <= 600);
    }
}
