//! Storage for live window records and the stacking counter.
//!
//! The registry never changes a record on its own; lifecycle transitions live in
//! [`crate::window_manager`].

use crate::{
    chrome::ChromeTarget,
    model::{WindowId, WindowRecord},
};

#[derive(Debug, Clone, PartialEq)]
pub struct WindowRegistry {
    records: Vec<WindowRecord>,
    z_counter: u32,
    next_window_id: u64,
}

impl WindowRegistry {
    /// Creates an empty registry whose counter starts at `z_base`.
    pub fn new(z_base: u32) -> Self {
        Self {
            records: Vec::new(),
            z_counter: z_base,
            next_window_id: 1,
        }
    }

    pub fn next_window_id(&mut self) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id = self.next_window_id.saturating_add(1);
        id
    }

    /// Bumps the stacking counter and returns the new top value.
    pub fn next_z(&mut self) -> u32 {
        self.z_counter = self.z_counter.saturating_add(1);
        self.z_counter
    }

    /// Current counter value (the z-order of the most recently raised window).
    pub fn current_z(&self) -> u32 {
        self.z_counter
    }

    pub fn register(&mut self, record: WindowRecord) {
        self.records.push(record);
    }

    pub fn unregister(&mut self, window_id: WindowId) -> Option<WindowRecord> {
        let index = self.records.iter().position(|w| w.id == window_id)?;
        Some(self.records.remove(index))
    }

    pub fn get(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.records.iter().find(|w| w.id == window_id)
    }

    pub fn get_mut(&mut self, window_id: WindowId) -> Option<&mut WindowRecord> {
        self.records.iter_mut().find(|w| w.id == window_id)
    }

    /// Resolves the record owning a chrome element.
    pub fn find_by_element(&self, target: &ChromeTarget) -> Option<&WindowRecord> {
        self.get(target.window_id)
    }

    pub fn contains(&self, window_id: WindowId) -> bool {
        self.get(window_id).is_some()
    }

    /// Records in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &WindowRecord> {
        self.records.iter()
    }

    /// Window ids from bottom to top of the stack.
    pub fn stacking_order(&self) -> Vec<WindowId> {
        let mut stack: Vec<&WindowRecord> = self.records.iter().collect();
        stack.sort_by_key(|w| (w.z_order, w.id));
        stack.into_iter().map(|w| w.id).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        chrome::ChromePart,
        model::{ContentHandle, WindowRect, WindowState},
    };

    fn record(id: WindowId, z_order: u32) -> WindowRecord {
        WindowRecord {
            id,
            title: format!("Window {id}"),
            content: ContentHandle(id.0),
            icon: String::new(),
            bounds: WindowRect::new(0, 0, 300, 200),
            z_order,
            state: WindowState::Normal,
            saved_bounds: None,
            task_button: None,
            has_menu_bar: false,
        }
    }

    #[test]
    fn counter_starts_at_base_and_only_grows() {
        let mut registry = WindowRegistry::new(100);

        assert_eq!(registry.current_z(), 100);
        assert_eq!(registry.next_z(), 101);
        assert_eq!(registry.next_z(), 102);
        assert_eq!(registry.current_z(), 102);
    }

    #[test]
    fn unregister_removes_only_the_target_and_is_idempotent() {
        let mut registry = WindowRegistry::new(100);
        let first = registry.next_window_id();
        let second = registry.next_window_id();
        registry.register(record(first, 101));
        registry.register(record(second, 102));

        assert_eq!(registry.unregister(first).map(|w| w.id), Some(first));
        assert!(registry.unregister(first).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(second));
    }

    #[test]
    fn find_by_element_resolves_owner_of_chrome_part() {
        let mut registry = WindowRegistry::new(100);
        let id = registry.next_window_id();
        registry.register(record(id, 101));

        let target =
            ChromeTarget::new(id, ChromePart::ResizeHandle(crate::model::ResizeEdge::East));
        assert_eq!(registry.find_by_element(&target).map(|w| w.id), Some(id));

        let stale = ChromeTarget::new(WindowId(99), ChromePart::TitleBar);
        assert!(registry.find_by_element(&stale).is_none());
    }

    #[test]
    fn stacking_order_sorts_by_z() {
        let mut registry = WindowRegistry::new(100);
        registry.register(record(WindowId(1), 105));
        registry.register(record(WindowId(2), 101));
        registry.register(record(WindowId(3), 103));

        assert_eq!(
            registry.stacking_order(),
            vec![WindowId(2), WindowId(3), WindowId(1)]
        );
    }
}
