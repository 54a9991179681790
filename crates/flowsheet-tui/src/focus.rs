//! FocusRing — manages keyboard focus cycling between components.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.items.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }

    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }

    /// Replace the ring contents (on workspace switch), keeping the focused
    /// id when the new set still has it.
    pub fn set_items(&mut self, items: Vec<ComponentId>) {
        let old = self.current();
        self.items = items;
        self.current = old
            .and_then(|id| self.items.iter().position(|&x| x == id))
            .unwrap_or(0);
    }

    /// Focus the Nth item in the ring (0-indexed). No-op if out of bounds.
    pub fn set_by_position(&mut self, pos: usize) -> Option<ComponentId> {
        if pos < self.items.len() {
            self.current = pos;
            self.current()
        } else {
            None
        }
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_ring() -> FocusRing {
        FocusRing::new(vec![
            ComponentId::Catalog,
            ComponentId::Rotation,
            ComponentId::Bin,
        ])
    }

    #[test]
    fn test_next_prev_wrap() {
        let mut ring = library_ring();
        assert_eq!(ring.current(), Some(ComponentId::Catalog));
        assert_eq!(ring.prev(), Some(ComponentId::Bin));
        assert_eq!(ring.next(), Some(ComponentId::Catalog));
        assert_eq!(ring.next(), Some(ComponentId::Rotation));
    }

    #[test]
    fn test_set_items_keeps_focus_when_present() {
        let mut ring = library_ring();
        ring.set(ComponentId::Bin);
        ring.set_items(vec![ComponentId::Bin, ComponentId::Catalog]);
        assert!(ring.is_focused(ComponentId::Bin));
        ring.set_items(vec![ComponentId::FlowsheetSearch, ComponentId::FlowsheetLog]);
        assert!(ring.is_focused(ComponentId::FlowsheetSearch));
    }

    #[test]
    fn test_empty_ring() {
        let mut ring = FocusRing::default();
        assert_eq!(ring.next(), None);
        assert_eq!(ring.prev(), None);
        assert_eq!(ring.set_by_position(0), None);
    }
}
