//! WorkspaceManager — Flowsheet/Library tab switching and the focus ring of
//! the active tab.

use crate::action::{ComponentId, Workspace};
use crate::focus::FocusRing;

pub struct WorkspaceManager {
    pub workspace: Workspace,
    pub show_help: bool,
    pub show_keys_bar: bool,
    pub focus: FocusRing,
}

impl WorkspaceManager {
    pub fn new() -> Self {
        let mut wm = Self {
            workspace: Workspace::Flowsheet,
            show_help: false,
            show_keys_bar: true,
            focus: FocusRing::default(),
        };
        wm.rebuild_focus_ring();
        wm
    }

    /// Panes of a workspace in focus order; `1`..`3` select by position.
    pub fn panes(workspace: Workspace) -> Vec<ComponentId> {
        match workspace {
            Workspace::Flowsheet => vec![ComponentId::FlowsheetSearch, ComponentId::FlowsheetLog],
            Workspace::Library => vec![ComponentId::Catalog, ComponentId::Rotation, ComponentId::Bin],
        }
    }

    fn rebuild_focus_ring(&mut self) {
        self.focus.set_items(Self::panes(self.workspace));
    }

    pub fn set_workspace(&mut self, ws: Workspace) {
        if self.workspace != ws {
            self.workspace = ws;
            self.rebuild_focus_ring();
        }
    }

    pub fn focused(&self) -> Option<ComponentId> {
        self.focus.current()
    }

    pub fn focus_next(&mut self) -> Option<ComponentId> {
        self.focus.next()
    }

    pub fn focus_prev(&mut self) -> Option<ComponentId> {
        self.focus.prev()
    }

    /// Focus a component, switching workspace if it lives in the other one.
    pub fn focus_set(&mut self, id: ComponentId) {
        if !Self::panes(self.workspace).contains(&id) {
            let other = self.workspace.other();
            if Self::panes(other).contains(&id) {
                self.set_workspace(other);
            }
        }
        self.focus.set(id);
    }

    pub fn focus_nth(&mut self, n: usize) -> Option<ComponentId> {
        self.focus.set_by_position(n)
    }
}

impl Default for WorkspaceManager {
    fn default() -> Self {
        Self::new()
    }
}
