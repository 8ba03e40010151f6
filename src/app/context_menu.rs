//! Context menu for scoped expand/collapse of one subtree

use crate::view::file_tree::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    ExpandAll,
    CollapseAll,
}

impl MenuItem {
    pub const ALL: [MenuItem; 2] = [MenuItem::ExpandAll, MenuItem::CollapseAll];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::ExpandAll => "Expand All",
            MenuItem::CollapseAll => "Collapse All",
        }
    }

    /// Expand state this item applies
    pub fn expand(&self) -> bool {
        matches!(self, MenuItem::ExpandAll)
    }
}

/// Menu opened on a tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    pub target: NodeId,
    pub selected: usize,
}

impl ContextMenu {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            selected: 0,
        }
    }

    pub fn items(&self) -> &'static [MenuItem] {
        &MenuItem::ALL
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % MenuItem::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + MenuItem::ALL.len() - 1) % MenuItem::ALL.len();
    }

    pub fn selected_item(&self) -> MenuItem {
        MenuItem::ALL[self.selected % MenuItem::ALL.len()]
    }
}
