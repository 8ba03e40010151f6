use super::node::{NodeId, TreeNode};
use super::sort::{SortKey, SortOrder};
use super::tree::FileTree;

/// View state for file tree navigation and ordering
#[derive(Debug)]
pub struct FileTreeView {
    /// The underlying tree model
    tree: FileTree,
    /// Currently selected node
    selected_node: Option<NodeId>,
    /// Scroll offset (index into visible nodes)
    scroll_offset: usize,
    sort_key: SortKey,
    sort_order: SortOrder,
    /// Last known viewport height (for scrolling calculations)
    pub(crate) viewport_height: usize,
}

impl FileTreeView {
    /// Create a new file tree view
    pub fn new(tree: FileTree, sort_key: SortKey, sort_order: SortOrder) -> Self {
        let selected_node = tree.root_id();
        Self {
            tree,
            selected_node,
            scroll_offset: 0,
            sort_key,
            sort_order,
            viewport_height: 10, // Default, will be updated during rendering
        }
    }

    /// Swap in a freshly built tree, resetting selection and scroll
    pub fn replace_tree(&mut self, tree: FileTree) {
        self.selected_node = tree.root_id();
        self.scroll_offset = 0;
        self.tree = tree;
    }

    /// Set the viewport height (should be called during rendering)
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
    }

    /// Get the underlying tree
    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    /// Get mutable reference to the underlying tree
    pub fn tree_mut(&mut self) -> &mut FileTree {
        &mut self.tree
    }

    /// Get currently visible nodes with their indent levels
    ///
    /// Returns a list of (NodeId, indent_level) tuples for rendering.
    pub fn get_display_nodes(&self) -> Vec<(NodeId, usize)> {
        self.tree.get_visible_nodes_with_depth()
    }

    /// Get the currently selected node ID
    pub fn get_selected(&self) -> Option<NodeId> {
        self.selected_node
    }

    /// Get the currently selected node
    pub fn get_selected_node(&self) -> Option<&TreeNode> {
        self.selected_node.and_then(|id| self.tree.get_node(id))
    }

    /// Set the selected node
    pub fn set_selected(&mut self, node_id: Option<NodeId>) {
        self.selected_node = node_id;
    }

    /// Select the next visible node
    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    /// Select the previous visible node
    pub fn select_prev(&mut self) {
        self.move_selection(-1);
    }

    /// Move selection up by a page (viewport height)
    pub fn select_page_up(&mut self) {
        self.move_selection(-(self.viewport_height.max(1) as isize));
    }

    /// Move selection down by a page (viewport height)
    pub fn select_page_down(&mut self) {
        self.move_selection(self.viewport_height.max(1) as isize);
    }

    fn move_selection(&mut self, delta: isize) {
        let visible = self.tree.get_visible_nodes();
        if visible.is_empty() {
            return;
        }

        let pos = self
            .selected_node
            .and_then(|current| visible.iter().position(|&id| id == current));
        let new_pos = match pos {
            Some(pos) => pos
                .saturating_add_signed(delta)
                .min(visible.len() - 1),
            None => 0,
        };
        self.selected_node = Some(visible[new_pos]);
        self.update_scroll_for_selection();
    }

    /// Select the first visible node
    pub fn select_first(&mut self) {
        let visible = self.tree.get_visible_nodes();
        self.selected_node = visible.first().copied();
        self.update_scroll_for_selection();
    }

    /// Select the last visible node
    pub fn select_last(&mut self) {
        let visible = self.tree.get_visible_nodes();
        self.selected_node = visible.last().copied();
        self.update_scroll_for_selection();
    }

    /// Select the parent of the currently selected node
    pub fn select_parent(&mut self) {
        if let Some(parent_id) = self.get_selected_node().and_then(|node| node.parent) {
            self.selected_node = Some(parent_id);
            self.update_scroll_for_selection();
        }
    }

    /// After a collapse the selection may sit inside a hidden subtree;
    /// move it to the outermost collapsed ancestor
    pub fn reveal_selection(&mut self) {
        let Some(selected) = self.selected_node else {
            return;
        };
        let ancestors = self.tree.get_ancestors(selected);
        let hidden_by = ancestors
            .iter()
            .copied()
            .take(ancestors.len().saturating_sub(1))
            .find(|&id| self.tree.get_node(id).is_some_and(|n| !n.is_expanded()));
        if let Some(id) = hidden_by {
            self.selected_node = Some(id);
        }
        self.update_scroll_for_selection();
    }

    /// Get the scroll offset
    pub fn get_scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Keep the selected node inside the viewport, scrolling only when it
    /// moves past either edge
    pub fn update_scroll_for_selection(&mut self) {
        if self.viewport_height == 0 {
            return;
        }

        if let Some(pos) = self.get_selected_index() {
            if pos < self.scroll_offset {
                self.scroll_offset = pos;
            } else if pos >= self.scroll_offset + self.viewport_height {
                self.scroll_offset = pos - self.viewport_height + 1;
            }
        }
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Re-sort the tree by a column.
    ///
    /// Choosing the active column again flips the order; choosing another
    /// column starts ascending.
    pub fn sort_by_column(&mut self, key: SortKey) {
        if key == self.sort_key {
            self.sort_order = self.sort_order.reversed();
        } else {
            self.sort_key = key;
            self.sort_order = SortOrder::Ascending;
        }
        self.apply_sort();
    }

    /// Set key and order explicitly and re-sort
    pub fn set_sort(&mut self, key: SortKey, order: SortOrder) {
        self.sort_key = key;
        self.sort_order = order;
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        tracing::debug!("Sorting by {} {:?}", self.sort_key, self.sort_order);
        self.tree.sort(self.sort_key, self.sort_order);
        self.update_scroll_for_selection();
    }

    /// Get the index of the selected node in the visible list
    pub fn get_selected_index(&self) -> Option<usize> {
        let selected = self.selected_node?;
        self.tree
            .get_visible_nodes()
            .iter()
            .position(|&id| id == selected)
    }

    /// Get the number of visible nodes
    pub fn visible_count(&self) -> usize {
        self.tree.get_visible_nodes().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fs::LocalFsBackend;
    use crate::view::file_tree::tree::BuildOptions;
    use std::fs as std_fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_test_view() -> (TempDir, FileTreeView) {
        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_dir.path();

        // Create test structure
        std_fs::create_dir(temp_path.join("dir1")).unwrap();
        std_fs::write(temp_path.join("dir1/file1.txt"), "content1").unwrap();
        std_fs::write(temp_path.join("dir1/file2.txt"), "content2").unwrap();
        std_fs::create_dir(temp_path.join("dir2")).unwrap();
        std_fs::write(temp_path.join("file3.txt"), "content3").unwrap();

        let tree = FileTree::build(temp_path, &LocalFsBackend::new(), &BuildOptions::default())
            .unwrap();
        let view = FileTreeView::new(tree, SortKey::Type, SortOrder::Ascending);

        (temp_dir, view)
    }

    #[test]
    fn test_view_creation() {
        let (_temp_dir, view) = create_test_view();

        assert_eq!(view.get_selected(), view.tree().root_id());
        assert_eq!(view.get_scroll_offset(), 0);
        assert_eq!(view.sort_key(), SortKey::Type);
    }

    #[test]
    fn test_get_display_nodes() {
        let (_temp_dir, mut view) = create_test_view();

        // Root is expanded after a build
        let display = view.get_display_nodes();
        assert_eq!(display.len(), 4); // root + 3 children
        assert_eq!(display[0].1, 0);
        assert!(display[1..].iter().all(|&(_, depth)| depth == 1));

        let dir1 = view
            .tree()
            .find_by_relative_path(Path::new("dir1"))
            .unwrap();
        view.tree_mut().set_expanded(dir1, true);
        let display = view.get_display_nodes();
        assert_eq!(display.len(), 6);
        assert_eq!(display[2].1, 2);
    }

    #[test]
    fn test_navigation() {
        let (_temp_dir, mut view) = create_test_view();
        let root_id = view.tree().root_id();

        view.select_next();
        assert_ne!(view.get_selected(), root_id);

        view.select_prev();
        assert_eq!(view.get_selected(), root_id);

        // Stays on the first row
        view.select_prev();
        assert_eq!(view.get_selected(), root_id);

        view.select_last();
        let visible = view.tree().get_visible_nodes();
        assert_eq!(view.get_selected(), visible.last().copied());

        view.select_first();
        assert_eq!(view.get_selected(), root_id);
    }

    #[test]
    fn test_select_parent() {
        let (_temp_dir, mut view) = create_test_view();
        let root_id = view.tree().root_id();

        view.select_next();
        view.select_parent();
        assert_eq!(view.get_selected(), root_id);
    }

    #[test]
    fn test_ensure_visible_scrolls() {
        let (_temp_dir, mut view) = create_test_view();
        view.set_viewport_height(2);

        view.select_last();
        let selected_index = view.get_selected_index().unwrap();
        assert!(selected_index >= view.get_scroll_offset());
        assert!(selected_index < view.get_scroll_offset() + 2);

        view.select_first();
        assert_eq!(view.get_scroll_offset(), 0);
    }

    #[test]
    fn test_reveal_selection_after_collapse() {
        let (_temp_dir, mut view) = create_test_view();
        let dir1 = view
            .tree()
            .find_by_relative_path(Path::new("dir1"))
            .unwrap();
        view.tree_mut().set_expanded(dir1, true);
        let file1 = view
            .tree()
            .find_by_relative_path(Path::new("dir1/file1.txt"))
            .unwrap();
        view.set_selected(Some(file1));

        view.tree_mut().set_expanded(dir1, false);
        view.reveal_selection();
        assert_eq!(view.get_selected(), Some(dir1));

        let root = view.tree().root_id().unwrap();
        view.set_selected(Some(file1));
        view.tree_mut().set_all_expanded(false);
        view.reveal_selection();
        assert_eq!(view.get_selected(), Some(root));
    }

    #[test]
    fn test_sort_by_column_flips_order() {
        let (_temp_dir, mut view) = create_test_view();

        view.sort_by_column(SortKey::Type);
        assert_eq!(view.sort_order(), SortOrder::Descending);

        view.sort_by_column(SortKey::Name);
        assert_eq!(view.sort_key(), SortKey::Name);
        assert_eq!(view.sort_order(), SortOrder::Ascending);

        view.sort_by_column(SortKey::Name);
        let root = view.tree().root_id().unwrap();
        let first_child = view.tree().get_node(root).unwrap().children[0];
        // Folders stay first even when descending
        assert!(view.tree().get_node(first_child).unwrap().is_dir());
        assert_eq!(view.tree().get_node(first_child).unwrap().name, "dir2");
    }

    #[test]
    fn test_visible_count() {
        let (_temp_dir, mut view) = create_test_view();
        assert_eq!(view.visible_count(), 4);

        view.tree_mut().set_all_expanded(false);
        assert_eq!(view.visible_count(), 1);
    }
}
