use super::node::{NodeId, NodeKind, NodeState, TreeNode};
use super::sort::{compare_nodes, name_order, SortKey, SortOrder};
use super::walker::DirectoryWalker;
use crate::services::fs::{FsBackend, FsEntry};
use std::io;
use std::path::{Path, PathBuf};

/// Text of the marker placed in a folder with nothing in it
pub const NO_FILES_LABEL: &str = "No files";

/// Errors that abort a whole scan. Failures below the root never do.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How a tree is materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// List files individually (otherwise only counted)
    pub show_files: bool,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            show_files: true,
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// Pending folder in the build work stack
struct PendingDir {
    id: NodeId,
    path: PathBuf,
    /// Reached through a symlink, so it may lead back to an ancestor
    via_symlink: bool,
}

/// Label of the summary marker for a folder without subfolders
fn marker_label(file_count: usize) -> String {
    if file_count == 0 {
        NO_FILES_LABEL.to_string()
    } else {
        format!("{file_count} files")
    }
}

/// Fully materialized directory tree
///
/// Nodes live in an arena indexed by `NodeId`. The tree is never patched
/// from disk: a re-scan builds a new `FileTree`. Only the expand state and
/// sibling order change after construction.
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    /// Scanned directory (None for an empty tree)
    root_path: Option<PathBuf>,
    nodes: Vec<TreeNode>,
    /// Top-level nodes, in display order
    roots: Vec<NodeId>,
}

impl FileTree {
    /// A tree with no nodes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Walk `root_path` depth-first and materialize every entry below it.
    ///
    /// The walk uses an explicit work stack, so depth is bounded by memory
    /// rather than by the call stack. A folder that cannot be listed ends up
    /// in `NodeState::Error` and the walk carries on with its siblings.
    ///
    /// # Errors
    ///
    /// Returns an error if the root itself is missing, not a directory, or
    /// cannot be inspected.
    pub fn build(
        root_path: &Path,
        backend: &dyn FsBackend,
        options: &BuildOptions,
    ) -> Result<Self, ScanError> {
        match backend.is_dir(root_path) {
            Ok(true) => {}
            Ok(false) => return Err(ScanError::NotADirectory(root_path.to_path_buf())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ScanError::NotFound(root_path.to_path_buf()))
            }
            Err(source) => {
                return Err(ScanError::Io {
                    path: root_path.to_path_buf(),
                    source,
                })
            }
        }

        let mut tree = Self {
            root_path: Some(root_path.to_path_buf()),
            nodes: Vec::new(),
            roots: Vec::new(),
        };

        let root_name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root_path.display().to_string());
        let root_id = tree.add_node(
            root_name,
            NodeKind::Folder,
            Some(root_path.to_path_buf()),
            None,
        );
        tree.roots.push(root_id);

        let walker = DirectoryWalker::new(backend, options.show_files);
        let mut stack = vec![PendingDir {
            id: root_id,
            path: root_path.to_path_buf(),
            via_symlink: false,
        }];

        while let Some(dir) = stack.pop() {
            if dir.via_symlink && tree.leads_to_ancestor(dir.id, &dir.path, backend) {
                tracing::warn!("Not descending into {:?}: symlink loop", dir.path);
                tree.nodes[dir.id.0].state = NodeState::Error("symlink loop".to_string());
                continue;
            }

            let listing = match walker.list(&dir.path) {
                Ok(listing) => listing,
                Err(source) if dir.id == root_id => {
                    tracing::warn!("Cannot list scanned folder {:?}: {}", dir.path, source);
                    return Err(ScanError::Io {
                        path: dir.path,
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!("Cannot list {:?}: {}", dir.path, e);
                    tree.nodes[dir.id.0].state = NodeState::Error(e.to_string());
                    continue;
                }
            };

            let mut folders = listing.folders;
            let mut files = listing.files;
            folders.sort_by(|a, b| name_order(&a.name, &b.name));
            files.sort_by(|a, b| name_order(&a.name, &b.name));

            let mut pending = Vec::with_capacity(folders.len());
            for FsEntry {
                path,
                name,
                is_symlink,
                ..
            } in folders.iter().cloned()
            {
                let child = tree.add_node(name, NodeKind::Folder, Some(path.clone()), Some(dir.id));
                pending.push(PendingDir {
                    id: child,
                    path,
                    via_symlink: dir.via_symlink || is_symlink,
                });
            }
            // Reverse so the first folder is walked first
            stack.extend(pending.into_iter().rev());

            for FsEntry { path, name, .. } in files.iter().cloned() {
                let kind = NodeKind::file(&name);
                tree.add_node(name, kind, Some(path), Some(dir.id));
            }

            if folders.is_empty() && files.is_empty() {
                tree.add_node(
                    marker_label(listing.file_count),
                    NodeKind::Marker,
                    None,
                    Some(dir.id),
                );
            }
        }

        tree.sort(options.sort_key, options.sort_order);
        if let Some(root) = tree.nodes.get_mut(root_id.0) {
            if root.is_collapsed() {
                root.state = NodeState::Expanded;
            }
        }

        tracing::debug!(
            "Built tree for {:?}: {} nodes",
            root_path,
            tree.node_count()
        );
        Ok(tree)
    }

    /// Whether `path` (the folder of node `id`) resolves to the same
    /// directory as one of the node's ancestors
    fn leads_to_ancestor(&self, id: NodeId, path: &Path, backend: &dyn FsBackend) -> bool {
        let Ok(canonical) = backend.canonicalize(path) else {
            return false;
        };

        let mut current = self.get_node(id).and_then(|n| n.parent);
        while let Some(parent_id) = current {
            let Some(parent) = self.get_node(parent_id) else {
                break;
            };
            let same = parent
                .path
                .as_deref()
                .and_then(|p| backend.canonicalize(p).ok())
                .is_some_and(|p| p == canonical);
            if same {
                return true;
            }
            current = parent.parent;
        }
        false
    }

    /// Get the scanned directory
    pub fn root_path(&self) -> Option<&Path> {
        self.root_path.as_deref()
    }

    /// Top-level node IDs
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// First top-level node, if any
    pub fn root_id(&self) -> Option<NodeId> {
        self.roots.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id.0)
    }

    /// Get all nodes
    pub fn all_nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Get number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Find the first child of `parent` with the given name
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.get_node(parent)?
            .children
            .iter()
            .copied()
            .find(|&id| self.get_node(id).is_some_and(|n| n.name == name))
    }

    /// Find a node by a path relative to the first root
    pub fn find_by_relative_path(&self, relative_path: &Path) -> Option<NodeId> {
        let mut current = self.root_id()?;
        for component in relative_path.components() {
            let name = component.as_os_str().to_str()?;
            current = self.find_child(current, name)?;
        }
        Some(current)
    }

    fn add_node(
        &mut self,
        name: String,
        kind: NodeKind,
        path: Option<PathBuf>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = TreeNode::new(id, name, kind, path);
        node.parent = parent;
        self.nodes.push(node);

        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.get_node_mut(parent_id) {
                parent_node.children.push(id);
            }
        }

        id
    }

    /// Re-order every sibling list with the folder-first comparator.
    ///
    /// Key ties are broken by ascending name so the result does not depend
    /// on the previous order.
    pub fn sort(&mut self, key: SortKey, order: SortOrder) {
        let compare = |nodes: &[TreeNode], a: &NodeId, b: &NodeId| {
            let (a, b) = (&nodes[a.0], &nodes[b.0]);
            compare_nodes(a, b, key, order).then_with(|| name_order(&a.name, &b.name))
        };

        for index in 0..self.nodes.len() {
            if self.nodes[index].children.len() < 2 {
                continue;
            }
            let mut children = std::mem::take(&mut self.nodes[index].children);
            children.sort_by(|a, b| compare(&self.nodes, a, b));
            self.nodes[index].children = children;
        }

        let mut roots = std::mem::take(&mut self.roots);
        roots.sort_by(|a, b| compare(&self.nodes, a, b));
        self.roots = roots;
    }

    /// Set the expand flag of a single folder.
    ///
    /// Returns false when the node does not exist or cannot be expanded.
    pub fn set_expanded(&mut self, id: NodeId, expand: bool) -> bool {
        match self.get_node_mut(id) {
            Some(node) if node.can_expand() => {
                node.state = if expand {
                    NodeState::Expanded
                } else {
                    NodeState::Collapsed
                };
                true
            }
            _ => false,
        }
    }

    /// Toggle node expansion (expand if collapsed, collapse if expanded)
    pub fn toggle_node(&mut self, id: NodeId) -> bool {
        let expanded = self.get_node(id).is_some_and(|n| n.is_expanded());
        self.set_expanded(id, !expanded)
    }

    /// Set `id` and every descendant to `expand`, leaving the rest untouched.
    ///
    /// Returns the number of folders whose flag was set.
    pub fn set_subtree_expanded(&mut self, id: NodeId, expand: bool) -> usize {
        if self.get_node(id).is_none() {
            return 0;
        }
        self.set_expanded_from(vec![id], expand)
    }

    /// Set every folder in the forest to `expand`
    pub fn set_all_expanded(&mut self, expand: bool) -> usize {
        self.set_expanded_from(self.roots.clone(), expand)
    }

    /// Flip the whole forest to the opposite of the first top-level node's state.
    ///
    /// Returns the state applied, or None for an empty tree.
    pub fn toggle_all(&mut self) -> Option<bool> {
        let Some(first) = self.root_id().and_then(|id| self.get_node(id)) else {
            tracing::debug!("No items in the tree.");
            return None;
        };

        let is_expanded = first.is_expanded();
        tracing::debug!(
            "The tree is {}. Changing to {}.",
            if is_expanded { "expanded" } else { "collapsed" },
            if is_expanded { "collapsed" } else { "expanded" }
        );

        self.set_all_expanded(!is_expanded);
        Some(!is_expanded)
    }

    fn set_expanded_from(&mut self, mut stack: Vec<NodeId>, expand: bool) -> usize {
        let mut changed = 0;
        while let Some(id) = stack.pop() {
            let Some(node) = self.get_node_mut(id) else {
                tracing::warn!("Found an invalid item in the tree: {}", id);
                continue;
            };
            if node.can_expand() {
                tracing::trace!(
                    "{} item: {}",
                    if expand { "Expanding" } else { "Collapsing" },
                    node.name
                );
                node.state = if expand {
                    NodeState::Expanded
                } else {
                    NodeState::Collapsed
                };
                changed += 1;
            }
            stack.extend(node.children.iter().copied());
        }
        changed
    }

    /// Get all visible nodes in display order.
    ///
    /// A node is visible when every ancestor is expanded; top-level nodes
    /// always are.
    pub fn get_visible_nodes(&self) -> Vec<NodeId> {
        let mut visible = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            visible.push(id);
            if let Some(node) = self.get_node(id) {
                if node.is_expanded() {
                    stack.extend(node.children.iter().rev().copied());
                }
            }
        }

        visible
    }

    /// Visible nodes in display order, paired with their depth
    pub fn get_visible_nodes_with_depth(&self) -> Vec<(NodeId, usize)> {
        let mut visible = Vec::new();
        let mut stack: Vec<(NodeId, usize)> =
            self.roots.iter().rev().map(|&id| (id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            visible.push((id, depth));
            if let Some(node) = self.get_node(id) {
                if node.is_expanded() {
                    stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
                }
            }
        }

        visible
    }

    /// Get the parent chain for a node (from root to node)
    pub fn get_ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.get_node(id).map(|n| n.id);

        while let Some(node_id) = current {
            ancestors.push(node_id);
            current = self.get_node(node_id).and_then(|n| n.parent);
        }

        ancestors.reverse();
        ancestors
    }

    /// Get the depth of a node (top-level is 0)
    pub fn get_depth(&self, id: NodeId) -> usize {
        self.get_ancestors(id).len().saturating_sub(1)
    }

    /// Whether `id` lies in the subtree rooted at `ancestor` (inclusive)
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.get_ancestors(id).contains(&ancestor)
    }

    /// Whether every ancestor of `id` is expanded
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = self.get_node(id).and_then(|n| n.parent);
        while let Some(parent_id) = current {
            match self.get_node(parent_id) {
                Some(parent) if parent.is_expanded() => current = parent.parent,
                _ => return false,
            }
        }
        self.get_node(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fs::{LocalFsBackend, MemoryFsBackend};
    use proptest::prelude::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_dir.path();

        // Create test structure:
        // /
        // ├── dir1/
        // │   ├── file1.txt
        // │   └── file2.md
        // ├── dir2/
        // │   └── subdir/
        // │       └── file3.txt
        // ├── empty/
        // └── file4.txt

        std_fs::create_dir(temp_path.join("dir1")).unwrap();
        std_fs::write(temp_path.join("dir1/file1.txt"), "content1").unwrap();
        std_fs::write(temp_path.join("dir1/file2.md"), "content2").unwrap();

        std_fs::create_dir(temp_path.join("dir2")).unwrap();
        std_fs::create_dir(temp_path.join("dir2/subdir")).unwrap();
        std_fs::write(temp_path.join("dir2/subdir/file3.txt"), "content3").unwrap();

        std_fs::create_dir(temp_path.join("empty")).unwrap();
        std_fs::write(temp_path.join("file4.txt"), "content4").unwrap();

        temp_dir
    }

    fn build(path: &Path, show_files: bool) -> FileTree {
        let options = BuildOptions {
            show_files,
            ..BuildOptions::default()
        };
        FileTree::build(path, &LocalFsBackend::new(), &options).unwrap()
    }

    fn child_names(tree: &FileTree, id: NodeId) -> Vec<String> {
        tree.get_node(id)
            .unwrap()
            .children
            .iter()
            .map(|&c| tree.get_node(c).unwrap().name.clone())
            .collect()
    }

    fn states(tree: &FileTree) -> Vec<NodeState> {
        tree.all_nodes().map(|n| n.state.clone()).collect()
    }

    #[test]
    fn test_tree_creation() {
        let temp_dir = create_test_dir();
        let tree = build(temp_dir.path(), true);

        let root_id = tree.root_id().unwrap();
        let root = tree.get_node(root_id).unwrap();
        assert!(root.is_expanded());
        assert_eq!(root.type_label(), "Folder");
        assert_eq!(
            child_names(&tree, root_id),
            vec!["dir1", "dir2", "empty", "file4.txt"]
        );
        // Every folder below the root starts collapsed
        for &child in &root.children {
            let node = tree.get_node(child).unwrap();
            assert!(!node.is_expanded());
        }
    }

    #[test]
    fn test_demo_example() {
        let temp_dir = TempDir::new().unwrap();
        std_fs::create_dir(temp_dir.path().join("a")).unwrap();
        std_fs::write(temp_dir.path().join("b.txt"), "").unwrap();

        let tree = build(temp_dir.path(), true);
        let root_id = tree.root_id().unwrap();
        assert_eq!(child_names(&tree, root_id), vec!["a", "b.txt"]);

        let a = tree.find_child(root_id, "a").unwrap();
        assert!(tree.get_node(a).unwrap().is_dir());
        assert_eq!(child_names(&tree, a), vec![NO_FILES_LABEL]);
        let marker = tree.get_node(a).unwrap().children[0];
        assert!(tree.get_node(marker).unwrap().is_marker());

        let b = tree.find_child(root_id, "b.txt").unwrap();
        assert_eq!(tree.get_node(b).unwrap().type_label(), ".txt");
    }

    #[test]
    fn test_leaf_folder_with_files_shown_has_no_marker() {
        let temp_dir = create_test_dir();
        let tree = build(temp_dir.path(), true);

        let dir1 = tree.find_by_relative_path(Path::new("dir1")).unwrap();
        assert_eq!(child_names(&tree, dir1), vec!["file2.md", "file1.txt"]);
        assert!(tree
            .get_node(dir1)
            .unwrap()
            .children
            .iter()
            .all(|&c| !tree.get_node(c).unwrap().is_marker()));
    }

    #[test]
    fn test_leaf_folder_with_files_hidden_has_count_marker() {
        let temp_dir = create_test_dir();
        let tree = build(temp_dir.path(), false);

        let dir1 = tree.find_by_relative_path(Path::new("dir1")).unwrap();
        assert_eq!(child_names(&tree, dir1), vec!["2 files"]);

        let subdir = tree
            .find_by_relative_path(Path::new("dir2/subdir"))
            .unwrap();
        assert_eq!(child_names(&tree, subdir), vec!["1 files"]);
    }

    #[test]
    fn test_marker_suppressed_when_subfolders_exist() {
        let temp_dir = create_test_dir();
        let tree = build(temp_dir.path(), false);

        let root_id = tree.root_id().unwrap();
        // Root has files but also subfolders: no summary marker
        assert_eq!(child_names(&tree, root_id), vec!["dir1", "dir2", "empty"]);

        let dir2 = tree.find_by_relative_path(Path::new("dir2")).unwrap();
        assert_eq!(child_names(&tree, dir2), vec!["subdir"]);
    }

    #[test]
    fn test_sort_by_name_and_type() {
        let fs = MemoryFsBackend::new()
            .with_dir("/r/Zeta")
            .with_dir("/r/alpha")
            .with_file("/r/b.txt")
            .with_file("/r/A.rs")
            .with_file("/r/c.md");
        let mut tree = FileTree::build(Path::new("/r"), &fs, &BuildOptions::default()).unwrap();
        let root = tree.root_id().unwrap();

        // Default key is Type
        assert_eq!(
            child_names(&tree, root),
            vec!["alpha", "Zeta", "c.md", "A.rs", "b.txt"]
        );

        tree.sort(SortKey::Name, SortOrder::Ascending);
        assert_eq!(
            child_names(&tree, root),
            vec!["alpha", "Zeta", "A.rs", "b.txt", "c.md"]
        );

        tree.sort(SortKey::Name, SortOrder::Descending);
        assert_eq!(
            child_names(&tree, root),
            vec!["Zeta", "alpha", "c.md", "b.txt", "A.rs"]
        );

        // Folders tie under Type and fall back to name order
        tree.sort(SortKey::Type, SortOrder::Descending);
        assert_eq!(
            child_names(&tree, root),
            vec!["alpha", "Zeta", "b.txt", "A.rs", "c.md"]
        );
    }

    #[test]
    fn test_unreadable_folder_does_not_abort_scan() {
        let fs = MemoryFsBackend::new()
            .with_denied_dir("/r/locked")
            .with_file("/r/open/x.txt")
            .with_file("/r/y.txt");
        let tree = FileTree::build(Path::new("/r"), &fs, &BuildOptions::default()).unwrap();

        let locked = tree.find_by_relative_path(Path::new("locked")).unwrap();
        let node = tree.get_node(locked).unwrap();
        assert!(node.is_error());
        assert!(node.children.is_empty());

        let open = tree.find_by_relative_path(Path::new("open")).unwrap();
        assert_eq!(child_names(&tree, open), vec!["x.txt"]);
    }

    #[test]
    fn test_root_errors() {
        let fs = MemoryFsBackend::new().with_file("/r/file.txt");
        let options = BuildOptions::default();

        assert!(matches!(
            FileTree::build(Path::new("/missing"), &fs, &options),
            Err(ScanError::NotFound(_))
        ));
        assert!(matches!(
            FileTree::build(Path::new("/r/file.txt"), &fs, &options),
            Err(ScanError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_unreadable_root_fails_scan() {
        let fs = MemoryFsBackend::new().with_denied_dir("/r");
        let result = FileTree::build(Path::new("/r"), &fs, &BuildOptions::default());

        match result {
            Err(ScanError::Io { path, source }) => {
                assert_eq!(path, Path::new("/r"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected an I/O error, got {:?}", other.map(|t| t.node_count())),
        }
    }

    #[test]
    fn test_symlink_loop_is_not_followed() {
        let fs = MemoryFsBackend::new()
            .with_file("/r/sub/a.txt")
            .with_symlink("/r/sub/back", "/r");
        let tree = FileTree::build(Path::new("/r"), &fs, &BuildOptions::default()).unwrap();

        let back = tree.find_by_relative_path(Path::new("sub/back")).unwrap();
        assert_eq!(
            tree.get_node(back).unwrap().state,
            NodeState::Error("symlink loop".to_string())
        );
        assert!(fs.read_dir_calls() <= 3);
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let mut path = PathBuf::from("/r");
        for depth in 0..2_000 {
            path.push(format!("d{depth}"));
        }
        let fs = MemoryFsBackend::new().with_dir(&path);

        let mut tree = FileTree::build(Path::new("/r"), &fs, &BuildOptions::default()).unwrap();
        tree.set_all_expanded(true);
        // root + 2000 folders + one marker
        assert_eq!(tree.get_visible_nodes().len(), 2_002);
    }

    #[test]
    fn test_toggle_node() {
        let temp_dir = create_test_dir();
        let mut tree = build(temp_dir.path(), true);
        let dir1 = tree.find_by_relative_path(Path::new("dir1")).unwrap();

        assert!(tree.toggle_node(dir1));
        assert!(tree.get_node(dir1).unwrap().is_expanded());
        assert!(tree.toggle_node(dir1));
        assert!(tree.get_node(dir1).unwrap().is_collapsed());

        let file = tree.find_by_relative_path(Path::new("file4.txt")).unwrap();
        assert!(!tree.toggle_node(file));
    }

    #[test]
    fn test_get_visible_nodes() {
        let temp_dir = create_test_dir();
        let mut tree = build(temp_dir.path(), true);

        // root + 4 children
        assert_eq!(tree.get_visible_nodes().len(), 5);

        let dir1 = tree.find_by_relative_path(Path::new("dir1")).unwrap();
        tree.set_expanded(dir1, true);
        let visible = tree.get_visible_nodes();
        assert_eq!(visible.len(), 7);
        assert_eq!(visible[1], dir1);
        assert!(tree.is_visible(visible[2]));

        let file3 = tree
            .find_by_relative_path(Path::new("dir2/subdir/file3.txt"))
            .unwrap();
        assert!(!tree.is_visible(file3));
    }

    #[test]
    fn test_global_toggle_twice_restores_state() {
        let temp_dir = create_test_dir();
        let mut tree = build(temp_dir.path(), true);

        assert_eq!(tree.toggle_all(), Some(false));
        let collapsed = states(&tree);
        assert!(tree
            .all_nodes()
            .filter(|n| n.is_dir())
            .all(|n| n.is_collapsed()));

        assert_eq!(tree.toggle_all(), Some(true));
        assert_eq!(tree.toggle_all(), Some(false));
        assert_eq!(states(&tree), collapsed);
    }

    #[test]
    fn test_global_toggle_on_empty_tree() {
        let mut tree = FileTree::empty();
        assert_eq!(tree.toggle_all(), None);
        assert!(tree.get_visible_nodes().is_empty());
    }

    #[test]
    fn test_scoped_toggle_affects_only_subtree() {
        let temp_dir = create_test_dir();
        let mut tree = build(temp_dir.path(), true);
        let root = tree.root_id().unwrap();
        let dir2 = tree.find_by_relative_path(Path::new("dir2")).unwrap();
        let subdir = tree
            .find_by_relative_path(Path::new("dir2/subdir"))
            .unwrap();
        let dir1 = tree.find_by_relative_path(Path::new("dir1")).unwrap();

        let changed = tree.set_subtree_expanded(dir2, true);
        assert_eq!(changed, 2);
        assert!(tree.get_node(dir2).unwrap().is_expanded());
        assert!(tree.get_node(subdir).unwrap().is_expanded());
        assert!(tree.get_node(dir1).unwrap().is_collapsed());
        assert!(tree.get_node(root).unwrap().is_expanded());

        tree.set_subtree_expanded(root, false);
        assert!(tree
            .all_nodes()
            .filter(|n| n.is_dir())
            .all(|n| n.is_collapsed()));
    }

    #[test]
    fn test_get_ancestors_and_depth() {
        let temp_dir = create_test_dir();
        let tree = build(temp_dir.path(), true);
        let file3 = tree
            .find_by_relative_path(Path::new("dir2/subdir/file3.txt"))
            .unwrap();

        let ancestors = tree.get_ancestors(file3);
        assert_eq!(ancestors.len(), 4);
        assert_eq!(ancestors[0], tree.root_id().unwrap());
        assert_eq!(tree.get_depth(file3), 3);
        assert!(tree.is_within(file3, ancestors[1]));
    }

    proptest! {
        #[test]
        fn prop_scoped_toggle_leaves_outside_unchanged(
            target in 0usize..12,
            seed in prop::collection::vec(any::<bool>(), 12),
            expand in any::<bool>(),
        ) {
            let fs = MemoryFsBackend::new()
                .with_file("/r/a/a1/x.txt")
                .with_dir("/r/a/a2")
                .with_file("/r/b/b1/b11/y.rs")
                .with_file("/r/c.txt");
            let mut tree = FileTree::build(Path::new("/r"), &fs, &BuildOptions::default()).unwrap();
            for (i, flag) in seed.iter().enumerate() {
                tree.set_expanded(NodeId(i), *flag);
            }
            let target = NodeId(target % tree.node_count());
            let before = states(&tree);

            tree.set_subtree_expanded(target, expand);

            for node in tree.all_nodes() {
                if tree.is_within(node.id, target) {
                    if node.can_expand() {
                        prop_assert_eq!(node.is_expanded(), expand);
                    }
                } else {
                    prop_assert_eq!(&node.state, &before[node.id.0]);
                }
            }
        }
    }
}
