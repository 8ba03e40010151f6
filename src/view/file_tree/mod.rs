// File tree module for the materialized directory hierarchy
//
// The tree is read from disk in one depth-first pass and held as a pure
// data structure; rendering (terminal or image) only reads it.

pub mod node;
pub mod sort;
pub mod tree;
pub mod view;
pub mod walker;

pub use node::{file_type_label, Icon, NodeId, NodeKind, NodeState, TreeNode};
pub use sort::{compare_nodes, SortKey, SortOrder};
pub use tree::{BuildOptions, FileTree, ScanError, NO_FILES_LABEL};
pub use view::FileTreeView;
pub use walker::{DirectoryWalker, Listing};
