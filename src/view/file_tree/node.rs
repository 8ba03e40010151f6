use std::fmt;
use std::path::PathBuf;

/// Unique identifier for a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Type label shown for every folder
pub const FOLDER_LABEL: &str = "Folder";

/// Type label for files without any extension
pub const UNKNOWN_LABEL: &str = "Unknown";

/// What a node stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    File {
        /// Extension including the dot, `""` for dotfiles, or `"Unknown"`
        type_label: String,
    },
    /// Synthetic summary leaf ("No files", "3 files")
    Marker,
}

impl NodeKind {
    /// Build a file kind from its name
    pub fn file(name: &str) -> Self {
        NodeKind::File {
            type_label: file_type_label(name),
        }
    }

    /// Text shown in the Type column
    pub fn type_label(&self) -> &str {
        match self {
            NodeKind::Folder => FOLDER_LABEL,
            NodeKind::File { type_label } => type_label,
            NodeKind::Marker => "",
        }
    }
}

/// Icon drawn in front of the name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Folder,
    Document,
    Image,
    Archive,
    Code,
    Generic,
    None,
}

impl Icon {
    pub fn for_kind(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Folder => Icon::Folder,
            NodeKind::Marker => Icon::None,
            NodeKind::File { type_label } => {
                let ext = type_label.trim_start_matches('.').to_ascii_lowercase();
                match ext.as_str() {
                    "txt" | "md" | "pdf" | "doc" | "docx" | "odt" | "rtf" | "csv" => {
                        Icon::Document
                    }
                    "png" | "jpg" | "jpeg" | "gif" | "bmp" | "svg" | "webp" | "ico" => Icon::Image,
                    "zip" | "gz" | "tar" | "xz" | "bz2" | "7z" | "rar" | "zst" => Icon::Archive,
                    "rs" | "py" | "js" | "ts" | "c" | "h" | "cpp" | "go" | "java" | "sh"
                    | "toml" | "json" | "yaml" | "yml" | "html" | "css" => Icon::Code,
                    _ => Icon::Generic,
                }
            }
        }
    }

    /// Single-cell symbol for terminal rendering
    pub fn symbol(&self) -> &'static str {
        match self {
            Icon::Folder => "▣",
            Icon::Document => "≡",
            Icon::Image => "◩",
            Icon::Archive => "▤",
            Icon::Code => "‹",
            Icon::Generic => "·",
            Icon::None => " ",
        }
    }
}

/// Extension label for a file name.
///
/// A name without any dot is `"Unknown"`. Otherwise the label is the suffix
/// from the last dot, where dots leading the name are not separators, so
/// `.bashrc` has an empty label and `file.` has label `"."`.
pub fn file_type_label(name: &str) -> String {
    if !name.contains('.') {
        return UNKNOWN_LABEL.to_string();
    }

    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name.rfind('.') {
        Some(dot) if dot > stem_start => name[dot..].to_string(),
        _ => String::new(),
    }
}

/// Represents a node in the file tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Unique identifier
    pub id: NodeId,
    /// Display name
    pub name: String,
    pub kind: NodeKind,
    pub icon: Icon,
    /// Backing path (None for markers)
    pub path: Option<PathBuf>,
    /// Parent node ID (None for top-level nodes)
    pub parent: Option<NodeId>,
    /// Child node IDs, in display order
    pub children: Vec<NodeId>,
    /// Current state of the node
    pub state: NodeState,
}

impl TreeNode {
    /// Create a new tree node; folders start collapsed
    pub fn new(id: NodeId, name: String, kind: NodeKind, path: Option<PathBuf>) -> Self {
        let state = if kind == NodeKind::Folder {
            NodeState::Collapsed
        } else {
            NodeState::Leaf
        };
        let icon = Icon::for_kind(&kind);

        Self {
            id,
            name,
            kind,
            icon,
            path,
            parent: None,
            children: Vec::new(),
            state,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn is_marker(&self) -> bool {
        self.kind == NodeKind::Marker
    }

    pub fn is_expanded(&self) -> bool {
        self.state == NodeState::Expanded
    }

    pub fn is_collapsed(&self) -> bool {
        self.state == NodeState::Collapsed
    }

    pub fn is_error(&self) -> bool {
        matches!(self.state, NodeState::Error(_))
    }

    pub fn is_leaf(&self) -> bool {
        self.state == NodeState::Leaf
    }

    /// Whether the expand flag of this node may change
    pub fn can_expand(&self) -> bool {
        self.is_expanded() || self.is_collapsed()
    }

    /// Text shown in the Type column
    pub fn type_label(&self) -> &str {
        self.kind.type_label()
    }
}

/// State of a tree node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    /// Folder with hidden children
    Collapsed,
    /// Folder with visible children
    Expanded,
    /// Folder whose listing failed (with error message)
    Error(String),
    /// File or marker, cannot be expanded
    Leaf,
}
