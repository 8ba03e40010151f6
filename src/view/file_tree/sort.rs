use super::node::{NodeKind, TreeNode};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Column the tree is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    /// Extension; only discriminates among files
    #[default]
    Type,
}

impl SortKey {
    /// Column header text
    pub fn title(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Type => "Type",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Name => "name",
            SortKey::Type => "type",
        })
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "type" => Ok(SortKey::Type),
            other => Err(format!("unknown sort key '{other}' (expected 'name' or 'type')")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
        }
    }
}

/// Rank that dominates key comparison: folders, then files, then markers
fn kind_rank(kind: &NodeKind) -> u8 {
    match kind {
        NodeKind::Folder => 0,
        NodeKind::File { .. } => 1,
        NodeKind::Marker => 2,
    }
}

/// Case-insensitive name order with a case-sensitive tiebreak so the
/// result is total and deterministic
pub fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Order two siblings.
///
/// Folders always come before files whatever the key or order; `order`
/// only reverses the key comparison within one kind. Under `SortKey::Type`
/// two folders compare equal; `FileTree::sort` breaks such ties by name.
pub fn compare_nodes(a: &TreeNode, b: &TreeNode, key: SortKey, order: SortOrder) -> Ordering {
    let rank = kind_rank(&a.kind).cmp(&kind_rank(&b.kind));
    if rank != Ordering::Equal {
        return rank;
    }

    let by_key = match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Type => a
            .type_label()
            .to_lowercase()
            .cmp(&b.type_label().to_lowercase()),
    };

    match order {
        SortOrder::Ascending => by_key,
        SortOrder::Descending => by_key.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::file_tree::node::NodeId;
    use proptest::prelude::*;

    fn folder(name: &str) -> TreeNode {
        TreeNode::new(NodeId(0), name.to_string(), NodeKind::Folder, None)
    }

    fn file(name: &str) -> TreeNode {
        TreeNode::new(NodeId(0), name.to_string(), NodeKind::file(name), None)
    }

    #[test]
    fn test_folder_before_file_for_every_key_and_order() {
        let dir = folder("zzz");
        let f = file("aaa.txt");

        for key in [SortKey::Name, SortKey::Type] {
            for order in [SortOrder::Ascending, SortOrder::Descending] {
                assert_eq!(compare_nodes(&dir, &f, key, order), Ordering::Less);
                assert_eq!(compare_nodes(&f, &dir, key, order), Ordering::Greater);
            }
        }
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let a = file("Beta.txt");
        let b = file("alpha.txt");

        assert_eq!(
            compare_nodes(&a, &b, SortKey::Name, SortOrder::Ascending),
            Ordering::Greater
        );
        assert_eq!(
            compare_nodes(&a, &b, SortKey::Name, SortOrder::Descending),
            Ordering::Less
        );
    }

    #[test]
    fn test_type_sorts_files_by_extension() {
        let md = file("z.MD");
        let rs = file("a.rs");

        assert_eq!(
            compare_nodes(&md, &rs, SortKey::Type, SortOrder::Ascending),
            Ordering::Less
        );
    }

    #[test]
    fn test_type_does_not_discriminate_folders() {
        assert_eq!(
            compare_nodes(&folder("b"), &folder("a"), SortKey::Type, SortOrder::Ascending),
            Ordering::Equal
        );
    }

    #[test]
    fn test_marker_sorts_last() {
        let marker = TreeNode::new(NodeId(0), "No files".to_string(), NodeKind::Marker, None);

        assert_eq!(
            compare_nodes(&marker, &file("a"), SortKey::Name, SortOrder::Descending),
            Ordering::Greater
        );
    }

    #[test]
    fn test_name_order_tiebreak() {
        assert_eq!(name_order("a", "B"), Ordering::Less);
        assert_eq!(name_order("B", "b"), Ordering::Less);
        assert_eq!(name_order("b", "b"), Ordering::Equal);
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("Name".parse::<SortKey>().unwrap(), SortKey::Name);
        assert_eq!("type".parse::<SortKey>().unwrap(), SortKey::Type);
        assert!("size".parse::<SortKey>().is_err());
    }

    proptest! {
        #[test]
        fn prop_sorted_siblings_put_folders_first(
            entries in prop::collection::vec(("[a-zA-Z]{1,6}(\\.[a-z]{1,3})?", any::<bool>()), 0..24),
            by_type in any::<bool>(),
            descending in any::<bool>(),
        ) {
            let key = if by_type { SortKey::Type } else { SortKey::Name };
            let order = if descending { SortOrder::Descending } else { SortOrder::Ascending };
            let mut nodes: Vec<TreeNode> = entries
                .iter()
                .map(|(name, is_dir)| if *is_dir { folder(name) } else { file(name) })
                .collect();

            nodes.sort_by(|a, b| compare_nodes(a, b, key, order));

            let first_file = nodes.iter().position(|n| n.is_file()).unwrap_or(nodes.len());
            prop_assert!(nodes[first_file..].iter().all(|n| n.is_file()));
        }
    }
}
