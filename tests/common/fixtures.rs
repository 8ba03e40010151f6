use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use treeshot::app::Session;
use treeshot::config::Config;
use treeshot::services::fs::LocalFsBackend;

/// A scratch directory laid out from a list of relative paths.
///
/// Entries ending in `/` become folders, everything else an empty file.
pub struct Fixture {
    _dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    pub fn new(entries: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("project");
        fs::create_dir(&root).unwrap();

        for entry in entries {
            let path = root.join(entry.trim_end_matches('/'));
            if entry.ends_with('/') {
                fs::create_dir_all(&path).unwrap();
            } else {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).unwrap();
                }
                fs::write(&path, b"").unwrap();
            }
        }

        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A path next to (not inside) the scanned folder
    pub fn output(&self, name: &str) -> PathBuf {
        self._dir.path().join(name)
    }
}

pub fn local_session(config: &Config) -> Session {
    Session::new(Box::new(LocalFsBackend::new()), config)
}

/// Visible rows as "<indent><name>" using two spaces per level
pub fn visible_rows(session: &Session) -> Vec<String> {
    let tree = session.tree();
    tree.get_visible_nodes_with_depth()
        .into_iter()
        .map(|(id, depth)| {
            let node = tree.get_node(id).unwrap();
            format!("{}{}", "  ".repeat(depth), node.name)
        })
        .collect()
}
