//! In-memory filesystem backend
//!
//! Holds a fixed hierarchy of directories, files, symlinks and unreadable
//! directories. Used by tests to exercise permission failures and symlink
//! loops deterministically, independent of the user the tests run as.

use super::backend::{FsBackend, FsEntry, FsEntryType};
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Follow at most this many links while resolving a path
const MAX_LINK_HOPS: usize = 40;

#[derive(Debug, Clone)]
enum MemNode {
    Dir,
    File,
    /// Directory whose listing fails with `PermissionDenied`
    Denied,
    Link(PathBuf),
}

#[derive(Debug, Default)]
pub struct MemoryFsBackend {
    nodes: HashMap<PathBuf, MemNode>,
    /// Child names per directory path
    children: HashMap<PathBuf, BTreeSet<String>>,
    read_dir_calls: Cell<usize>,
}

impl MemoryFsBackend {
    /// Create an empty filesystem containing only `/`
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(PathBuf::from("/"), MemNode::Dir);
        Self {
            nodes,
            children: HashMap::new(),
            read_dir_calls: Cell::new(0),
        }
    }

    /// Add a directory (and any missing parents)
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), MemNode::Dir);
        self
    }

    /// Add a file (and any missing parent directories)
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), MemNode::File);
        self
    }

    /// Add a directory that exists but cannot be listed
    pub fn with_denied_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), MemNode::Denied);
        self
    }

    /// Add a symlink pointing at an absolute target
    pub fn with_symlink(mut self, path: impl AsRef<Path>, target: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), MemNode::Link(target.as_ref().to_path_buf()));
        self
    }

    /// Number of `read_dir` calls served so far
    pub fn read_dir_calls(&self) -> usize {
        self.read_dir_calls.get()
    }

    fn insert(&mut self, path: &Path, node: MemNode) {
        let mut current = path;
        while let (Some(dir), Some(name)) = (current.parent(), current.file_name()) {
            self.children
                .entry(dir.to_path_buf())
                .or_default()
                .insert(name.to_string_lossy().into_owned());
            if self.nodes.contains_key(dir) {
                break;
            }
            self.nodes.insert(dir.to_path_buf(), MemNode::Dir);
            current = dir;
        }
        self.nodes.insert(path.to_path_buf(), node);
    }

    /// Resolve every symlink along `path`
    fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        match self.nodes.get(path) {
            Some(MemNode::Link(_)) | None => {}
            Some(_) => return Ok(path.to_path_buf()),
        }

        let mut hops = 0;
        let mut current = PathBuf::from("/");

        for component in path.components() {
            match component {
                Component::RootDir | Component::Prefix(_) | Component::CurDir => continue,
                Component::ParentDir => {
                    current.pop();
                    continue;
                }
                Component::Normal(part) => current.push(part),
            }

            while let Some(MemNode::Link(target)) = self.nodes.get(&current) {
                hops += 1;
                if hops > MAX_LINK_HOPS {
                    return Err(io::Error::new(
                        io::ErrorKind::Other,
                        format!("Too many levels of symbolic links: {:?}", path),
                    ));
                }
                current = self.resolve(target)?;
            }

            if !self.nodes.contains_key(&current) {
                return Err(not_found(path));
            }
        }

        Ok(current)
    }

    fn entry_type_of(&self, path: &Path) -> FsEntryType {
        match self.resolve(path).ok().and_then(|p| self.nodes.get(&p)) {
            Some(MemNode::Dir) | Some(MemNode::Denied) => FsEntryType::Directory,
            Some(MemNode::File) => FsEntryType::File,
            Some(MemNode::Link(_)) | None => FsEntryType::Other,
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("No such file or directory: {:?}", path),
    )
}

impl FsBackend for MemoryFsBackend {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        self.read_dir_calls.set(self.read_dir_calls.get() + 1);

        let resolved = self.resolve(path)?;
        match self.nodes.get(&resolved) {
            Some(MemNode::Dir) => {}
            Some(MemNode::Denied) => {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("Permission denied: {:?}", path),
                ))
            }
            Some(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Not a directory: {:?}", path),
                ))
            }
            None => return Err(not_found(path)),
        }

        let entries = self
            .children
            .get(&resolved)
            .into_iter()
            .flatten()
            .map(|name| {
                let child = resolved.join(name);
                let is_symlink = matches!(self.nodes.get(&child), Some(MemNode::Link(_)));
                let entry_type = self.entry_type_of(&child);
                FsEntry::new(path.join(name), name.clone(), entry_type).with_symlink(is_symlink)
            })
            .collect();

        Ok(entries)
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        let resolved = self.resolve(path)?;
        Ok(matches!(
            self.nodes.get(&resolved),
            Some(MemNode::Dir) | Some(MemNode::Denied)
        ))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.resolve(path)
    }
}
