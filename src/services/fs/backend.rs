use std::io;
use std::path::{Path, PathBuf};

/// Represents a file or directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub name: String,
    pub entry_type: FsEntryType,
    /// True when the entry itself is a symlink (entry_type describes the target)
    pub is_symlink: bool,
}

impl FsEntry {
    pub fn new(path: PathBuf, name: String, entry_type: FsEntryType) -> Self {
        Self {
            path,
            name,
            entry_type,
            is_symlink: false,
        }
    }

    pub fn with_symlink(mut self, is_symlink: bool) -> Self {
        self.is_symlink = is_symlink;
        self
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == FsEntryType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == FsEntryType::File
    }
}

/// Type of filesystem entry, resolved through symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsEntryType {
    File,
    Directory,
    /// Anything that is neither a regular file nor a directory
    /// (broken symlinks, sockets, fifos, devices)
    Other,
}

/// Synchronous filesystem backend
///
/// Abstracts directory enumeration so the tree can be built from the local
/// disk or from an in-memory fixture.
pub trait FsBackend {
    /// List entries in a directory (non-recursive, unordered)
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read (permission denied,
    /// doesn't exist, not a directory, etc.)
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>>;

    /// Check if path is a directory (following symlinks)
    fn is_dir(&self, path: &Path) -> io::Result<bool>;

    /// Get canonical (absolute, normalized) path
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}
