use crate::services::fs::{FsBackend, FsEntry, FsEntryType};
use std::io;
use std::path::Path;

/// Immediate contents of one folder, split by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Subfolders (unordered)
    pub folders: Vec<FsEntry>,
    /// Files, only populated when files are shown
    pub files: Vec<FsEntry>,
    /// Number of regular files, counted even when they are hidden
    pub file_count: usize,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.file_count == 0
    }
}

/// Lists one directory level through a filesystem backend
pub struct DirectoryWalker<'a> {
    backend: &'a dyn FsBackend,
    show_files: bool,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(backend: &'a dyn FsBackend, show_files: bool) -> Self {
        Self {
            backend,
            show_files,
        }
    }

    /// List the immediate children of `path`
    ///
    /// Entries that are neither directories nor regular files are skipped.
    ///
    /// # Errors
    ///
    /// Returns the backend error when `path` cannot be read.
    pub fn list(&self, path: &Path) -> io::Result<Listing> {
        let mut listing = Listing::default();

        for entry in self.backend.read_dir(path)? {
            match entry.entry_type {
                FsEntryType::Directory => listing.folders.push(entry),
                FsEntryType::File => {
                    listing.file_count += 1;
                    if self.show_files {
                        listing.files.push(entry);
                    }
                }
                FsEntryType::Other => {
                    tracing::trace!("Skipping special entry {:?}", entry.path);
                }
            }
        }

        Ok(listing)
    }
}
