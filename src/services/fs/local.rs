use super::backend::{FsBackend, FsEntry, FsEntryType};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Local filesystem backend using `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFsBackend;

impl LocalFsBackend {
    pub fn new() -> Self {
        Self
    }

    /// Classify an entry the way `stat` sees it: symlinks resolve to their
    /// target, and a dangling link is `Other`.
    fn classify(path: &Path, file_type: fs::FileType) -> (FsEntryType, bool) {
        if file_type.is_symlink() {
            let entry_type = match fs::metadata(path) {
                Ok(meta) if meta.is_dir() => FsEntryType::Directory,
                Ok(meta) if meta.is_file() => FsEntryType::File,
                _ => FsEntryType::Other,
            };
            (entry_type, true)
        } else if file_type.is_dir() {
            (FsEntryType::Directory, false)
        } else if file_type.is_file() {
            (FsEntryType::File, false)
        } else {
            (FsEntryType::Other, false)
        }
    }
}

impl FsBackend for LocalFsBackend {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        let mut entries = Vec::new();

        for dir_entry in fs::read_dir(path)? {
            let dir_entry = match dir_entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry in {:?}: {}", path, e);
                    continue;
                }
            };

            let entry_path = dir_entry.path();
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            let file_type = match dir_entry.file_type() {
                Ok(ft) => ft,
                Err(e) => {
                    tracing::debug!("Cannot stat {:?}: {}", entry_path, e);
                    continue;
                }
            };

            let (entry_type, is_symlink) = Self::classify(&entry_path, file_type);
            entries.push(FsEntry::new(entry_path, name, entry_type).with_symlink(is_symlink));
        }

        Ok(entries)
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::metadata(path)?.is_dir())
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}
