// Filesystem abstraction layer for pluggable, synchronous directory listing
//
// The tree builder only ever reads directories, so the backend surface is
// limited to listing, directory checks and canonicalization.

pub mod backend;
pub mod local;
pub mod memory;

pub use backend::{FsBackend, FsEntry, FsEntryType};
pub use local::LocalFsBackend;
pub use memory::MemoryFsBackend;
