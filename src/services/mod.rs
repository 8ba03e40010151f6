//! Filesystem access, image export and process-level plumbing

pub mod fs;
pub mod log_dirs;
#[cfg(feature = "runtime")]
pub mod tracing_setup;
pub mod tree_image;
#[cfg(feature = "runtime")]
pub mod warning_log;
