//! Log file locations
//!
//! Logs go to `<state dir>/treeshot/logs/` (typically
//! `~/.local/state/treeshot/logs/`), falling back to the system temp
//! directory when no state directory is available or it cannot be created.
//! Each process writes its own `treeshot-{PID}.log`.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Cached log directory path
static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get the log directory, creating it if necessary
pub fn log_dir() -> &'static PathBuf {
    LOG_DIR.get_or_init(|| {
        let fallback = std::env::temp_dir().join("treeshot-logs");
        let dir = dirs::state_dir()
            .map(|d| d.join("treeshot").join("logs"))
            .unwrap_or_else(|| fallback.clone());

        if let Err(e) = fs::create_dir_all(&dir) {
            eprintln!("Failed to create log directory {:?}: {}", dir, e);
            let _ = fs::create_dir_all(&fallback);
            return fallback;
        }

        dir
    })
}

/// Get the path for this process's log file.
///
/// Returns `{log_dir}/treeshot-{PID}.log`
pub fn main_log_path() -> PathBuf {
    log_dir().join(format!("treeshot-{}.log", std::process::id()))
}
