//! Tracing subscriber setup
//!
//! The terminal front end logs to a file (the screen belongs to the tree);
//! headless exports log to stderr. Both honor `RUST_LOG`.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use super::warning_log::{self, WarningLogHandle, WarningLogLayer};

/// Initialize the global subscriber with file logging and warning capture.
///
/// Returns None if the log file cannot be created or a subscriber is
/// already installed.
pub fn init_global(log_file_path: &Path) -> Option<WarningLogHandle> {
    let log_file = File::create(log_file_path).ok()?;
    let (warning_layer, warning_handle) = warning_log::create();

    build_subscriber(log_file, Some(warning_layer))
        .try_init()
        .ok()?;

    Some(warning_handle)
}

/// Initialize the global subscriber writing to stderr at INFO by default
pub fn init_stderr() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Build a subscriber with file logging and an optional warning layer.
///
/// DEBUG is the default level; `RUST_LOG` overrides it.
pub fn build_subscriber(
    log_file: File,
    warning_layer: Option<WarningLogLayer>,
) -> impl tracing::Subscriber + Send + Sync {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .with(warning_layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_subscriber_writes_events() {
        let log_file = NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log_file.reopen().unwrap(), None);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("Cannot list /locked");
        });

        let contents = std::fs::read_to_string(log_file.path()).unwrap();
        assert!(contents.contains("WARN"));
        assert!(contents.contains("Cannot list /locked"));
    }

    #[test]
    fn test_file_subscriber_forwards_warnings() {
        let log_file = NamedTempFile::new().unwrap();
        let (layer, handle) = warning_log::create();
        let subscriber = build_subscriber(log_file.reopen().unwrap(), Some(layer));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("quiet");
            tracing::warn!("loud");
        });

        assert_eq!(handle.latest().as_deref(), Some("loud"));
    }
}
