//! Configuration discovery and loading.
//!
//! The only configuration layer is the user file
//! `<config_dir>/treeshot/config.json`, or a file named on the command line.

use crate::config::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// System directories the application reads from
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    /// e.g. ~/.config/treeshot on Linux
    pub config_dir: PathBuf,

    /// Starting point when no folder is given
    pub home_dir: Option<PathBuf>,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories
    pub fn from_system() -> std::io::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join("treeshot");

        Ok(Self {
            config_dir,
            home_dir: dirs::home_dir(),
        })
    }

    /// Create a DirectoryContext rooted in a temp directory
    pub fn for_testing(temp_dir: &Path) -> Self {
        Self {
            config_dir: temp_dir.join("config"),
            home_dir: Some(temp_dir.join("home")),
        }
    }

    /// Path of the user config file
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}

/// Load the effective configuration.
///
/// An explicitly named file must exist and parse. The default user file is
/// optional: when it is missing the defaults apply, and when it is broken a
/// warning is logged and the defaults apply.
pub fn load(dir_context: &DirectoryContext, explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        let config = Config::load_from_file(path)?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    let path = dir_context.config_path();
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    match Config::load_from_file(&path) {
        Ok(config) => {
            tracing::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        Err(e) => {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Ok(Config::default())
        }
    }
}
