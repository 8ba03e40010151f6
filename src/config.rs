use crate::view::file_tree::{SortKey, SortOrder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme_name")]
    pub theme: String,

    #[serde(default)]
    pub tree: TreeConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

fn default_theme_name() -> String {
    "light".to_string()
}

/// How the tree is scanned and ordered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// List files individually instead of summarizing them in a marker
    #[serde(default = "default_true")]
    pub show_files: bool,

    #[serde(default)]
    pub sort_key: SortKey,

    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_true() -> bool {
    true
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            show_files: true,
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// Image export layout, in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Canvas width used when no widget width is known (headless export)
    #[serde(default = "default_export_width")]
    pub width: u32,

    #[serde(default = "default_row_height")]
    pub row_height: u32,

    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Space around the tree on every side
    #[serde(default = "default_padding")]
    pub padding: u32,

    /// Horizontal offset per tree level
    #[serde(default = "default_indent")]
    pub indent: u32,

    /// Width reserved for the Type column
    #[serde(default = "default_type_column_width")]
    pub type_column_width: u32,

    /// TrueType/OpenType font; system fonts are searched when unset
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

fn default_export_width() -> u32 {
    800
}

fn default_row_height() -> u32 {
    22
}

fn default_font_size() -> f32 {
    14.0
}

fn default_padding() -> u32 {
    8
}

fn default_indent() -> u32 {
    20
}

fn default_type_column_width() -> u32 {
    140
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: default_export_width(),
            row_height: default_row_height(),
            font_size: default_font_size(),
            padding: default_padding(),
            indent: default_indent(),
            type_column_width: default_type_column_width(),
            font_path: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            tree: TreeConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file; absent fields take defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export.width == 0 {
            return Err(ConfigError::Validation(
                "export.width must be greater than 0".to_string(),
            ));
        }

        if self.export.row_height == 0 {
            return Err(ConfigError::Validation(
                "export.row_height must be greater than 0".to_string(),
            ));
        }

        if !self.export.font_size.is_finite() || self.export.font_size <= 0.0 {
            return Err(ConfigError::Validation(
                "export.font_size must be a positive number".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}
