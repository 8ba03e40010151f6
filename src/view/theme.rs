use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable color representation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ColorDef {
    /// RGB color as [r, g, b]
    Rgb(u8, u8, u8),
    /// Named color
    Named(String),
}

impl From<ColorDef> for Color {
    fn from(def: ColorDef) -> Self {
        match def {
            ColorDef::Rgb(r, g, b) => Color::Rgb(r, g, b),
            ColorDef::Named(name) => match name.as_str() {
                "Black" => Color::Black,
                "Red" => Color::Red,
                "Green" => Color::Green,
                "Yellow" => Color::Yellow,
                "Blue" => Color::Blue,
                "Magenta" => Color::Magenta,
                "Cyan" => Color::Cyan,
                "Gray" => Color::Gray,
                "DarkGray" => Color::DarkGray,
                "LightRed" => Color::LightRed,
                "LightGreen" => Color::LightGreen,
                "LightYellow" => Color::LightYellow,
                "LightBlue" => Color::LightBlue,
                "LightMagenta" => Color::LightMagenta,
                "LightCyan" => Color::LightCyan,
                "White" => Color::White,
                // Default/Reset uses the terminal's default color
                "Default" | "Reset" => Color::Reset,
                _ => Color::White,
            },
        }
    }
}

/// Serializable theme definition (matches JSON structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThemeFile {
    name: String,
    tree: TreeColors,
    ui: UiColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TreeColors {
    bg: ColorDef,
    fg: ColorDef,
    header_bg: ColorDef,
    header_fg: ColorDef,
    selection_bg: ColorDef,
    selection_fg: ColorDef,
    folder_fg: ColorDef,
    type_fg: ColorDef,
    marker_fg: ColorDef,
    #[serde(default = "default_error_fg")]
    error_fg: ColorDef,
    #[serde(default = "default_guide_fg")]
    guide_fg: ColorDef,
    folder_icon: ColorDef,
    file_icon: ColorDef,
}

fn default_error_fg() -> ColorDef {
    ColorDef::Named("Red".to_string())
}
fn default_guide_fg() -> ColorDef {
    ColorDef::Named("DarkGray".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UiColors {
    status_bar_bg: ColorDef,
    status_bar_fg: ColorDef,
    popup_bg: ColorDef,
    popup_fg: ColorDef,
    popup_border_fg: ColorDef,
    popup_selection_bg: ColorDef,
    #[serde(default = "default_prompt_bg")]
    prompt_bg: ColorDef,
    #[serde(default = "default_prompt_fg")]
    prompt_fg: ColorDef,
}

fn default_prompt_bg() -> ColorDef {
    ColorDef::Named("Black".to_string())
}
fn default_prompt_fg() -> ColorDef {
    ColorDef::Named("White".to_string())
}

/// Colors for the terminal view and the exported image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,

    // Tree
    pub tree_bg: Color,
    pub tree_fg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub folder_fg: Color,
    pub type_fg: Color,
    pub marker_fg: Color,
    pub error_fg: Color,
    pub guide_fg: Color,
    pub folder_icon: Color,
    pub file_icon: Color,

    // Chrome
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub popup_bg: Color,
    pub popup_fg: Color,
    pub popup_border_fg: Color,
    pub popup_selection_bg: Color,
    pub prompt_bg: Color,
    pub prompt_fg: Color,
}

impl From<ThemeFile> for Theme {
    fn from(file: ThemeFile) -> Self {
        Self {
            name: file.name,
            tree_bg: file.tree.bg.into(),
            tree_fg: file.tree.fg.into(),
            header_bg: file.tree.header_bg.into(),
            header_fg: file.tree.header_fg.into(),
            selection_bg: file.tree.selection_bg.into(),
            selection_fg: file.tree.selection_fg.into(),
            folder_fg: file.tree.folder_fg.into(),
            type_fg: file.tree.type_fg.into(),
            marker_fg: file.tree.marker_fg.into(),
            error_fg: file.tree.error_fg.into(),
            guide_fg: file.tree.guide_fg.into(),
            folder_icon: file.tree.folder_icon.into(),
            file_icon: file.tree.file_icon.into(),
            status_bar_bg: file.ui.status_bar_bg.into(),
            status_bar_fg: file.ui.status_bar_fg.into(),
            popup_bg: file.ui.popup_bg.into(),
            popup_fg: file.ui.popup_fg.into(),
            popup_border_fg: file.ui.popup_border_fg.into(),
            popup_selection_bg: file.ui.popup_selection_bg.into(),
            prompt_bg: file.ui.prompt_bg.into(),
            prompt_fg: file.ui.prompt_fg.into(),
        }
    }
}

impl Theme {
    /// Load theme from a JSON file
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read theme file: {}", e))?;
        let theme_file: ThemeFile = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse theme file: {}", e))?;
        Ok(theme_file.into())
    }

    /// Load a user theme from `<config_dir>/treeshot/themes/<name>.json`
    fn load_user_theme(name: &str) -> Option<Self> {
        let path = dirs::config_dir()?
            .join("treeshot")
            .join("themes")
            .join(format!("{}.json", name));
        if !path.exists() {
            return None;
        }

        match Self::from_file(&path) {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!("Ignoring theme {:?}: {}", path, e);
                None
            }
        }
    }

    /// White canvas with dark text
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            tree_bg: Color::Rgb(255, 255, 255),
            tree_fg: Color::Rgb(30, 30, 30),
            header_bg: Color::Rgb(240, 240, 240),
            header_fg: Color::Rgb(60, 60, 60),
            selection_bg: Color::Rgb(204, 232, 255),
            selection_fg: Color::Rgb(0, 0, 0),
            folder_fg: Color::Rgb(30, 30, 30),
            type_fg: Color::Rgb(100, 100, 100),
            marker_fg: Color::Rgb(140, 140, 140),
            error_fg: Color::Rgb(200, 40, 40),
            guide_fg: Color::Rgb(220, 220, 220),
            folder_icon: Color::Rgb(230, 180, 60),
            file_icon: Color::Rgb(120, 150, 190),
            status_bar_bg: Color::Rgb(220, 220, 220),
            status_bar_fg: Color::Rgb(0, 0, 0),
            popup_bg: Color::Rgb(250, 250, 250),
            popup_fg: Color::Rgb(30, 30, 30),
            popup_border_fg: Color::Rgb(140, 140, 140),
            popup_selection_bg: Color::Rgb(204, 232, 255),
            prompt_bg: Color::Rgb(240, 240, 240),
            prompt_fg: Color::Rgb(0, 0, 0),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            tree_bg: Color::Rgb(30, 30, 30),
            tree_fg: Color::Rgb(212, 212, 212),
            header_bg: Color::Rgb(45, 45, 45),
            header_fg: Color::Rgb(200, 200, 200),
            selection_bg: Color::Rgb(38, 79, 120),
            selection_fg: Color::Rgb(255, 255, 255),
            folder_fg: Color::Rgb(220, 220, 170),
            type_fg: Color::Rgb(150, 150, 150),
            marker_fg: Color::Rgb(110, 110, 110),
            error_fg: Color::Rgb(244, 71, 71),
            guide_fg: Color::Rgb(60, 60, 60),
            folder_icon: Color::Rgb(220, 180, 80),
            file_icon: Color::Rgb(86, 156, 214),
            status_bar_bg: Color::Rgb(0, 122, 204),
            status_bar_fg: Color::Rgb(255, 255, 255),
            popup_bg: Color::Rgb(37, 37, 38),
            popup_fg: Color::Rgb(204, 204, 204),
            popup_border_fg: Color::Rgb(90, 90, 90),
            popup_selection_bg: Color::Rgb(9, 71, 113),
            prompt_bg: Color::Rgb(20, 20, 20),
            prompt_fg: Color::White,
        }
    }

    /// Get a theme by name, defaults to light if not found.
    ///
    /// A user theme file with the same name takes precedence over the
    /// built-in one.
    pub fn from_name(name: &str) -> Self {
        let normalized_name = name.to_lowercase().replace('_', "-");

        if let Some(theme) = Self::load_user_theme(&normalized_name) {
            return theme;
        }

        match normalized_name.as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            other => {
                tracing::warn!("{}", unknown_theme_message(other));
                Self::light()
            }
        }
    }

    /// Get all available theme names (builtin + user themes)
    pub fn available_themes() -> Vec<String> {
        let mut themes: Vec<String> = vec!["light".to_string(), "dark".to_string()];

        if let Some(config_dir) = dirs::config_dir() {
            let user_themes_dir = config_dir.join("treeshot").join("themes");
            if let Ok(entries) = std::fs::read_dir(&user_themes_dir) {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == "json") {
                        if let Some(stem) = path.file_stem() {
                            let name = stem.to_string_lossy().to_string();
                            if !themes.iter().any(|t| t == &name) {
                                themes.push(name);
                            }
                        }
                    }
                }
            }
        }

        themes
    }
}

/// Warning for a theme name that matches neither a built-in nor a user theme
fn unknown_theme_message(name: &str) -> String {
    format!(
        "Unknown theme '{}', using light (available: {})",
        name,
        Theme::available_themes().join(", ")
    )
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Resolve a terminal color to RGB for rasterization.
///
/// Indexed and named colors map to the xterm defaults; `Reset` has no
/// value of its own and yields `fallback`.
pub fn to_rgb(color: Color, fallback: [u8; 3]) -> [u8; 3] {
    match color {
        Color::Rgb(r, g, b) => [r, g, b],
        Color::Reset => fallback,
        Color::Black => [0, 0, 0],
        Color::Red => [205, 0, 0],
        Color::Green => [0, 205, 0],
        Color::Yellow => [205, 205, 0],
        Color::Blue => [0, 0, 238],
        Color::Magenta => [205, 0, 205],
        Color::Cyan => [0, 205, 205],
        Color::Gray => [229, 229, 229],
        Color::DarkGray => [127, 127, 127],
        Color::LightRed => [255, 0, 0],
        Color::LightGreen => [0, 255, 0],
        Color::LightYellow => [255, 255, 0],
        Color::LightBlue => [92, 92, 255],
        Color::LightMagenta => [255, 0, 255],
        Color::LightCyan => [0, 255, 255],
        Color::White => [255, 255, 255],
        Color::Indexed(i) => indexed_to_rgb(i),
    }
}

fn indexed_to_rgb(index: u8) -> [u8; 3] {
    const BASE: [[u8; 3]; 16] = [
        [0, 0, 0],
        [205, 0, 0],
        [0, 205, 0],
        [205, 205, 0],
        [0, 0, 238],
        [205, 0, 205],
        [0, 205, 205],
        [229, 229, 229],
        [127, 127, 127],
        [255, 0, 0],
        [0, 255, 0],
        [255, 255, 0],
        [92, 92, 255],
        [255, 0, 255],
        [0, 255, 255],
        [255, 255, 255],
    ];
    match index {
        0..=15 => BASE[index as usize],
        16..=231 => {
            let i = index - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            [level(i / 36), level((i / 6) % 6), level(i % 6)]
        }
        _ => {
            let v = 8 + (index - 232) * 10;
            [v, v, v]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        assert_eq!(Theme::dark().name, "dark");
        assert_eq!(Theme::light().name, "light");
    }

    #[test]
    fn test_theme_from_name() {
        assert_eq!(Theme::from_name("dark").name, "dark");
        assert_eq!(Theme::from_name("DARK").name, "dark");
        assert_eq!(Theme::from_name("unknown").name, "light");
    }

    #[test]
    fn test_default_theme_has_white_canvas() {
        let theme = Theme::default();
        assert_eq!(theme.name, "light");
        assert_eq!(to_rgb(theme.tree_bg, [0, 0, 0]), [255, 255, 255]);
    }

    #[test]
    fn test_available_themes() {
        let themes = Theme::available_themes();
        assert!(themes.contains(&"dark".to_string()));
        assert!(themes.contains(&"light".to_string()));
    }

    #[test]
    fn test_unknown_theme_message_lists_choices() {
        let message = unknown_theme_message("solarized");
        assert!(message.starts_with("Unknown theme 'solarized'"));
        assert!(message.contains("light"));
        assert!(message.contains("dark"));
    }

    #[test]
    fn test_theme_file_parsing() {
        let json = r#"{
            "name": "custom",
            "tree": {
                "bg": [1, 2, 3], "fg": "White",
                "header_bg": "Black", "header_fg": "Gray",
                "selection_bg": "Blue", "selection_fg": "White",
                "folder_fg": "Yellow", "type_fg": "Gray", "marker_fg": "DarkGray",
                "folder_icon": "Yellow", "file_icon": "Cyan"
            },
            "ui": {
                "status_bar_bg": "Blue", "status_bar_fg": "White",
                "popup_bg": "Black", "popup_fg": "White",
                "popup_border_fg": "Gray", "popup_selection_bg": "Blue"
            }
        }"#;
        let file: ThemeFile = serde_json::from_str(json).unwrap();
        let theme: Theme = file.into();

        assert_eq!(theme.name, "custom");
        assert_eq!(theme.tree_bg, Color::Rgb(1, 2, 3));
        assert_eq!(theme.error_fg, Color::Red);
        assert_eq!(theme.prompt_bg, Color::Black);
    }

    #[test]
    fn test_default_reset_color() {
        let color: Color = ColorDef::Named("Default".to_string()).into();
        assert_eq!(color, Color::Reset);
        assert_eq!(to_rgb(color, [9, 9, 9]), [9, 9, 9]);
    }

    #[test]
    fn test_indexed_colors() {
        assert_eq!(to_rgb(Color::Indexed(1), [0; 3]), [205, 0, 0]);
        assert_eq!(to_rgb(Color::Indexed(16), [0; 3]), [0, 0, 0]);
        assert_eq!(to_rgb(Color::Indexed(231), [0; 3]), [255, 255, 255]);
        assert_eq!(to_rgb(Color::Indexed(232), [0; 3]), [8, 8, 8]);
    }
}
