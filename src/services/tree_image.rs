//! Raster export of the file tree
//!
//! Draws the tree exactly as it is currently displayed (expand state, file
//! filter, sort order) onto an RGB canvas and writes it as PNG or JPEG. The
//! canvas is as tall as the header plus every visible row, so nothing is
//! clipped the way a screenshot of the viewport would be.

use crate::config::ExportConfig;
use crate::view::file_tree::{FileTree, Icon, NodeKind, TreeNode};
use crate::view::theme::{to_rgb, Theme};
use ab_glyph::{Font, FontVec, PxScale, PxScaleFont, ScaleFont};
use image::{ImageFormat, Rgb, RgbImage};
use ratatui::style::Color;
use std::path::{Path, PathBuf};

/// Well-known system font locations, tried in order
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font file names looked up in the user font directory
const USER_FONT_NAMES: &[&str] = &[
    "DejaVuSans.ttf",
    "NotoSans-Regular.ttf",
    "LiberationSans-Regular.ttf",
];

/// Gap between an icon and its label
const ICON_GAP: f32 = 6.0;

/// Largest width or height the JPEG encoder accepts
pub const JPEG_MAX_DIMENSION: u32 = u16::MAX as u32;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unsupported image format for {} (use .png, .jpg or .jpeg)", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error(
        "{width}x{height} is too large for JPEG (at most {} px per side); export as .png instead",
        JPEG_MAX_DIMENSION
    )]
    TooLargeForJpeg { width: u32, height: u32 },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A successfully written image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Canvas height: padding, the header row, and one row per visible node.
///
/// A collapsed folder contributes only its own row.
pub fn image_height(tree: &FileTree, config: &ExportConfig) -> u32 {
    let rows = tree.get_visible_nodes().len() as u32 + 1;
    rows * config.row_height + config.padding * 2
}

/// Canvas width, widened if needed to fit the indent and Type column
pub fn image_width(requested: u32, config: &ExportConfig) -> u32 {
    let minimum = config.padding * 2 + config.indent * 2 + config.type_column_width;
    requested.max(minimum)
}

/// Load the configured font, or the first available system font
pub fn load_font(config: &ExportConfig) -> Option<FontVec> {
    if let Some(path) = &config.font_path {
        match read_font(path) {
            Some(font) => return Some(font),
            None => tracing::warn!("Cannot load font {:?}, trying system fonts", path),
        }
    }

    let user_fonts = dirs::font_dir()
        .into_iter()
        .flat_map(|dir| USER_FONT_NAMES.iter().map(move |name| dir.join(name)));
    let system_fonts = SYSTEM_FONTS.iter().map(PathBuf::from);

    user_fonts.chain(system_fonts).find_map(|path| {
        let font = read_font(&path)?;
        tracing::debug!("Using font {:?}", path);
        Some(font)
    })
}

fn read_font(path: &Path) -> Option<FontVec> {
    let bytes = std::fs::read(path).ok()?;
    FontVec::try_from_vec(bytes).ok()
}

/// Write the tree to `path`, choosing PNG or JPEG from the extension.
///
/// An empty tree is not an error: nothing is written and `Ok(None)` is
/// returned. Failures are logged before they are returned.
pub fn export_tree(
    tree: &FileTree,
    path: &Path,
    theme: &Theme,
    config: &ExportConfig,
    width: u32,
) -> Result<Option<ExportedImage>, ExportError> {
    if tree.is_empty() {
        tracing::warn!("No items in the tree, nothing to export.");
        return Ok(None);
    }

    let result = write_image(tree, path, theme, config, width);
    match &result {
        Ok(image) => tracing::info!(
            "Image saved to {} ({}x{})",
            image.path.display(),
            image.width,
            image.height
        ),
        Err(e) => tracing::error!("Failed to save the image: {}", e),
    }
    result.map(Some)
}

fn write_image(
    tree: &FileTree,
    path: &Path,
    theme: &Theme,
    config: &ExportConfig,
    width: u32,
) -> Result<ExportedImage, ExportError> {
    let format = match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => format,
        _ => return Err(ExportError::UnsupportedFormat(path.to_path_buf())),
    };

    if format == ImageFormat::Jpeg {
        let (width, height) = (image_width(width, config), image_height(tree, config));
        if width > JPEG_MAX_DIMENSION || height > JPEG_MAX_DIMENSION {
            return Err(ExportError::TooLargeForJpeg { width, height });
        }
    }

    let font = load_font(config);
    if font.is_none() {
        tracing::warn!("No usable font found, exporting the tree without text");
    }

    let img = render_tree(tree, theme, config, width, font.as_ref());
    let (width, height) = img.dimensions();
    img.save_with_format(path, format)
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(ExportedImage {
        path: path.to_path_buf(),
        width,
        height,
    })
}

/// Rasterize the visible part of the tree.
///
/// Without a font the layout (header, icons, expanders) is still drawn.
pub fn render_tree(
    tree: &FileTree,
    theme: &Theme,
    config: &ExportConfig,
    width: u32,
    font: Option<&FontVec>,
) -> RgbImage {
    let width = image_width(width, config);
    let height = image_height(tree, config);

    let bg = rgb(theme.tree_bg, [255, 255, 255]);
    let mut img = RgbImage::from_pixel(width, height, bg);
    let scaled = font.map(|f| f.as_scaled(PxScale::from(config.font_size)));

    let row_h = config.row_height;
    let pad = config.padding;
    let type_x = width.saturating_sub(pad + config.type_column_width);

    // Header
    let header_bg = rgb(theme.header_bg, [240, 240, 240]);
    let header_fg = rgb(theme.header_fg, [60, 60, 60]);
    fill_rect(&mut img, 0, pad as i32, width, row_h, header_bg);
    fill_rect(
        &mut img,
        0,
        (pad + row_h) as i32 - 1,
        width,
        1,
        rgb(theme.guide_fg, [220, 220, 220]),
    );
    fill_rect(
        &mut img,
        type_x as i32 - 4,
        pad as i32,
        1,
        row_h,
        rgb(theme.guide_fg, [220, 220, 220]),
    );
    if let Some(font) = &scaled {
        let baseline = baseline(font, pad, row_h);
        draw_text(&mut img, font, "Name", (pad + 4) as f32, baseline, type_x as f32 - 8.0, header_fg);
        draw_text(&mut img, font, "Type", type_x as f32, baseline, (width - pad) as f32, header_fg);
    }

    // Rows
    for (row, (id, depth)) in tree.get_visible_nodes_with_depth().into_iter().enumerate() {
        let Some(node) = tree.get_node(id) else {
            continue;
        };
        let top = pad + (row as u32 + 1) * row_h;
        let x0 = pad + depth as u32 * config.indent;

        if node.is_dir() {
            draw_expander(&mut img, node, theme, x0, top, config);
        }

        let icon_size = (row_h as f32 * 0.6).round() as u32;
        let icon_x = x0 + config.indent;
        let icon_y = top + (row_h - icon_size.min(row_h)) / 2;
        let mut label_x = icon_x as f32;
        if node.icon != Icon::None {
            draw_icon(&mut img, node.icon, theme, icon_x, icon_y, icon_size);
            label_x += icon_size as f32 + ICON_GAP;
        }

        if let Some(font) = &scaled {
            let baseline = baseline(font, top, row_h);
            let label_color = label_color(node, theme);
            draw_text(&mut img, font, &node.name, label_x, baseline, type_x as f32 - 8.0, label_color);
            draw_text(
                &mut img,
                font,
                node.type_label(),
                type_x as f32,
                baseline,
                (width - pad) as f32,
                rgb(theme.type_fg, [100, 100, 100]),
            );
        }
    }

    img
}

fn rgb(color: Color, fallback: [u8; 3]) -> Rgb<u8> {
    Rgb(to_rgb(color, fallback))
}

fn label_color(node: &TreeNode, theme: &Theme) -> Rgb<u8> {
    match &node.kind {
        _ if node.is_error() => rgb(theme.error_fg, [200, 40, 40]),
        NodeKind::Folder => rgb(theme.folder_fg, [30, 30, 30]),
        NodeKind::File { .. } => rgb(theme.tree_fg, [30, 30, 30]),
        NodeKind::Marker => rgb(theme.marker_fg, [140, 140, 140]),
    }
}

/// Baseline that vertically centers a line of text in a row
fn baseline<F: Font>(font: &PxScaleFont<&F>, top: u32, row_h: u32) -> f32 {
    let text_h = font.ascent() - font.descent();
    top as f32 + (row_h as f32 - text_h) / 2.0 + font.ascent()
}

/// Triangle before a folder: right when collapsed, down when expanded
fn draw_expander(
    img: &mut RgbImage,
    node: &TreeNode,
    theme: &Theme,
    x0: u32,
    top: u32,
    config: &ExportConfig,
) {
    if !node.can_expand() {
        return;
    }

    let color = rgb(theme.type_fg, [100, 100, 100]);
    let r = (config.row_height / 5).max(2) as i32;
    let cx = (x0 + config.indent / 2) as i32;
    let cy = (top + config.row_height / 2) as i32;

    for i in 0..=r {
        if node.is_expanded() {
            // ▼: rows shrink from 2r wide to a point
            let half = r - i;
            fill_rect(img, cx - half, cy - r / 2 + i, (half * 2 + 1) as u32, 1, color);
        } else {
            // ▶: columns shrink from 2r tall to a point
            let half = r - i;
            fill_rect(img, cx - r / 2 + i, cy - half, 1, (half * 2 + 1) as u32, color);
        }
    }
}

fn draw_icon(img: &mut RgbImage, icon: Icon, theme: &Theme, x: u32, y: u32, size: u32) {
    let (x, y) = (x as i32, y as i32);
    match icon {
        Icon::Folder => {
            let color = rgb(theme.folder_icon, [230, 180, 60]);
            // Tab, then body
            fill_rect(img, x, y, size / 2, size / 5 + 1, color);
            fill_rect(img, x, y + (size / 5) as i32, size, size - size / 5, color);
        }
        Icon::None => {}
        _ => {
            let color = rgb(theme.file_icon, [120, 150, 190]);
            let inset = size / 6;
            let body_w = size - inset * 2;
            fill_rect(img, x + inset as i32, y, body_w, size, color);
            // Lines of "text" on the page
            let bg = rgb(theme.tree_bg, [255, 255, 255]);
            let lines = match icon {
                Icon::Document | Icon::Code => 3,
                Icon::Archive => 4,
                _ => 0,
            };
            for line in 0..lines {
                let ly = y + ((line + 1) * size / (lines + 1)) as i32;
                fill_rect(img, x + (inset * 2) as i32, ly, body_w.saturating_sub(inset * 2), 1, bg);
            }
        }
    }
}

/// Draw `text` from `x`, stopping before any glyph that would cross `max_x`
fn draw_text<F: Font>(
    img: &mut RgbImage,
    font: &PxScaleFont<&F>,
    text: &str,
    x: f32,
    y_baseline: f32,
    max_x: f32,
    color: Rgb<u8>,
) {
    let mut x = x;
    let mut previous = None;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = previous {
            x += font.kern(prev, glyph_id);
        }
        let advance = font.h_advance(glyph_id);
        if x + advance > max_x {
            break;
        }
        draw_char(img, font, ch, x, y_baseline, color);
        x += advance;
        previous = Some(glyph_id);
    }
}

/// Draw a single character onto the image
fn draw_char<F: Font>(
    img: &mut RgbImage,
    font: &PxScaleFont<&F>,
    ch: char,
    x: f32,
    y_baseline: f32,
    color: Rgb<u8>,
) {
    let glyph_id = font.glyph_id(ch);
    let glyph = glyph_id.with_scale_and_position(font.scale(), ab_glyph::point(x, y_baseline));

    if let Some(outlined) = font.outline_glyph(glyph) {
        let bounds = outlined.px_bounds();
        outlined.draw(|px, py, coverage| {
            let img_x = bounds.min.x as i32 + px as i32;
            let img_y = bounds.min.y as i32 + py as i32;
            if img_x < 0 || img_y < 0 {
                return;
            }
            let (img_x, img_y) = (img_x as u32, img_y as u32);

            if img_x < img.width() && img_y < img.height() {
                let alpha = (coverage * 255.0) as u8;
                if alpha > 0 {
                    let bg = img.get_pixel(img_x, img_y);
                    let blended = blend_pixel(*bg, color, alpha);
                    img.put_pixel(img_x, img_y, blended);
                }
            }
        });
    }
}

/// Blend a foreground color onto a background with alpha
fn blend_pixel(bg: Rgb<u8>, fg: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let a = alpha as f32 / 255.0;
    let inv_a = 1.0 - a;

    Rgb([
        (fg[0] as f32 * a + bg[0] as f32 * inv_a) as u8,
        (fg[1] as f32 * a + bg[1] as f32 * inv_a) as u8,
        (fg[2] as f32 * a + bg[2] as f32 * inv_a) as u8,
    ])
}

/// Fill a rectangle, clipped to the image
fn fill_rect(img: &mut RgbImage, x: i32, y: i32, w: u32, h: u32, color: Rgb<u8>) {
    let x_start = x.max(0) as u32;
    let y_start = y.max(0) as u32;
    let x_end = (x + w as i32).clamp(0, img.width() as i32) as u32;
    let y_end = (y + h as i32).clamp(0, img.height() as i32) as u32;

    for py in y_start..y_end {
        for px in x_start..x_end {
            img.put_pixel(px, py, color);
        }
    }
}
