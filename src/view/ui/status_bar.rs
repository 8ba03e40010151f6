//! Status bar and prompt line rendering

use std::path::Path;

use crate::app::Prompt;
use crate::view::file_tree::FileTreeView;
use crate::view::theme::Theme;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

/// Result of truncating a path for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedPath {
    /// The first component of the path (e.g., "/home")
    pub prefix: String,
    /// Whether components were dropped between prefix and suffix
    pub truncated: bool,
    /// The last components of the path (e.g., "/project/src")
    pub suffix: String,
}

impl TruncatedPath {
    /// Get the full display string (without styling)
    pub fn to_string_plain(&self) -> String {
        if self.truncated {
            format!("{}/[...]{}", self.prefix, self.suffix)
        } else {
            format!("{}{}", self.prefix, self.suffix)
        }
    }

    pub fn display_width(&self) -> usize {
        self.to_string_plain().width()
    }
}

/// Truncate a path for display, keeping the first component and as many
/// trailing components as fit.
///
/// `/home/user/projects/very/deep/tree` at 24 cells becomes
/// `/home/[...]/deep/tree`.
pub fn truncate_path(path: &Path, max_width: usize) -> TruncatedPath {
    let path_str = path.to_string_lossy();

    if path_str.width() <= max_width {
        return TruncatedPath {
            prefix: String::new(),
            truncated: false,
            suffix: path_str.to_string(),
        };
    }

    let components: Vec<&str> = path_str.split('/').filter(|s| !s.is_empty()).collect();
    let Some((first, rest)) = components.split_first() else {
        return TruncatedPath {
            prefix: "/".to_string(),
            truncated: false,
            suffix: String::new(),
        };
    };

    let prefix = if path_str.starts_with('/') {
        format!("/{}", first)
    } else {
        first.to_string()
    };
    let available = max_width.saturating_sub(prefix.width() + "/[...]".len());

    let mut suffix_parts: Vec<&str> = Vec::new();
    let mut suffix_width = 0;
    for component in rest.iter().rev() {
        let component_width = component.width() + 1;
        if suffix_width + component_width > available {
            break;
        }
        suffix_parts.push(component);
        suffix_width += component_width;
    }
    suffix_parts.reverse();

    let suffix = if suffix_parts.is_empty() {
        // Not even the last component fits: cut it short
        let last = rest.last().copied().unwrap_or("");
        let keep = available.saturating_sub(4);
        let cut: String = last
            .chars()
            .scan(0, |used, ch| {
                *used += ch.to_string().width();
                (*used <= keep).then_some(ch)
            })
            .collect();
        format!("/{}...", cut)
    } else {
        format!("/{}", suffix_parts.join("/"))
    };

    TruncatedPath {
        prefix,
        truncated: true,
        suffix,
    }
}

/// Renders the status bar and the prompt line
pub struct StatusBarRenderer;

impl StatusBarRenderer {
    /// Render the folder, view settings and the latest status message
    pub fn render_status_bar(
        frame: &mut Frame,
        area: Rect,
        folder: Option<&Path>,
        view: &FileTreeView,
        show_files: bool,
        message: Option<&str>,
        theme: &Theme,
    ) {
        let base = Style::default()
            .fg(theme.status_bar_fg)
            .bg(theme.status_bar_bg);

        let info = format!(
            " {} items | {} | {} {} ",
            view.visible_count(),
            if show_files { "files shown" } else { "files hidden" },
            view.sort_key().title(),
            view.sort_order().arrow(),
        );
        let width = area.width as usize;
        let path_room = width.saturating_sub(info.width() + 2) / 2;

        let folder_text = match folder {
            Some(path) => truncate_path(path, path_room).to_string_plain(),
            None => "no folder".to_string(),
        };

        let mut spans = vec![
            Span::styled(
                format!(" {} ", folder_text),
                base.add_modifier(Modifier::BOLD),
            ),
            Span::styled(info, base),
        ];
        if let Some(message) = message {
            spans.push(Span::styled(format!(" {}", message), base));
        }

        let used: usize = spans.iter().map(|span| span.content.width()).sum();
        if used < width {
            spans.push(Span::styled(" ".repeat(width - used), base));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Render the prompt and place the terminal cursor inside it
    pub fn render_prompt(frame: &mut Frame, area: Rect, prompt: &Prompt, theme: &Theme) {
        let base = Style::default().fg(theme.prompt_fg).bg(theme.prompt_bg);
        let message = prompt.message();

        let mut spans = vec![
            Span::styled(message, base.add_modifier(Modifier::BOLD)),
            Span::styled(prompt.input.clone(), base),
        ];
        let used = message.width() + prompt.input.width();
        let width = area.width as usize;
        if used < width {
            spans.push(Span::styled(" ".repeat(width - used), base));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        let cursor_col = message.width() + prompt.input[..prompt.cursor].width();
        let x = area
            .x
            .saturating_add(cursor_col.min(u16::MAX as usize) as u16)
            .min(area.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(x, area.y));
    }
}
