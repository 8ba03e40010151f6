use crate::view::file_tree::{FileTreeView, NodeId, NodeKind, SortKey};
use crate::view::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cells reserved for the Type column
const TYPE_COLUMN_WIDTH: usize = 12;

pub struct FileExplorerRenderer;

impl FileExplorerRenderer {
    /// Render the tree with its column header in the given frame area
    pub fn render(view: &mut FileTreeView, frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title))
            .title_style(Style::default().fg(theme.header_fg).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(theme.guide_fg))
            .style(Style::default().bg(theme.tree_bg).fg(theme.tree_fg));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let content_width = inner.width as usize;
        let header_area = Rect::new(inner.x, inner.y, inner.width, 1);
        frame.render_widget(
            Paragraph::new(Self::header_line(view, content_width, theme)),
            header_area,
        );

        let list_area = Rect::new(
            inner.x,
            inner.y + 1,
            inner.width,
            inner.height.saturating_sub(1),
        );

        if view.tree().is_empty() {
            let hint = Paragraph::new("No folder selected. Press o to open one.")
                .style(Style::default().fg(theme.marker_fg));
            frame.render_widget(hint, list_area);
            return;
        }

        // Update viewport height for scrolling calculations
        let viewport_height = list_area.height as usize;
        view.set_viewport_height(viewport_height);
        view.update_scroll_for_selection();

        let display_nodes = view.get_display_nodes();
        let selected_index = view.get_selected_index();
        let scroll_offset = view.get_scroll_offset().min(display_nodes.len());

        // Only render the visible subset of items (for manual scroll control)
        let visible_end = (scroll_offset + viewport_height).min(display_nodes.len());
        let items: Vec<ListItem> = display_nodes[scroll_offset..visible_end]
            .iter()
            .map(|&(node_id, indent)| Self::render_node(view, node_id, indent, theme, content_width))
            .collect();

        let list = List::new(items).highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .fg(theme.selection_fg),
        );

        let mut list_state = ListState::default();
        if let Some(selected) = selected_index {
            if selected >= scroll_offset && selected < visible_end {
                list_state.select(Some(selected - scroll_offset));
            }
        }

        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    /// "Name ▲ ... Type" with the arrow on the active column
    fn header_line(view: &FileTreeView, width: usize, theme: &Theme) -> Line<'static> {
        let title = |key: SortKey| {
            if view.sort_key() == key {
                format!("{} {}", key.title(), view.sort_order().arrow())
            } else {
                key.title().to_string()
            }
        };
        let name = title(SortKey::Name);
        let kind = title(SortKey::Type);

        let style = Style::default()
            .fg(theme.header_fg)
            .bg(theme.header_bg)
            .add_modifier(Modifier::BOLD);
        let name_width = width.saturating_sub(TYPE_COLUMN_WIDTH);
        Line::from(vec![
            Span::styled(pad_to_width(&name, name_width), style),
            Span::styled(pad_to_width(&kind, width - name_width), style),
        ])
    }

    /// Render a single tree node as a ListItem
    fn render_node(
        view: &FileTreeView,
        node_id: NodeId,
        indent: usize,
        theme: &Theme,
        content_width: usize,
    ) -> ListItem<'static> {
        let Some(node) = view.tree().get_node(node_id) else {
            return ListItem::new("");
        };

        let mut spans = Vec::new();

        let indent_text = "  ".repeat(indent);
        let indicator = if node.is_expanded() {
            "▼ "
        } else if node.is_collapsed() {
            "▶ "
        } else if node.is_error() {
            "! "
        } else {
            "  "
        };
        let icon = format!("{} ", node.icon.symbol());

        let name_style = match &node.kind {
            _ if node.is_error() => Style::default().fg(theme.error_fg),
            NodeKind::Folder => Style::default().fg(theme.folder_fg),
            NodeKind::File { .. } => Style::default().fg(theme.tree_fg),
            NodeKind::Marker => Style::default()
                .fg(theme.marker_fg)
                .add_modifier(Modifier::ITALIC),
        };
        let icon_style = if node.is_dir() {
            Style::default().fg(theme.folder_icon)
        } else {
            Style::default().fg(theme.file_icon)
        };

        let name_column = content_width.saturating_sub(TYPE_COLUMN_WIDTH);
        let left_width = indent_text.width() + indicator.width() + icon.width();
        let name_room = name_column.saturating_sub(left_width + 1);

        spans.push(Span::raw(indent_text));
        spans.push(Span::styled(indicator, Style::default().fg(theme.type_fg)));
        spans.push(Span::styled(icon, icon_style));
        let name = truncate_to_width(&node.name, name_room);
        let padding = name_column.saturating_sub(left_width + name.width());
        spans.push(Span::styled(name, name_style));
        spans.push(Span::raw(" ".repeat(padding)));

        let type_text = if node.is_error() {
            "Error".to_string()
        } else {
            node.type_label().to_string()
        };
        spans.push(Span::styled(
            truncate_to_width(&type_text, TYPE_COLUMN_WIDTH),
            Style::default().fg(theme.type_fg),
        ));

        ListItem::new(Line::from(spans))
    }
}

/// Cut `text` to at most `max` display cells, marking the cut with "…"
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Left-align `text` in exactly `width` cells
fn pad_to_width(text: &str, width: usize) -> String {
    let text = truncate_to_width(text, width);
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}
