//! Popup menu for expanding or collapsing one subtree

use crate::app::ContextMenu;
use crate::view::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub struct ContextMenuRenderer;

impl ContextMenuRenderer {
    /// Draw the menu below `anchor_row`, or above it when there is no room.
    /// `title` is the name of the node the menu acts on.
    pub fn render(
        frame: &mut Frame,
        bounds: Rect,
        anchor_row: u16,
        menu: &ContextMenu,
        title: &str,
        theme: &Theme,
    ) {
        let area = Self::popup_area(bounds, anchor_row, menu, title);
        if area.width < 3 || area.height < 3 {
            return;
        }

        // Clear the area behind the popup first to hide underlying text
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title))
            .border_style(Style::default().fg(theme.popup_border_fg))
            .style(Style::default().bg(theme.popup_bg).fg(theme.popup_fg));

        let inner_width = area.width.saturating_sub(2) as usize;
        let lines: Vec<Line> = menu
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let label = format!(" {}", item.label());
                let padded = format!("{:<width$}", label, width = inner_width);
                let style = if index == menu.selected {
                    Style::default()
                        .bg(theme.popup_selection_bg)
                        .fg(theme.popup_fg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.popup_fg)
                };
                Line::from(Span::styled(padded, style))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn popup_area(bounds: Rect, anchor_row: u16, menu: &ContextMenu, title: &str) -> Rect {
        let label_width = menu
            .items()
            .iter()
            .map(|item| item.label().width() + 2)
            .max()
            .unwrap_or(0);
        let width = (label_width.max(title.width() + 2) + 2).min(bounds.width as usize) as u16;
        let height = (menu.items().len() as u16 + 2).min(bounds.height);

        let below = anchor_row.saturating_add(1);
        let y = if below.saturating_add(height) <= bounds.bottom() {
            below
        } else {
            anchor_row.saturating_sub(height).max(bounds.y)
        };
        let x = bounds.x + (bounds.width.saturating_sub(width)) / 4;

        Rect::new(x, y, width, height)
    }
}
