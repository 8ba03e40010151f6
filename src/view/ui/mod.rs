//! Terminal rendering for the tree window

pub mod context_menu;
pub mod file_explorer;
pub mod status_bar;

pub use context_menu::ContextMenuRenderer;
pub use file_explorer::FileExplorerRenderer;
pub use status_bar::{truncate_path, StatusBarRenderer, TruncatedPath};

use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

/// Draw the whole window. Returns the area used by the tree so the caller
/// can size image exports to match it.
pub fn render(frame: &mut Frame, app: &mut App) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());
    let tree_area = chunks[0];
    let bottom_area = chunks[1];

    let theme = app.session().theme().clone();
    let title = app
        .session()
        .current_folder()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "treeshot".to_string());

    FileExplorerRenderer::render(
        app.session_mut().view_mut(),
        frame,
        tree_area,
        &title,
        &theme,
    );

    if let Some(prompt) = app.prompt() {
        StatusBarRenderer::render_prompt(frame, bottom_area, prompt, &theme);
    } else {
        let session = app.session();
        StatusBarRenderer::render_status_bar(
            frame,
            bottom_area,
            session.current_folder(),
            session.view(),
            session.show_files(),
            app.status_message(),
            &theme,
        );
    }

    if let Some(menu) = app.context_menu() {
        let view = app.session().view();
        let row = view
            .get_display_nodes()
            .iter()
            .position(|&(id, _)| id == menu.target)
            .unwrap_or(0);
        // Border and header sit above the first row
        let anchor = tree_area.y
            + 2
            + row.saturating_sub(view.get_scroll_offset()).min(u16::MAX as usize) as u16;
        let name = view
            .tree()
            .get_node(menu.target)
            .map(|node| node.name.clone())
            .unwrap_or_default();
        ContextMenuRenderer::render(frame, tree_area, anchor, menu, &name, &theme);
    }

    tree_area
}
