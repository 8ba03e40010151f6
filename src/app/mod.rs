//! Application state for the terminal front end
//!
//! `App` wraps a [`Session`] with the interactive state around it (prompt,
//! context menu, status message) and applies [`Action`]s to it. Key
//! decoding lives in `input` so everything here can be driven without a
//! terminal.

pub mod context_menu;
#[cfg(feature = "runtime")]
pub mod input;
pub mod prompt;
pub mod session;

pub use context_menu::{ContextMenu, MenuItem};
pub use prompt::{Prompt, PromptKind};
pub use session::Session;

use crate::view::file_tree::SortKey;
use std::path::{Path, PathBuf};

/// Everything the user can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,

    // Navigation
    SelectNext,
    SelectPrev,
    SelectPageUp,
    SelectPageDown,
    SelectFirst,
    SelectLast,

    // Expand/collapse
    ToggleNode,
    ExpandNode,
    /// Collapse the selected folder, or move to its parent
    CollapseOrParent,
    ToggleAll,
    OpenContextMenu,

    // Tree options
    SortBy(SortKey),
    ToggleShowFiles,
    Rescan,

    OpenFolderPrompt,
    ExportPrompt,

    // Prompt editing
    PromptInsert(char),
    PromptBackspace,
    PromptDelete,
    PromptLeft,
    PromptRight,
    PromptHome,
    PromptEnd,
    PromptClearLine,
    PromptConfirm,
    PromptCancel,

    // Context menu
    MenuNext,
    MenuPrev,
    MenuConfirm,
    MenuCancel,
}

/// Which component receives input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Tree,
    Prompt,
    ContextMenu,
}

pub struct App {
    session: Session,
    prompt: Option<Prompt>,
    context_menu: Option<ContextMenu>,
    status_message: Option<String>,
    /// Pixel width of the tree area, used as the export width
    export_width: Option<u32>,
    /// Where the open-folder prompt starts when no folder is open
    start_dir: Option<PathBuf>,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session, start_dir: Option<PathBuf>) -> Self {
        Self {
            session,
            prompt: None,
            context_menu: None,
            status_message: None,
            export_width: None,
            start_dir,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn set_export_width(&mut self, width: Option<u32>) {
        self.export_width = width;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn mode(&self) -> Mode {
        if self.prompt.is_some() {
            Mode::Prompt
        } else if self.context_menu.is_some() {
            Mode::ContextMenu
        } else {
            Mode::Tree
        }
    }

    /// Open a folder, reporting the outcome in the status line
    pub fn open_folder(&mut self, path: &Path) {
        match self.session.select_folder(path) {
            Ok(()) => {
                let count = self.session.tree().node_count();
                self.set_status_message(format!("Scanned {} ({} items)", path.display(), count));
            }
            Err(e) => {
                tracing::warn!("Cannot open folder: {}", e);
                self.set_status_message(format!("Error: {}", e));
            }
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!("Action {:?}", action);
        match action {
            Action::Quit => self.should_quit = true,

            Action::SelectNext => self.session.view_mut().select_next(),
            Action::SelectPrev => self.session.view_mut().select_prev(),
            Action::SelectPageUp => self.session.view_mut().select_page_up(),
            Action::SelectPageDown => self.session.view_mut().select_page_down(),
            Action::SelectFirst => self.session.view_mut().select_first(),
            Action::SelectLast => self.session.view_mut().select_last(),

            Action::ToggleNode => {
                self.session.toggle_selected();
            }
            Action::ExpandNode => {
                self.session.set_selected_expanded(true);
            }
            Action::CollapseOrParent => {
                let expanded = self
                    .session
                    .view()
                    .get_selected_node()
                    .is_some_and(|n| n.is_expanded());
                if expanded {
                    self.session.set_selected_expanded(false);
                } else {
                    self.session.view_mut().select_parent();
                }
            }
            Action::ToggleAll => match self.session.toggle_all() {
                Some(true) => self.set_status_message("Expanded all"),
                Some(false) => self.set_status_message("Collapsed all"),
                None => self.set_status_message("No items in the tree"),
            },
            Action::OpenContextMenu => {
                if let Some(id) = self.session.view().get_selected() {
                    self.context_menu = Some(ContextMenu::new(id));
                }
            }

            Action::SortBy(key) => {
                self.session.sort_by_column(key);
                let view = self.session.view();
                let message = format!(
                    "Sorted by {} {}",
                    view.sort_key().title(),
                    view.sort_order().arrow()
                );
                self.set_status_message(message);
            }
            Action::ToggleShowFiles => {
                let result = self.session.toggle_show_files();
                let message = if self.session.show_files() {
                    "Showing files"
                } else {
                    "Hiding files"
                };
                self.report_scan(result, message);
            }
            Action::Rescan => {
                let result = self.session.rescan();
                self.report_scan(result, "Rescanned");
            }

            Action::OpenFolderPrompt => {
                let initial = self
                    .session
                    .current_folder()
                    .or(self.start_dir.as_deref())
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.prompt = Some(Prompt::new(PromptKind::OpenFolder, initial));
            }
            Action::ExportPrompt => {
                if self.session.tree().is_empty() {
                    self.set_status_message("No items in the tree");
                } else {
                    self.prompt = Some(Prompt::new(
                        PromptKind::ExportImage,
                        self.default_export_name(),
                    ));
                }
            }

            Action::PromptInsert(ch) => self.edit_prompt(|p| p.insert_char(ch)),
            Action::PromptBackspace => self.edit_prompt(Prompt::backspace),
            Action::PromptDelete => self.edit_prompt(Prompt::delete),
            Action::PromptLeft => self.edit_prompt(Prompt::move_left),
            Action::PromptRight => self.edit_prompt(Prompt::move_right),
            Action::PromptHome => self.edit_prompt(Prompt::move_home),
            Action::PromptEnd => self.edit_prompt(Prompt::move_end),
            Action::PromptClearLine => self.edit_prompt(Prompt::clear_before_cursor),
            Action::PromptConfirm => self.confirm_prompt(),
            Action::PromptCancel => {
                self.prompt = None;
                self.set_status_message("Cancelled");
            }

            Action::MenuNext => {
                if let Some(menu) = self.context_menu.as_mut() {
                    menu.select_next();
                }
            }
            Action::MenuPrev => {
                if let Some(menu) = self.context_menu.as_mut() {
                    menu.select_prev();
                }
            }
            Action::MenuConfirm => {
                if let Some(menu) = self.context_menu.take() {
                    let item = menu.selected_item();
                    let changed = self.session.set_subtree_expanded(menu.target, item.expand());
                    self.session.view_mut().reveal_selection();
                    self.set_status_message(format!("{}: {} folders", item.label(), changed));
                }
            }
            Action::MenuCancel => self.context_menu = None,
        }
    }

    fn edit_prompt(&mut self, edit: impl FnOnce(&mut Prompt)) {
        if let Some(prompt) = self.prompt.as_mut() {
            edit(prompt);
        }
    }

    fn report_scan<E: std::fmt::Display>(&mut self, result: Result<(), E>, success: &str) {
        match result {
            Ok(()) => self.set_status_message(success),
            Err(e) => {
                tracing::warn!("Scan failed: {}", e);
                self.set_status_message(format!("Error: {}", e));
            }
        }
    }

    fn default_export_name(&self) -> String {
        let stem = self
            .session
            .current_folder()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tree".to_string());
        format!("{stem}.png")
    }

    fn confirm_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let input = prompt.input.trim();
        if input.is_empty() {
            self.set_status_message("Cancelled");
            return;
        }
        let path = expand_tilde(input);

        match prompt.kind {
            PromptKind::OpenFolder => self.open_folder(&path),
            PromptKind::ExportImage => self.export(&path),
        }
    }

    /// Export the tree at the current tree-area width
    pub fn export(&mut self, path: &Path) {
        match self.session.export(path, self.export_width) {
            Ok(Some(image)) => self.set_status_message(format!(
                "Saved {}x{} image to {}",
                image.width,
                image.height,
                image.path.display()
            )),
            Ok(None) => self.set_status_message("No items in the tree"),
            Err(e) => self.set_status_message(format!("Error: {}", e)),
        }
    }
}

/// Replace a leading `~` with the home directory
fn expand_tilde(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest.trim_start_matches(['/', '\\']));
            }
        }
    }
    PathBuf::from(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::fs::MemoryFsBackend;

    fn app() -> App {
        let fs = MemoryFsBackend::new()
            .with_file("/r/a/one.txt")
            .with_file("/r/a/deep/two.txt")
            .with_file("/r/b.md");
        let session = Session::new(Box::new(fs), &Config::default());
        let mut app = App::new(session, Some(PathBuf::from("/r")));
        app.open_folder(Path::new("/r"));
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.dispatch(Action::PromptInsert(ch));
        }
    }

    #[test]
    fn test_open_folder_reports_status() {
        let app = app();
        assert_eq!(app.mode(), Mode::Tree);
        assert!(app.status_message().unwrap().starts_with("Scanned /r"));
    }

    #[test]
    fn test_open_folder_prompt() {
        let mut app = app();
        app.dispatch(Action::OpenFolderPrompt);
        assert_eq!(app.mode(), Mode::Prompt);
        assert_eq!(app.prompt().unwrap().input, "/r");

        type_text(&mut app, "/a");
        app.dispatch(Action::PromptConfirm);
        assert_eq!(app.mode(), Mode::Tree);
        assert_eq!(app.session().current_folder(), Some(Path::new("/r/a")));
    }

    #[test]
    fn test_open_missing_folder_keeps_tree() {
        let mut app = app();
        app.dispatch(Action::OpenFolderPrompt);
        app.dispatch(Action::PromptClearLine);
        type_text(&mut app, "/missing");
        app.dispatch(Action::PromptConfirm);

        assert!(app.status_message().unwrap().starts_with("Error:"));
        assert_eq!(app.session().current_folder(), Some(Path::new("/r")));
    }

    #[test]
    fn test_prompt_cancel() {
        let mut app = app();
        app.dispatch(Action::ExportPrompt);
        assert_eq!(app.prompt().unwrap().input, "r.png");
        app.dispatch(Action::PromptCancel);
        assert_eq!(app.mode(), Mode::Tree);
        assert_eq!(app.status_message(), Some("Cancelled"));
    }

    #[test]
    fn test_context_menu_scoped_toggle() {
        let mut app = app();
        app.dispatch(Action::SelectNext);
        let a = app.session().view().get_selected().unwrap();
        assert_eq!(app.session().tree().get_node(a).unwrap().name, "a");

        app.dispatch(Action::OpenContextMenu);
        assert_eq!(app.mode(), Mode::ContextMenu);
        app.dispatch(Action::MenuConfirm);

        let tree = app.session().tree();
        let deep = tree.find_by_relative_path(Path::new("a/deep")).unwrap();
        assert!(tree.get_node(a).unwrap().is_expanded());
        assert!(tree.get_node(deep).unwrap().is_expanded());
        assert_eq!(app.status_message(), Some("Expand All: 2 folders"));

        app.dispatch(Action::OpenContextMenu);
        app.dispatch(Action::MenuNext);
        app.dispatch(Action::MenuConfirm);
        let tree = app.session().tree();
        assert!(tree.get_node(a).unwrap().is_collapsed());
        assert!(tree.get_node(tree.root_id().unwrap()).unwrap().is_expanded());
    }

    #[test]
    fn test_collapse_or_parent() {
        let mut app = app();
        app.dispatch(Action::SelectNext);
        app.dispatch(Action::ExpandNode);
        let a = app.session().view().get_selected().unwrap();
        assert!(app.session().tree().get_node(a).unwrap().is_expanded());

        app.dispatch(Action::CollapseOrParent);
        assert!(app.session().tree().get_node(a).unwrap().is_collapsed());
        app.dispatch(Action::CollapseOrParent);
        assert_eq!(
            app.session().view().get_selected(),
            app.session().tree().root_id()
        );
    }

    #[test]
    fn test_toggle_all_status() {
        let mut app = app();
        app.dispatch(Action::ToggleAll);
        assert_eq!(app.status_message(), Some("Collapsed all"));
        app.dispatch(Action::ToggleAll);
        assert_eq!(app.status_message(), Some("Expanded all"));
    }

    #[test]
    fn test_sort_and_filter_status() {
        let mut app = app();
        app.dispatch(Action::SortBy(SortKey::Name));
        assert_eq!(app.status_message(), Some("Sorted by Name ▲"));
        app.dispatch(Action::SortBy(SortKey::Name));
        assert_eq!(app.status_message(), Some("Sorted by Name ▼"));

        app.dispatch(Action::ToggleShowFiles);
        assert_eq!(app.status_message(), Some("Hiding files"));
        assert!(!app.session().show_files());
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(!app.should_quit());
        app.dispatch(Action::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("~user"), PathBuf::from("~user"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/x.png"), home.join("x.png"));
        }
    }
}
