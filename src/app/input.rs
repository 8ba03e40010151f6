//! Key decoding for the terminal front end
//!
//! | Key                 | Action                                   |
//! |---------------------|------------------------------------------|
//! | ↑ ↓ PgUp PgDn Home End | move the selection                    |
//! | Enter, Space        | expand/collapse the selected folder      |
//! | → / ←               | expand / collapse (or go to parent)      |
//! | e                   | expand or collapse everything            |
//! | m                   | context menu: expand/collapse subtree    |
//! | n / t               | sort by Name / Type (again: reverse)     |
//! | f                   | show or hide files                       |
//! | r, F5               | rescan                                   |
//! | o                   | open folder                              |
//! | s                   | export image                             |
//! | q, Ctrl+C           | quit                                     |

use super::{Action, App, Mode};
use crate::view::file_tree::SortKey;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

impl App {
    /// Apply a key press. Returns false when the key did nothing.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        match action_for_key(self.mode(), key) {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }
}

/// Map a key to an action in the given mode
pub fn action_for_key(mode: Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        Mode::Prompt => prompt_action(key, ctrl),
        Mode::ContextMenu => menu_action(key),
        Mode::Tree => tree_action(key, ctrl),
    }
}

fn tree_action(key: KeyEvent, ctrl: bool) -> Option<Action> {
    if ctrl {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
        KeyCode::Up | KeyCode::Char('k') => Action::SelectPrev,
        KeyCode::PageDown => Action::SelectPageDown,
        KeyCode::PageUp => Action::SelectPageUp,
        KeyCode::Home | KeyCode::Char('g') => Action::SelectFirst,
        KeyCode::End | KeyCode::Char('G') => Action::SelectLast,
        KeyCode::Enter | KeyCode::Char(' ') => Action::ToggleNode,
        KeyCode::Right | KeyCode::Char('l') => Action::ExpandNode,
        KeyCode::Left | KeyCode::Char('h') => Action::CollapseOrParent,
        KeyCode::Char('e') => Action::ToggleAll,
        KeyCode::Char('m') | KeyCode::Menu => Action::OpenContextMenu,
        KeyCode::Char('n') => Action::SortBy(SortKey::Name),
        KeyCode::Char('t') => Action::SortBy(SortKey::Type),
        KeyCode::Char('f') => Action::ToggleShowFiles,
        KeyCode::Char('r') | KeyCode::F(5) => Action::Rescan,
        KeyCode::Char('o') => Action::OpenFolderPrompt,
        KeyCode::Char('s') => Action::ExportPrompt,
        _ => return None,
    };
    Some(action)
}

fn prompt_action(key: KeyEvent, ctrl: bool) -> Option<Action> {
    let action = match key.code {
        KeyCode::Enter => Action::PromptConfirm,
        KeyCode::Esc => Action::PromptCancel,
        KeyCode::Backspace => Action::PromptBackspace,
        KeyCode::Delete => Action::PromptDelete,
        KeyCode::Left => Action::PromptLeft,
        KeyCode::Right => Action::PromptRight,
        KeyCode::Home => Action::PromptHome,
        KeyCode::End => Action::PromptEnd,
        KeyCode::Char('u') if ctrl => Action::PromptClearLine,
        KeyCode::Char('a') if ctrl => Action::PromptHome,
        KeyCode::Char('e') if ctrl => Action::PromptEnd,
        KeyCode::Char(ch) if !ctrl => Action::PromptInsert(ch),
        _ => return None,
    };
    Some(action)
}

fn menu_action(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Down | KeyCode::Char('j') => Action::MenuNext,
        KeyCode::Up | KeyCode::Char('k') => Action::MenuPrev,
        KeyCode::Enter | KeyCode::Char(' ') => Action::MenuConfirm,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('m') => Action::MenuCancel,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_tree_keys() {
        assert_eq!(
            action_for_key(Mode::Tree, key(KeyCode::Char('e'))),
            Some(Action::ToggleAll)
        );
        assert_eq!(
            action_for_key(Mode::Tree, key(KeyCode::Char('n'))),
            Some(Action::SortBy(SortKey::Name))
        );
        assert_eq!(
            action_for_key(Mode::Tree, key(KeyCode::Enter)),
            Some(Action::ToggleNode)
        );
        assert_eq!(action_for_key(Mode::Tree, key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_prompt_keys_insert_text() {
        assert_eq!(
            action_for_key(Mode::Prompt, key(KeyCode::Char('q'))),
            Some(Action::PromptInsert('q'))
        );
        assert_eq!(
            action_for_key(Mode::Prompt, ctrl('u')),
            Some(Action::PromptClearLine)
        );
        assert_eq!(
            action_for_key(Mode::Prompt, key(KeyCode::Esc)),
            Some(Action::PromptCancel)
        );
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        for mode in [Mode::Tree, Mode::Prompt, Mode::ContextMenu] {
            assert_eq!(action_for_key(mode, ctrl('c')), Some(Action::Quit));
        }
    }

    #[test]
    fn test_menu_keys() {
        assert_eq!(
            action_for_key(Mode::ContextMenu, key(KeyCode::Down)),
            Some(Action::MenuNext)
        );
        assert_eq!(
            action_for_key(Mode::ContextMenu, key(KeyCode::Esc)),
            Some(Action::MenuCancel)
        );
    }
}
