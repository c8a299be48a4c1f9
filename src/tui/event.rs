//! Key handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::features::effects::{tray_menu, MenuAction};
use crate::features::session::HomeView;
use crate::tui::app::App;

/// What the session should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the interface immediately.
    Quit,
    /// Start or stop a session.
    Toggle,
    ShowSettings,
    CloseSettings,
    /// A menu item.
    Menu(MenuAction),
}

const HELP: &str = "space:start/stop | s:settings | h:hide | v:show | q:quit";
const SETTINGS_HELP: &str = "j/k:select | enter:edit | esc:close";

/// Handle one key press.
///
/// Returns an action for the session, or None if the key was handled
/// locally.
pub fn handle_key(app: &mut App<'_>, view: &HomeView, key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if app.editing.is_some() {
        match key.code {
            KeyCode::Enter => app.commit_edit(),
            KeyCode::Esc => app.cancel_edit(),
            KeyCode::Backspace => app.pop_char(),
            KeyCode::Char(c) => app.push_char(c),
            _ => {},
        }
        return None;
    }

    if view.show_settings {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('s') => Some(Action::CloseSettings),
            KeyCode::Char('j') | KeyCode::Down => {
                app.select_next();
                None
            },
            KeyCode::Char('k') | KeyCode::Up => {
                app.select_previous();
                None
            },
            KeyCode::Enter | KeyCode::Char(' ') => {
                app.activate_selected();
                None
            },
            KeyCode::Char('?') => {
                app.status = Some(SETTINGS_HELP.to_string());
                None
            },
            KeyCode::Char(c) => menu_action(c),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Toggle),
        KeyCode::Char('s') => Some(Action::ShowSettings),
        KeyCode::Char('?') => {
            app.status = Some(HELP.to_string());
            None
        },
        KeyCode::Char(c) => menu_action(c),
        _ => {
            app.status = None;
            None
        },
    }
}

fn menu_action(c: char) -> Option<Action> {
    tray_menu()
        .into_iter()
        .find(|item| item.key == c)
        .map(|item| Action::Menu(item.action))
}
