mod navigate;
mod text;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::{Action, Mode, apply};

use super::app::App;

use navigate::navigate_action;
use text::text_action;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if let Some(action) = key_action(&app.session.mode, app.session.notes_visible, key) {
        apply(&mut app.session, &mut app.store, action);
    }
}

/// Decode a key press into an action for `mode`. None means the key does
/// nothing here.
pub fn key_action(mode: &Mode, notes_visible: bool, key: KeyEvent) -> Option<Action> {
    // Ctrl+C quits from anywhere, including forms
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    if mode.is_text_input() {
        text_action(key)
    } else {
        navigate_action(mode, notes_visible, key)
    }
}
