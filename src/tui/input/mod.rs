mod navigate;

use chrono::NaiveDateTime;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;

use navigate::handle_navigate;

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent, now: NaiveDateTime) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    handle_navigate(app, key, now);
}
