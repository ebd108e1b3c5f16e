use chrono::NaiveDateTime;
use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent, now: NaiveDateTime) {
    // Any key clears the last notice
    app.notice = None;

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.cursor_to_bottom(),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::Char(' ') | KeyCode::Enter => {
            app.tick(now);
            app.toggle_selected();
        }
        KeyCode::Char('r') => app.reload(now),
        _ => {}
    }
}
