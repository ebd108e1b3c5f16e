pub mod detail_view;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Rows taken by the detail pane, border included
pub const DETAIL_HEIGHT: u16 = 8;

/// Main render function: list, detail pane, status row
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),                // ranked list
            Constraint::Length(DETAIL_HEIGHT), // selected task detail
            Constraint::Length(1),             // status row
        ])
        .split(area);

    list_view::render_list_view(frame, app, chunks[0]);
    detail_view::render_detail_view(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);
}
