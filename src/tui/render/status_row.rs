use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::display_width;

const HINTS: &str = "j/k move  space done  r reload  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let list = app.session.list_id().unwrap_or_else(|| "no list".to_string());
    let left = format!(" {}  total {}  {}", list, app.session.total_frequency(), app.today);
    let mut spans = vec![Span::styled(
        left,
        Style::default().fg(app.theme.text_bright).bg(bg),
    )];

    let (right, right_style) = match &app.notice {
        Some(msg) if msg.starts_with("error:") => (msg.as_str(), Style::default().fg(app.theme.red).bg(bg)),
        Some(msg) => (msg.as_str(), Style::default().fg(app.theme.highlight).bg(bg)),
        None => (HINTS, Style::default().fg(app.theme.dim).bg(bg)),
    };

    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let right_width = display_width(right) + 1;
    if content_width + right_width < width {
        let padding = width - content_width - right_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(format!("{} ", right), right_style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
