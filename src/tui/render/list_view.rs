use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::rank::TaskView;
use crate::tui::app::App;
use crate::tui::theme::{rgb_color, weight_modifier};
use crate::util::unicode::{display_width, truncate_to_width};

const FIRE: &str = "\u{1F525}";

/// Render the ranked task list
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;

    if app.views.is_empty() {
        let msg = if app.session.list_file.is_none() {
            " No list open. Run `cad open <PATH>` to load one."
        } else {
            " No tasks"
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    // Keep the cursor on screen
    let visible_height = (area.height as usize).max(1);
    let cursor = app.cursor.min(app.views.len() - 1);
    app.cursor = cursor;
    if cursor < app.scroll_offset {
        app.scroll_offset = cursor;
    } else if cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = cursor + 1 - visible_height;
    }

    let scroll = app.scroll_offset;
    let end = app.views.len().min(scroll + visible_height);
    let width = area.width as usize;
    let lines: Vec<Line> = app.views[scroll..end]
        .iter()
        .zip(scroll..end)
        .map(|(view, row)| task_line(app, view, row == cursor, width))
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn task_line<'a>(app: &App, view: &TaskView, is_cursor: bool, width: usize) -> Line<'a> {
    let theme = &app.theme;
    let bg = if is_cursor { theme.selection_bg } else { theme.background };

    let title_style = if view.is_done {
        Style::default()
            .fg(theme.dim)
            .bg(bg)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
            .fg(rgb_color(view.color))
            .bg(bg)
            .add_modifier(weight_modifier(view.weight))
    };
    let dim_style = Style::default().fg(theme.dim).bg(bg);

    let marker = if is_cursor { "\u{258C}" } else { " " };
    let check = if view.is_done { "[x] " } else { "[ ] " };
    let days = format!("{:>4}d  ", view.days_since_done);
    let fires = if view.fires > 0 {
        format!(" {}", FIRE.repeat(view.fires))
    } else {
        String::new()
    };

    let fixed = display_width(marker) + check.len() + days.len() + display_width(&fires);
    let title = truncate_to_width(&view.title, width.saturating_sub(fixed));

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(theme.selection_border).bg(bg)),
        Span::styled(check, dim_style),
        Span::styled(days, dim_style),
        Span::styled(title, title_style),
        Span::styled(fires, Style::default().fg(theme.red).bg(bg)),
    ];

    // Fill the rest of the row so the selection background spans the width
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    if is_cursor && used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
    }
    Line::from(spans)
}
