use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ops::interval::GapSummary;
use crate::ops::rank::TaskView;
use crate::tui::app::App;
use crate::tui::theme::rgb_color;

/// Histogram buckets shown on one line
const MAX_GAP_BUCKETS: usize = 6;

/// Render the selected task's statistics
pub fn render_detail_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let Some(view) = app.selected() else {
        frame.render_widget(block, area);
        return;
    };

    let block = block.title(Span::styled(
        format!(" {} ", view.title),
        Style::default()
            .fg(rgb_color(view.color))
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));
    let paragraph = Paragraph::new(detail_lines(app, view))
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn detail_lines<'a>(app: &App, view: &TaskView) -> Vec<Line<'a>> {
    let bg = app.theme.background;
    let label = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text).bg(bg);
    let row = |name: &str, text: String| {
        Line::from(vec![
            Span::styled(format!(" {:<10}", name), label),
            Span::styled(text, value),
        ])
    };

    let real = view
        .real_frequency
        .map(|f| format!("{} per day", f))
        .unwrap_or_else(|| "-".to_string());
    let last = match view.last_done {
        Some(date) if view.is_done => format!("{} (today)", date),
        Some(date) => format!("{} ({} days ago)", date, view.days_since_done),
        None => "never".to_string(),
    };

    let mut lines = vec![
        row("frequency", format!("{}  real {}", view.frequency, real)),
        row("last done", format!("{}  {} completions", last, view.completions)),
        row("urgency", format!("{}  tier {}", view.urgency, view.tier)),
    ];

    match &view.intervals {
        None => lines.push(row("intervals", "need two completions".to_string())),
        Some(stats) => {
            lines.push(row("history", gap_text(&stats.historical)));
            lines.push(row("if today", gap_text(&stats.projected)));
            let gaps: Vec<String> = stats
                .histogram
                .iter()
                .take(MAX_GAP_BUCKETS)
                .map(|g| format!("{}d\u{00D7}{}", g.days, g.count))
                .collect();
            lines.push(row("gaps", gaps.join("  ")));
        }
    }
    lines
}

fn gap_text(summary: &Option<GapSummary>) -> String {
    match summary {
        Some(s) => format!("max {}d  mean {:.1}d  median {}d", s.max, s.mean, s.median),
        None => "-".to_string(),
    }
}
