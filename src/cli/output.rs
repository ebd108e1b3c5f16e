use chrono::NaiveDate;
use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::config::Config;
use crate::model::record::TaskRecord;
use crate::ops::interval::GapSummary;
use crate::ops::rank::TaskView;

/// Marker appended once per fire
pub const FIRE: &str = "\u{1F525}";

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HistoryJson {
    pub list: String,
    pub title: String,
    pub frequency: u32,
    pub added: NaiveDate,
    pub completions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_done: Option<NaiveDate>,
    /// Whether the task is in the open list
    pub current: bool,
}

#[derive(Serialize)]
pub struct ConfigJson {
    pub day_start: u32,
    pub per_day: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_file: Option<String>,
}

pub fn history_to_json(record: &TaskRecord, current: bool) -> HistoryJson {
    HistoryJson {
        list: record.source_list_id.clone(),
        title: record.title.clone(),
        frequency: record.frequency,
        added: record.added_date,
        completions: record.done_dates.len(),
        last_done: record.last_done(),
        current,
    }
}

pub fn config_to_json(config: &Config) -> ConfigJson {
    ConfigJson {
        day_start: config.day.new_day_start,
        per_day: config.day.todos_per_day,
        list_file: config.list.file.as_ref().map(|p| p.display().to_string()),
    }
}

pub fn recovery_to_json(entries: &[RecoveryEntry]) -> serde_json::Value {
    serde_json::Value::Array(entries.iter().map(RecoveryEntry::to_json).collect())
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Header above a listing
pub fn format_list_header(list: Option<&str>, total_frequency: u64, tasks: usize) -> String {
    format!(
        "== {} ({} tasks, total frequency {}) ==",
        list.unwrap_or("no list"),
        tasks,
        total_frequency
    )
}

/// One ranked task: done mark, days, urgency/tier, frequency, title, fires
pub fn format_view_line(view: &TaskView) -> String {
    let mark = if view.is_done { 'x' } else { ' ' };
    let mut line = format!(
        "[{}] {:>4}d  u{:<5} t{:<3} {}\u{00D7} {}",
        mark, view.days_since_done, view.urgency, view.tier, view.frequency, view.title
    );
    if view.fires > 0 {
        line.push(' ');
        line.push_str(&FIRE.repeat(view.fires));
    }
    line
}

fn format_gaps(label: &str, summary: &Option<GapSummary>) -> String {
    match summary {
        Some(s) => format!(
            "{:<11} max {}d, mean {:.1}d, median {}d",
            label, s.max, s.mean, s.median
        ),
        None => format!("{:<11} -", label),
    }
}

/// Detail block for `cad stats`
pub fn format_stats(view: &TaskView) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", view.title, view.list)];

    let real = view
        .real_frequency
        .map(|f| format!("{} per day", f))
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!("frequency:  {} (real: {})", view.frequency, real));

    let last = match view.last_done {
        Some(date) if view.is_done => format!("{} (today)", date),
        Some(date) => format!("{} ({} days ago)", date, view.days_since_done),
        None => "never".to_string(),
    };
    lines.push(format!("completed:  {} times, last {}", view.completions, last));
    lines.push(format!(
        "urgency:    {} (tier {}, {})",
        view.urgency,
        view.tier,
        view.color.to_hex()
    ));

    match &view.intervals {
        None => lines.push("intervals:  need at least two completions".to_string()),
        Some(stats) => {
            lines.push(format_gaps("history:", &stats.historical));
            lines.push(format_gaps("if today:", &stats.projected));
            lines.push(String::new());
            lines.push("gaps:".to_string());
            let widest = stats.histogram.iter().map(|g| g.count).max().unwrap_or(0);
            for gap in &stats.histogram {
                lines.push(format!(
                    "  {:>4}d  {:<width$}  {}",
                    gap.days,
                    "#".repeat(gap.count),
                    gap.count,
                    width = widest
                ));
            }
        }
    }

    lines
}

/// One store record for `cad history`
pub fn format_history_line(record: &TaskRecord, current: bool) -> String {
    let last = record
        .last_done()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "never".to_string());
    format!(
        "{} {}  {}\u{00D7}  {} done, last {}  [{}]",
        if current { '*' } else { ' ' },
        record.title,
        record.frequency,
        record.done_dates.len(),
        last,
        record.source_list_id
    )
}

pub fn format_config(config: &Config) -> Vec<String> {
    vec![
        format!("day-start: {}", config.day.new_day_start),
        format!("per-day:   {}", config.day.todos_per_day),
        format!(
            "list:      {}",
            config
                .list
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::urgency::UrgencyCalculator;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn view(done: &[&str], freq: u32, total: u64) -> TaskView {
        let mut record = TaskRecord::new("chores.txt".into(), "Water plants".into(), freq, date("2026-10-01"));
        record.done_dates = done.iter().map(|d| date(d)).collect();
        let calc = UrgencyCalculator::new(total, 1);
        TaskView::build(0, &record, &calc, date("2026-10-18"))
    }

    #[test]
    fn view_line_pending() {
        let v = view(&["2026-10-12"], 2, 4);
        insta::assert_snapshot!(format_view_line(&v), @"[ ]    6d  u12    t2   2× Water plants 🔥");
    }

    #[test]
    fn view_line_done_has_no_fires_when_calm() {
        let v = view(&["2026-10-18"], 1, 10);
        insta::assert_snapshot!(format_view_line(&v), @"[x]   17d  u17    t1   1× Water plants");
    }

    #[test]
    fn stats_without_history() {
        let v = view(&[], 1, 10);
        let lines = format_stats(&v);
        assert_eq!(lines[0], "Water plants (chores.txt)");
        assert_eq!(lines[1], "frequency:  1 (real: 1/10 per day)");
        assert_eq!(lines[2], "completed:  0 times, last never");
        assert_eq!(lines.last().unwrap(), "intervals:  need at least two completions");
    }

    #[test]
    fn stats_with_history() {
        let v = view(&["2026-10-10", "2026-10-12", "2026-10-14"], 1, 1);
        let lines = format_stats(&v);
        assert!(lines.contains(&"history:    max 2d, mean 2.0d, median 2d".to_string()));
        assert!(lines.contains(&"if today:   max 4d, mean 2.7d, median 2d".to_string()));
        assert!(lines.contains(&"     2d  ##  2".to_string()));
    }

    #[test]
    fn history_line_marks_current() {
        let mut record = TaskRecord::new("chores.txt".into(), "Sweep".into(), 2, date("2026-10-01"));
        record.done_dates.push(date("2026-10-05"));
        assert_eq!(
            format_history_line(&record, true),
            "* Sweep  2×  1 done, last 2026-10-05  [chores.txt]"
        );
    }

    #[test]
    fn config_json_uses_cli_names() {
        let json = serde_json::to_value(config_to_json(&Config::default())).unwrap();
        assert_eq!(json, serde_json::json!({"day_start": 4, "per_day": 1}));
    }
}
