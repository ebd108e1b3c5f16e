use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Natural key of a record: identically titled tasks from different lists
/// are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub source_list_id: String,
    pub title: String,
}

impl RecordKey {
    pub fn new(source_list_id: impl Into<String>, title: impl Into<String>) -> Self {
        RecordKey {
            source_list_id: source_list_id.into(),
            title: title.into(),
        }
    }
}

/// A recurring task and its full completion history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// File name of the list the task was read from
    pub source_list_id: String,
    /// Display text (never empty)
    pub title: String,
    /// Declared weight, at least 1
    pub frequency: u32,
    /// Effective day the task was first seen
    pub added_date: NaiveDate,
    /// Completion log, oldest first. Only the tail is ever touched.
    #[serde(default)]
    pub done_dates: Vec<NaiveDate>,
}

impl TaskRecord {
    /// Create a record that has never been done
    pub fn new(source_list_id: String, title: String, frequency: u32, added: NaiveDate) -> Self {
        TaskRecord {
            source_list_id,
            title,
            frequency,
            added_date: added,
            done_dates: Vec::new(),
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.source_list_id.clone(), self.title.clone())
    }

    pub fn last_done(&self) -> Option<NaiveDate> {
        self.done_dates.last().copied()
    }

    /// Whether the most recent completion falls on `today`
    pub fn is_done_on(&self, today: NaiveDate) -> bool {
        self.last_done() == Some(today)
    }

    /// The date elapsed days are counted from.
    ///
    /// When the task was completed today, that completion is skipped so the
    /// count reflects the state before today's toggle. Falls back to the
    /// added date when there is no earlier completion.
    pub fn baseline_date(&self, today: NaiveDate) -> NaiveDate {
        let dates = if self.is_done_on(today) {
            &self.done_dates[..self.done_dates.len() - 1]
        } else {
            &self.done_dates[..]
        };
        dates.last().copied().unwrap_or(self.added_date)
    }

    /// Whole days between the baseline date and `today`
    pub fn days_since_done(&self, today: NaiveDate) -> i64 {
        (today - self.baseline_date(today)).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(done: &[&str]) -> TaskRecord {
        let mut r = TaskRecord::new("chores.txt".into(), "Water plants".into(), 3, date("2026-01-01"));
        r.done_dates = done.iter().map(|d| date(d)).collect();
        r
    }

    #[test]
    fn days_since_done_counts_from_added_date_when_never_done() {
        let r = record(&[]);
        assert_eq!(r.days_since_done(date("2026-01-11")), 10);
    }

    #[test]
    fn days_since_done_counts_from_last_completion() {
        let r = record(&["2026-01-03", "2026-01-07"]);
        assert_eq!(r.days_since_done(date("2026-01-10")), 3);
        assert!(!r.is_done_on(date("2026-01-10")));
    }

    #[test]
    fn todays_completion_is_skipped() {
        let r = record(&["2026-01-03", "2026-01-10"]);
        assert!(r.is_done_on(date("2026-01-10")));
        assert_eq!(r.days_since_done(date("2026-01-10")), 7);
    }

    #[test]
    fn only_completion_today_falls_back_to_added_date() {
        let r = record(&["2026-01-10"]);
        assert_eq!(r.baseline_date(date("2026-01-10")), date("2026-01-01"));
        assert_eq!(r.days_since_done(date("2026-01-10")), 9);
    }

    #[test]
    fn serializes_with_camel_case_fields_and_plain_dates() {
        let r = record(&["2026-01-03"]);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["sourceListId"], "chores.txt");
        assert_eq!(json["addedDate"], "2026-01-01");
        assert_eq!(json["doneDates"][0], "2026-01-03");
    }
}
