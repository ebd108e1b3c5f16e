use chrono::NaiveDate;

use crate::model::record::TaskRecord;

/// Error type for completion changes
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("'{0}' is already done today")]
    AlreadyDoneToday(String),
    #[error("'{0}' has never been done")]
    NeverDone(String),
}

/// Which way a toggle went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Marked(NaiveDate),
    Unmarked(NaiveDate),
}

/// Record a completion on `today`.
///
/// A second completion on the same day is refused unless `again` is set, in
/// which case it is appended like any other.
pub fn mark_done(record: &mut TaskRecord, today: NaiveDate, again: bool) -> Result<(), CompletionError> {
    if record.is_done_on(today) && !again {
        return Err(CompletionError::AlreadyDoneToday(record.title.clone()));
    }
    record.done_dates.push(today);
    Ok(())
}

/// Remove the most recent completion, returning its date
pub fn unmark_done(record: &mut TaskRecord) -> Result<NaiveDate, CompletionError> {
    record
        .done_dates
        .pop()
        .ok_or_else(|| CompletionError::NeverDone(record.title.clone()))
}

/// Flip the done-today state
pub fn toggle_done(record: &mut TaskRecord, today: NaiveDate) -> Toggle {
    if record.is_done_on(today) {
        record.done_dates.pop();
        Toggle::Unmarked(today)
    } else {
        record.done_dates.push(today);
        Toggle::Marked(today)
    }
}
