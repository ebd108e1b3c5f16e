use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Turns wall-clock time into the effective day.
///
/// Before `new_day_start` o'clock the previous day is still "today", so work
/// done after midnight counts toward the day it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayClock {
    pub new_day_start: u32,
}

impl DayClock {
    pub fn new(new_day_start: u32) -> Self {
        DayClock { new_day_start }
    }

    /// Effective day for the given local time
    pub fn today_at(&self, now: NaiveDateTime) -> NaiveDate {
        let date = now.date();
        if now.hour() < self.new_day_start {
            date.pred_opt().unwrap_or(date)
        } else {
            date
        }
    }

    /// Effective day right now
    pub fn today(&self) -> NaiveDate {
        self.today_at(Local::now().naive_local())
    }
}
