use chrono::NaiveDate;
use serde::Serialize;

use crate::model::record::TaskRecord;
use crate::model::store::{CurrentList, Store};

use super::interval::{Fraction, IntervalStatistics, real_frequency};
use super::urgency::{Rgb, UrgencyCalculator, Weight, fires_for_tier};

/// Everything the front ends show for one task, computed fresh each pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskView {
    /// Position of the record in the store
    #[serde(skip)]
    pub index: usize,
    pub list: String,
    pub title: String,
    pub frequency: u32,
    pub is_done: bool,
    pub days_since_done: i64,
    pub last_done: Option<NaiveDate>,
    pub urgency: i64,
    pub tier: i64,
    #[serde(serialize_with = "serialize_rgb")]
    pub color: Rgb,
    pub weight: Weight,
    pub fires: usize,
    pub completions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_frequency: Option<Fraction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intervals: Option<IntervalStatistics>,
}

fn serialize_rgb<S: serde::Serializer>(rgb: &Rgb, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&rgb.to_hex())
}

impl TaskView {
    pub fn build(index: usize, record: &TaskRecord, calc: &UrgencyCalculator, today: NaiveDate) -> Self {
        let is_done = record.is_done_on(today);
        let days_since_done = record.days_since_done(today);
        let urgency = calc.urgency(days_since_done, record.frequency);
        let tier = calc.tier(urgency);

        TaskView {
            index,
            list: record.source_list_id.clone(),
            title: record.title.clone(),
            frequency: record.frequency,
            is_done,
            days_since_done,
            last_done: record.last_done(),
            urgency,
            tier,
            color: calc.color(urgency),
            weight: calc.weight(urgency),
            fires: fires_for_tier(tier),
            completions: record.done_dates.len(),
            real_frequency: real_frequency(record.frequency, calc.todos_per_day(), calc.total_frequency()),
            intervals: IntervalStatistics::compute(&record.done_dates, is_done, today),
        }
    }
}

/// Stable sort: pending first, most overdue first, heavier tasks first
pub fn rank(views: &mut [TaskView]) {
    views.sort_by(|a, b| {
        a.is_done
            .cmp(&b.is_done)
            .then(b.days_since_done.cmp(&a.days_since_done))
            .then(b.frequency.cmp(&a.frequency))
    });
}

/// Build and rank views for the current list
pub fn ranked_views(
    store: &Store,
    current: &CurrentList,
    todos_per_day: u32,
    today: NaiveDate,
) -> Vec<TaskView> {
    let calc = UrgencyCalculator::new(current.total_frequency(store), todos_per_day);
    let mut views: Vec<TaskView> = current
        .records(store)
        .map(|(index, record)| TaskView::build(index, record, &calc, today))
        .collect();
    rank(&mut views);
    views
}
