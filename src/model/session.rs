use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use super::config::Config;
use super::store::{CurrentList, Store};
use crate::ops::calendar::DayClock;
use crate::ops::rank::{TaskView, ranked_views};
use crate::parse::list_id_for;

/// Error type for looking a task up by title
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no task '{0}' in the current list")]
    NotFound(String),
    #[error("'{title}' is in more than one list ({}); pass --list", .lists.join(", "))]
    Ambiguous { title: String, lists: Vec<String> },
}

/// Everything loaded for one run: settings, the full store and the tasks of
/// the open list.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub config: Config,
    pub store: Store,
    pub current: CurrentList,
    /// The list file `current` was loaded from
    pub list_file: Option<PathBuf>,
}

impl Session {
    pub fn new(config: Config, store: Store) -> Self {
        Session {
            config,
            store,
            current: CurrentList::default(),
            list_file: None,
        }
    }

    pub fn clock(&self) -> DayClock {
        DayClock::new(self.config.day.new_day_start)
    }

    pub fn today_at(&self, now: NaiveDateTime) -> NaiveDate {
        self.clock().today_at(now)
    }

    /// Identifier of the open list, if any
    pub fn list_id(&self) -> Option<String> {
        self.list_file.as_deref().map(list_id_for)
    }

    pub fn total_frequency(&self) -> u64 {
        self.current.total_frequency(&self.store)
    }

    /// Ranked views of the current list as of `today`
    pub fn views(&self, today: NaiveDate) -> Vec<TaskView> {
        ranked_views(&self.store, &self.current, self.config.day.todos_per_day, today)
    }

    /// Find a current task by title, optionally restricted to one list.
    ///
    /// An exact title match wins; otherwise a case-insensitive one is
    /// accepted.
    pub fn find_current(&self, title: &str, list: Option<&str>) -> Result<usize, LookupError> {
        let candidates: Vec<(usize, &str)> = self
            .current
            .records(&self.store)
            .filter(|(_, r)| list.is_none_or(|l| r.source_list_id == l))
            .map(|(i, r)| (i, r.title.as_str()))
            .collect();

        let mut matches: Vec<usize> = candidates
            .iter()
            .filter(|(_, t)| *t == title)
            .map(|(i, _)| *i)
            .collect();
        if matches.is_empty() {
            let wanted = title.to_lowercase();
            matches = candidates
                .iter()
                .filter(|(_, t)| t.to_lowercase() == wanted)
                .map(|(i, _)| *i)
                .collect();
        }

        match matches.as_slice() {
            [] => Err(LookupError::NotFound(title.to_string())),
            [index] => Ok(*index),
            many => Err(LookupError::Ambiguous {
                title: title.to_string(),
                lists: many
                    .iter()
                    .filter_map(|&i| self.store.get(i))
                    .map(|r| r.source_list_id.clone())
                    .collect(),
            }),
        }
    }
}
