use chrono::NaiveDate;

use crate::model::record::{RecordKey, TaskRecord};
use crate::model::store::{CurrentList, Store};
use crate::parse::ListEntry;

/// What a reconciliation pass did to the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The freshly loaded tasks as positions into the store
    pub current: CurrentList,
    /// New records created
    pub added: usize,
    /// Existing records whose frequency changed
    pub updated: usize,
    /// Entries dropped because their key already appeared earlier in the list
    pub duplicates: usize,
}

impl ReconcileOutcome {
    /// Whether the store differs from what was persisted before the pass
    pub fn dirty(&self) -> bool {
        self.added > 0 || self.updated > 0
    }
}

/// Merge a freshly parsed list into the store.
///
/// Known tasks take the newly declared frequency and keep their history;
/// unknown tasks become new records added on `today`. Records missing from
/// `entries` are left alone.
pub fn reconcile(store: &mut Store, entries: Vec<ListEntry>, today: NaiveDate) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for entry in entries {
        let key = RecordKey::new(entry.source_list_id, entry.title);

        let index = match store.index_of(&key) {
            Some(index) => {
                if outcome.current.contains(index) {
                    tracing::warn!(list = %key.source_list_id, title = %key.title, "duplicate task in list ignored");
                    outcome.duplicates += 1;
                    continue;
                }
                if let Some(record) = store.get_mut(index)
                    && record.frequency != entry.frequency
                {
                    tracing::debug!(
                        title = %key.title,
                        from = record.frequency,
                        to = entry.frequency,
                        "frequency changed"
                    );
                    record.frequency = entry.frequency;
                    outcome.updated += 1;
                }
                index
            }
            None => {
                tracing::debug!(title = %key.title, "new task");
                outcome.added += 1;
                store.insert(TaskRecord::new(
                    key.source_list_id,
                    key.title,
                    entry.frequency,
                    today,
                ))
            }
        };

        outcome.current.indices.push(index);
    }

    tracing::info!(
        current = outcome.current.len(),
        added = outcome.added,
        updated = outcome.updated,
        "reconciled task list"
    );
    outcome
}
