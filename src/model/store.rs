use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::record::{RecordKey, TaskRecord};

/// Every task ever seen, in first-seen order.
///
/// Records are only ever appended, so an index handed out by the store stays
/// valid for the life of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    records: IndexMap<RecordKey, TaskRecord>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Build a store from a persisted list. A repeated key keeps the first
    /// record.
    pub fn from_records(records: Vec<TaskRecord>) -> Self {
        let mut map = IndexMap::with_capacity(records.len());
        for record in records {
            let key = record.key();
            if map.contains_key(&key) {
                tracing::warn!(list = %key.source_list_id, title = %key.title, "duplicate record in store ignored");
                continue;
            }
            map.insert(key, record);
        }
        Store { records: map }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn index_of(&self, key: &RecordKey) -> Option<usize> {
        self.records.get_index_of(key)
    }

    pub fn get(&self, index: usize) -> Option<&TaskRecord> {
        self.records.get_index(index).map(|(_, r)| r)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TaskRecord> {
        self.records.get_index_mut(index).map(|(_, r)| r)
    }

    /// Append a record whose key is not yet present, returning its index.
    /// An existing key is left untouched and its index returned.
    pub fn insert(&mut self, record: TaskRecord) -> usize {
        let key = record.key();
        if let Some(index) = self.records.get_index_of(&key) {
            return index;
        }
        self.records.insert_full(key, record).0
    }

    pub fn records(&self) -> impl Iterator<Item = &TaskRecord> {
        self.records.values()
    }
}

impl Serialize for Store {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records.values())
    }
}

impl<'de> Deserialize<'de> for Store {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<TaskRecord>::deserialize(deserializer).map(Store::from_records)
    }
}

/// The actively loaded task set: positions into a [`Store`], in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentList {
    pub indices: Vec<usize>,
}

impl CurrentList {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Sum of frequencies over the current tasks only
    pub fn total_frequency(&self, store: &Store) -> u64 {
        self.indices
            .iter()
            .filter_map(|&i| store.get(i))
            .map(|r| u64::from(r.frequency))
            .sum()
    }

    pub fn records<'a>(&'a self, store: &'a Store) -> impl Iterator<Item = (usize, &'a TaskRecord)> {
        self.indices
            .iter()
            .filter_map(move |&i| store.get(i).map(|r| (i, r)))
    }
}
