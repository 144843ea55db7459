use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{
    core::{authority::Authority, metrics::Evaluation, scenario::Scenario, station::StationSpec},
    prelude::*,
};

/// Full input of an evaluation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub scenario: Scenario,
    pub stations: Vec<StationSpec>,
    pub authority: Option<Authority>,
}

/// Read-through memo of the evaluations, safe to share between threads.
///
/// When full, the memo is cleared before inserting.
pub struct Memo {
    capacity: usize,
    entries: RwLock<HashMap<Key, Evaluation>>,
}

impl Memo {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, entries: RwLock::new(HashMap::with_capacity(capacity)) }
    }

    pub fn get(&self, key: &Key) -> Option<Evaluation> {
        self.entries.read().get(key).cloned()
    }

    pub fn insert(&self, key: Key, evaluation: Evaluation) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            debug!(n_entries = entries.len(), "the memo is full, clearing");
            entries.clear();
        }
        entries.insert(key, evaluation);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl Default for Memo {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}
