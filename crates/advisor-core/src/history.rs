use std::collections::VecDeque;
use std::sync::Mutex;

use crate::model::Interaction;

/// Bounded, thread-safe log of answered questions.
///
/// Append and eviction happen under one lock acquisition, so the log
/// never exceeds its capacity and concurrent writers cannot interleave
/// a half-applied update. Interactions are immutable once recorded;
/// only eviction removes them, oldest first.
pub struct HistoryLog {
    capacity: usize,
    entries: Mutex<VecDeque<Interaction>>,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends one interaction, evicting the oldest past capacity.
    pub fn record(&self, interaction: Interaction) {
        let mut entries = self.entries.lock().unwrap();
        entries.push_back(interaction);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Up to `limit` interactions, most recent first. `limit` is
    /// clamped to the configured capacity.
    pub fn recent(&self, limit: usize) -> Vec<Interaction> {
        let limit = limit.min(self.capacity);
        let entries = self.entries.lock().unwrap();
        entries.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
