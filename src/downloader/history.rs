// Bounded recent-download log, most recent first. In-memory only.

use std::collections::VecDeque;

use super::models::DownloadRecord;

/// Number of records kept by default
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

#[derive(Debug, Clone)]
pub struct HistoryStore {
    records: VecDeque<DownloadRecord>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend a record, evicting the oldest beyond capacity
    pub fn record(&mut self, entry: DownloadRecord) {
        self.records.push_front(entry);
        self.records.truncate(self.capacity);
    }

    /// All records, most recent first
    pub fn all(&self) -> Vec<DownloadRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
