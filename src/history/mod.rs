//! Rolling calculation history.
//!
//! Entries are kept most recent first and the oldest are dropped once
//! the log grows past its capacity.

mod entry;

pub use entry::HistoryEntry;

use std::collections::VecDeque;
use std::fmt;

use chrono::Utc;
use tracing::debug;
use ulid::{Generator, Ulid};

/// Number of entries kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 50;

/// A capped, most-recent-first list of completed calculations.
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    ids: Generator,
}

impl fmt::Debug for HistoryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryLog")
            .field("entries", &self.entries)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a log that keeps at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            ids: Generator::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a completed calculation and return the new entry.
    pub fn append(&mut self, expression: &str, result: &str) -> &HistoryEntry {
        let now = Utc::now();
        // Wall clocks can step backwards; timestamps must not.
        let timestamp = match self.entries.front() {
            Some(latest) if latest.timestamp > now => latest.timestamp,
            _ => now,
        };
        let id = self
            .ids
            .generate()
            .unwrap_or_else(|_| Ulid::new())
            .to_string();

        self.entries
            .push_front(HistoryEntry::new(id, expression, result, timestamp));
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                debug!(id = %evicted.id, "history entry evicted");
            }
        }

        &self.entries[0]
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        debug!(count = self.entries.len(), "history cleared");
        self.entries.clear();
    }

    /// Look up an entry by position, 0 being the most recent.
    ///
    /// Selecting has no effect on the log; what to do with the entry is
    /// up to the caller.
    pub fn select(&self, index: usize) -> Option<&HistoryEntry> {
        let entry = self.entries.get(index);
        if let Some(entry) = entry {
            debug!(id = %entry.id, "history entry selected");
        }
        entry
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Iterate from most recent to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Serialize the entries, most recent first, as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistoryEntry;
    type IntoIter = std::collections::vec_deque::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
