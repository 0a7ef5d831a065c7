//! Append-only audit trail of corrections.
use serde::{Deserialize, Serialize};

/// One correction: which end changed and its value before and after.
///
/// Persisted as a `[endIndex, oldValue, newValue]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, i32, i32)", into = "(usize, i32, i32)")]
pub struct EditEntry {
    pub end_index: usize,
    pub old_value: i32,
    pub new_value: i32,
}

impl From<(usize, i32, i32)> for EditEntry {
    fn from((end_index, old_value, new_value): (usize, i32, i32)) -> Self {
        Self {
            end_index,
            old_value,
            new_value,
        }
    }
}

impl From<EditEntry> for (usize, i32, i32) {
    fn from(entry: EditEntry) -> Self {
        (entry.end_index, entry.old_value, entry.new_value)
    }
}

/// Corrections in the order they were applied. There is no removal operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditLog {
    entries: Vec<EditEntry>,
}

impl EditLog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) const fn from_entries(entries: Vec<EditEntry>) -> Self {
        Self { entries }
    }

    /// Append a correction. Validation belongs to the ledger, so this never fails.
    pub fn record(&mut self, end_index: usize, old_value: i32, new_value: i32) -> EditEntry {
        let entry = EditEntry {
            end_index,
            old_value,
            new_value,
        };
        self.entries.push(entry);
        entry
    }

    /// Oldest first.
    #[must_use]
    pub fn entries(&self) -> &[EditEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Corrections touching one end, oldest first.
    pub fn for_end(&self, end_index: usize) -> impl Iterator<Item = &EditEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.end_index == end_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_in_order() {
        let mut log = EditLog::new();
        log.record(1, -3, -7);
        log.record(0, 5, 4);
        log.record(1, -7, 2);
        assert_eq!(log.len(), 3);
        assert_eq!(log.entries()[0].new_value, -7);
        assert_eq!(log.for_end(1).count(), 2);
        assert_eq!(log.for_end(2).count(), 0);
    }

    #[test]
    fn entries_persist_as_triples() {
        let mut log = EditLog::new();
        log.record(1, -3, -7);
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(json, "[[1,-3,-7]]");
        let back: EditLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
