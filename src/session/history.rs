// Bounded ledger of past winners, newest first.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use super::draw::DrawResult;

/// Maximum number of entries retained; the oldest fall off the tail.
pub const HISTORY_CAP: usize = 20;

/// A single recorded winner.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub name: String,
    pub recorded_at: DateTime<Utc>,
}

/// Ordered record of past draws: one entry per winner, most recent first.
/// Entries are never reordered once inserted; new draws prepend.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Rebuild from a persisted list of names (newest first). Timestamps
    /// are not persisted; restored entries are stamped at load time.
    pub fn from_names(names: Vec<String>) -> Self {
        let now = Utc::now();
        let entries = names
            .into_iter()
            .take(HISTORY_CAP)
            .map(|name| HistoryEntry {
                name,
                recorded_at: now,
            })
            .collect();
        History { entries }
    }

    /// Prepend each winner of a draw as an individual entry, preserving the
    /// winner order at the front, then drop the oldest past the cap.
    pub fn record(&mut self, result: &DrawResult) {
        let now = Utc::now();
        for name in result.winners.iter().rev() {
            self.entries.push_front(HistoryEntry {
                name: name.clone(),
                recorded_at: now,
            });
        }
        self.entries.truncate(HISTORY_CAP);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries newest first, for display.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Names newest first; this is the persisted payload shape.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
