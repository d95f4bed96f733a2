//! In-memory calculation history.
//!
//! Records `(expression, result, kind)` triples after each manual
//! calculation and each completed agent turn, keeping only the most recent
//! entries. Nothing is persisted beyond this in-memory list.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of retained history entries.
pub const HISTORY_CAP: usize = 50;

/// How a history entry was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Manual expression evaluation.
    Manual,
    /// Completed agent turn.
    Agent,
}

impl EntryKind {
    /// Short display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Agent => "agent",
        }
    }
}

/// One recorded calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The submitted expression or question.
    pub expression: String,

    /// The rendered result text.
    pub result: String,

    /// How the entry was produced.
    pub kind: EntryKind,

    /// Unix timestamp when the entry was recorded.
    pub recorded_at: i64,
}

/// Bounded most-recent-first history list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Records an entry, evicting the oldest once the cap is reached.
    pub fn record(&mut self, expression: impl Into<String>, result: impl Into<String>, kind: EntryKind) {
        if self.entries.len() == HISTORY_CAP {
            self.entries.pop_back();
        }
        self.entries.push_front(HistoryEntry {
            expression: expression.into(),
            result: result.into(),
            kind,
            recorded_at: current_timestamp(),
        });
    }

    /// Returns entries most-recent first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Returns the most recent entry, if any.
    #[must_use]
    pub fn most_recent(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Returns the number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Returns the current Unix timestamp in seconds.
#[allow(clippy::cast_possible_wrap)]
fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read() {
        let mut history = History::new();
        assert!(history.is_empty());

        history.record("2+2", "4", EntryKind::Manual);
        assert_eq!(history.len(), 1);

        let entry = history.most_recent();
        assert!(entry.is_some_and(|e| e.expression == "2+2" && e.result == "4"));
    }

    #[test]
    fn test_most_recent_first() {
        let mut history = History::new();
        history.record("first", "1", EntryKind::Manual);
        history.record("second", "2", EntryKind::Agent);

        let expressions: Vec<&str> = history.entries().map(|e| e.expression.as_str()).collect();
        assert_eq!(expressions, vec!["second", "first"]);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = History::new();
        for i in 0..HISTORY_CAP + 10 {
            history.record(format!("expr-{i}"), format!("{i}"), EntryKind::Manual);
        }
        assert_eq!(history.len(), HISTORY_CAP);

        // The oldest ten entries were evicted
        let oldest = history.entries().last();
        assert!(oldest.is_some_and(|e| e.expression == "expr-10"));
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.record("2+2", "4", EntryKind::Manual);
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_serialization() {
        let mut history = History::new();
        history.record("1+1", "2", EntryKind::Manual);
        let json = serde_json::to_string(&history);
        assert!(json.is_ok());
    }
}
