//! Action history tracking.
//!
//! Provides immutable tracking of the actions applied during a session,
//! in the order they were applied.

use super::catalog::SongKey;
use super::flow::ActionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied action.
///
/// # Example
///
/// ```rust
/// use pickban::core::{ActionKind, ActionRecord, SongKey};
/// use chrono::Utc;
///
/// let record = ActionRecord {
///     song: SongKey::new("abc"),
///     participant: 0,
///     action: ActionKind::Ban,
///     step: 0,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.step, 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The song acted on
    pub song: SongKey,
    /// Who acted
    pub participant: usize,
    /// What they did
    pub action: ActionKind,
    /// Flow step the action consumed
    pub step: usize,
    /// When the action was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of applied actions.
///
/// History is immutable - `record` returns a new history with the action
/// added, following the same discipline as the session snapshot.
///
/// # Example
///
/// ```rust
/// use pickban::core::{ActionHistory, ActionKind, ActionRecord, SongKey};
/// use chrono::Utc;
///
/// let history = ActionHistory::new();
/// let history = history.record(ActionRecord {
///     song: SongKey::new("a"),
///     participant: 0,
///     action: ActionKind::Ban,
///     step: 0,
///     timestamp: Utc::now(),
/// });
/// let history = history.record(ActionRecord {
///     song: SongKey::new("b"),
///     participant: 1,
///     action: ActionKind::Pick,
///     step: 1,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(
///     history.turns(),
///     vec![(0, ActionKind::Ban), (1, ActionKind::Pick)]
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionHistory {
    records: Vec<ActionRecord>,
}

impl ActionHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record an action, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, record: ActionRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// History without its latest record.
    pub fn without_last(&self) -> Self {
        let mut records = self.records.clone();
        records.pop();
        Self { records }
    }

    pub fn last(&self) -> Option<&ActionRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The (participant, action) pairs in application order.
    pub fn turns(&self) -> Vec<(usize, ActionKind)> {
        self.records
            .iter()
            .map(|r| (r.participant, r.action))
            .collect()
    }

    /// Calculate total duration from first to last action.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all records in order.
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(song: &str, participant: usize, action: ActionKind, step: usize) -> ActionRecord {
        ActionRecord {
            song: SongKey::new(song),
            participant,
            action,
            step,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = ActionHistory::new();
        assert!(history.is_empty());
        assert!(history.last().is_none());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = ActionHistory::new();
        let new_history = history.record(record("a", 0, ActionKind::Ban, 0));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn without_last_drops_latest_record() {
        let history = ActionHistory::new()
            .record(record("a", 0, ActionKind::Ban, 0))
            .record(record("b", 1, ActionKind::Pick, 1));

        let trimmed = history.without_last();
        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed.last().unwrap().song, SongKey::new("a"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let history = ActionHistory::new().record(record("a", 0, ActionKind::Ban, 0));

        std::thread::sleep(std::time::Duration::from_millis(10));

        let history = history.record(record("b", 1, ActionKind::Pick, 1));

        let duration = history.duration().unwrap();
        assert!(duration >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = ActionHistory::new().record(record("a", 0, ActionKind::Ban, 0));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: ActionHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(history, deserialized);
    }
}
