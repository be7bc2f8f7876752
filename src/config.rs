//! Session configuration.

use serde::{Deserialize, Serialize};

/// Tunables fixed for the lifetime of a session.
///
/// Deserializes from JSON with missing fields taking their defaults:
///
/// ```rust
/// use pickban::SessionConfig;
///
/// let config: SessionConfig = serde_json::from_str(r#"{"allow_undo": true}"#).unwrap();
/// assert_eq!(config.participant_count, 2);
/// assert!(config.allow_undo);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of participants taking turns
    pub participant_count: usize,

    /// Whether the latest action may be reverted
    pub allow_undo: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            participant_count: 2,
            allow_undo: false,
        }
    }
}

impl SessionConfig {
    pub fn with_participants(mut self, participant_count: usize) -> Self {
        self.participant_count = participant_count;
        self
    }

    pub fn with_undo(mut self, allow_undo: bool) -> Self {
        self.allow_undo = allow_undo;
        self
    }
}
