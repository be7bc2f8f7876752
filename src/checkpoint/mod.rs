//! Checkpoint and restore for pick/ban sessions.
//!
//! A checkpoint captures the wire-shaped state and the action history so a
//! session can survive a process restart. Restoring re-validates everything
//! against the session's catalog and flow; a checkpoint is never trusted.

use crate::core::{
    ActionHistory, FlowDefinition, PbState, SessionState, SongCatalog, SongState, SongStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable checkpoint of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionCheckpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Title of the playlist the session runs over
    pub playlist: String,

    /// Song states keyed by share code, plus the cursor
    pub state: PbState,

    /// Actions applied so far
    pub history: ActionHistory,
}

impl SessionCheckpoint {
    pub fn new(playlist: impl Into<String>, state: PbState, history: ActionHistory) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            playlist: playlist.into(),
            state,
            history,
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }

    /// Rebuild session state and history, checking them against the flow.
    ///
    /// Untouched songs are normalized so stray participant/step values in
    /// the payload are dropped.
    pub(crate) fn restore(
        &self,
        catalog: &SongCatalog,
        flow: &FlowDefinition,
    ) -> Result<(SessionState, ActionHistory), CheckpointError> {
        self.check_version()?;
        if self.playlist != catalog.title() {
            return Err(CheckpointError::PlaylistMismatch {
                expected: catalog.title().to_string(),
                found: self.playlist.clone(),
            });
        }

        let mut state = SessionState::from_wire(&self.state, catalog)?;
        for song in state.song_states.values_mut() {
            if song.is_untouched() {
                *song = SongState::default();
            }
        }

        validate_state(&state, flow)?;
        validate_history(&state, &self.history, flow)?;

        Ok((state, self.history.clone()))
    }
}

fn invalid(message: String) -> CheckpointError {
    CheckpointError::ValidationFailed(message)
}

fn validate_state(state: &SessionState, flow: &FlowDefinition) -> Result<(), CheckpointError> {
    let cursor = state.current_flow_step;
    if cursor > flow.len() {
        return Err(invalid(format!(
            "cursor {cursor} is beyond flow length {}",
            flow.len()
        )));
    }

    let resolved = state.resolved_count();
    if resolved != cursor {
        return Err(invalid(format!(
            "{resolved} resolved songs but cursor is {cursor}"
        )));
    }

    let mut seen = vec![false; cursor];
    for (key, song) in state.song_states.iter().filter(|(_, s)| !s.is_untouched()) {
        let step = match song.step {
            Some(step) if step < cursor => step,
            other => {
                return Err(invalid(format!(
                    "song '{key}' has step {other:?} outside 0..{cursor}"
                )))
            }
        };
        if std::mem::replace(&mut seen[step], true) {
            return Err(invalid(format!("step {step} was recorded twice")));
        }

        // step < cursor <= flow.len()
        let expected = &flow.steps()[step];
        if song.participant != Some(expected.participant)
            || song.status != SongStatus::from(expected.action)
        {
            return Err(invalid(format!(
                "song '{key}' does not match flow step {step} ({})",
                expected.label
            )));
        }
    }

    Ok(())
}

fn validate_history(
    state: &SessionState,
    history: &ActionHistory,
    flow: &FlowDefinition,
) -> Result<(), CheckpointError> {
    if history.len() != state.current_flow_step {
        return Err(invalid(format!(
            "history holds {} actions but cursor is {}",
            history.len(),
            state.current_flow_step
        )));
    }

    for (index, record) in history.records().iter().enumerate() {
        let recorded = state.get(&record.song).and_then(|s| s.step);
        if record.step != index || recorded != Some(index) {
            return Err(invalid(format!(
                "history entry {index} for song '{}' disagrees with song states",
                record.song
            )));
        }

        // index < cursor <= flow.len()
        let expected = &flow.steps()[index];
        if record.participant != expected.participant || record.action != expected.action {
            return Err(invalid(format!(
                "history entry {index} is participant {} {}, flow step {index} ({}) expects participant {} {}",
                record.participant, record.action, expected.label, expected.participant, expected.action
            )));
        }
    }

    Ok(())
}
