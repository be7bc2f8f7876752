//! Errors returned by state machine operations.

use crate::core::{SongKey, SongStatus};
use thiserror::Error;

/// Reasons an action is rejected. A rejected action never mutates state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Every flow step has been consumed; terminal until reset.
    #[error("session finished: all {steps} flow steps are complete")]
    FlowComplete { steps: usize },

    /// The caller's view of the cursor is outdated; re-query and retry.
    #[error("stale step {requested}, current step is {current}")]
    StaleStep { requested: usize, current: usize },

    #[error("song '{0}' is not in the catalog")]
    UnknownSong(SongKey),

    #[error("song '{song}' is already {}", .status.name())]
    SongAlreadyResolved { song: SongKey, status: SongStatus },

    #[error("undo is disabled for this session")]
    UndoDisabled,

    #[error("no action to undo")]
    NothingToUndo,
}

impl ActionError {
    /// Whether re-reading the state and resubmitting can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StaleStep { .. })
    }
}
