//! Gateway error types.

use crate::core::{ActionKind, KeySetError, SongStatus};
use crate::machine::ActionError;
use thiserror::Error;

/// Why a submitted snapshot is not a single valid step ahead of the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictReason {
    #[error(transparent)]
    KeySet(#[from] KeySetError),

    #[error("resolved song '{share_code}' was changed")]
    ResolvedSongChanged { share_code: String },

    #[error("no song was picked or banned")]
    NoAction,

    #[error("{} songs were resolved at once: {}", .share_codes.len(), .share_codes.join(", "))]
    MultipleActions { share_codes: Vec<String> },

    #[error("song '{share_code}' is {}, but the step expects a {expected}", .submitted.name())]
    WrongAction {
        share_code: String,
        expected: ActionKind,
        submitted: SongStatus,
    },

    #[error("song '{share_code}' credits participant {submitted:?}, but it is participant {expected}'s turn")]
    WrongParticipant {
        share_code: String,
        expected: usize,
        submitted: Option<usize>,
    },

    #[error("song '{share_code}' records step {submitted:?}, expected {expected}")]
    WrongStep {
        share_code: String,
        expected: usize,
        submitted: Option<usize>,
    },
}

/// Typed failure of a gateway operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("conflicting update: {0}")]
    Conflict(#[from] ConflictReason),
}

impl GatewayError {
    /// Whether the caller should re-sync and try again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Action(e) => e.is_retryable(),
            Self::Conflict(_) => true,
        }
    }
}
