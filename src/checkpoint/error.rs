//! Checkpoint error types.

use crate::core::KeySetError;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint version is not supported by this version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Checkpoint was taken over a different playlist
    #[error("Checkpoint is for playlist '{found}', session runs '{expected}'")]
    PlaylistMismatch { expected: String, found: String },

    /// Checkpoint songs do not match the session catalog
    #[error("Checkpoint does not match catalog: {0}")]
    KeySet(#[from] KeySetError),

    /// Checkpoint state contradicts the flow definition
    #[error("Checkpoint validation failed: {0}")]
    ValidationFailed(String),
}
