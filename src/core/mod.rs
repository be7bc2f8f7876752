//! Core pick/ban types.
//!
//! This module contains the pure data model of a session:
//! - The song catalog and its playlist source
//! - The validated flow definition (turn order)
//! - Per-song state and the session aggregate, with its wire shape
//! - Immutable action history
//!
//! Nothing here locks, logs or performs I/O.

mod catalog;
mod flow;
mod history;
mod state;

#[cfg(test)]
pub(crate) use catalog::fixtures;

pub use catalog::{
    CatalogError, Difficulty, Playlist, PlaylistSource, Song, SongCatalog, SongKey,
    StaticPlaylists,
};
pub use flow::{validate_steps, ActionKind, FlowDefinition, FlowStep, FlowViolation, InvalidFlow};
pub use history::{ActionHistory, ActionRecord};
pub use state::{check_key_set, KeySetError, PbState, SessionState, SongState, SongStatus};
