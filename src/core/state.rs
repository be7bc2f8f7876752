//! Per-song state and the session aggregate.

use super::catalog::{SongCatalog, SongKey};
use super::flow::ActionKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Resolution status of a song.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SongStatus {
    #[default]
    Untouched,
    Picked,
    Banned,
}

impl SongStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Untouched => "untouched",
            Self::Picked => "picked",
            Self::Banned => "banned",
        }
    }

    /// Picked and banned songs are resolved; nothing moves them but reset.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Untouched)
    }
}

impl From<ActionKind> for SongStatus {
    fn from(action: ActionKind) -> Self {
        match action {
            ActionKind::Pick => Self::Picked,
            ActionKind::Ban => Self::Banned,
        }
    }
}

/// Mutable record kept for every catalog song.
///
/// `participant` and `step` are `None` while the song is untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongState {
    pub status: SongStatus,
    #[serde(rename = "player", default)]
    pub participant: Option<usize>,
    #[serde(default)]
    pub step: Option<usize>,
}

impl SongState {
    pub fn resolved(action: ActionKind, participant: usize, step: usize) -> Self {
        Self {
            status: action.into(),
            participant: Some(participant),
            step: Some(step),
        }
    }

    pub fn is_untouched(&self) -> bool {
        !self.status.is_resolved()
    }
}

/// Mismatch between a share-code keyed mapping and the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KeySetError {
    #[error("share code '{0}' is not in the catalog")]
    UnknownShareCode(String),

    #[error("share code '{0}' is missing from the submitted mapping")]
    MissingShareCode(String),
}

/// The aggregate: one [`SongState`] per catalog song plus the flow cursor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub song_states: BTreeMap<SongKey, SongState>,
    pub current_flow_step: usize,
}

impl SessionState {
    /// Cursor at zero and every catalog song untouched.
    pub fn fresh(catalog: &SongCatalog) -> Self {
        Self {
            song_states: catalog
                .keys()
                .map(|key| (key.clone(), SongState::default()))
                .collect(),
            current_flow_step: 0,
        }
    }

    pub fn get(&self, key: &SongKey) -> Option<&SongState> {
        self.song_states.get(key)
    }

    pub fn resolved_count(&self) -> usize {
        self.song_states
            .values()
            .filter(|s| s.status.is_resolved())
            .count()
    }

    /// Songs still open to an action, in key order.
    pub fn eligible(&self) -> impl Iterator<Item = &SongKey> {
        self.song_states
            .iter()
            .filter(|(_, s)| s.is_untouched())
            .map(|(k, _)| k)
    }

    pub fn is_untouched(&self) -> bool {
        self.current_flow_step == 0 && self.resolved_count() == 0
    }

    /// Convert to the share-code keyed wire shape.
    pub fn to_wire(&self, catalog: &SongCatalog) -> PbState {
        let song_states = self
            .song_states
            .iter()
            .filter_map(|(key, state)| {
                catalog
                    .get(key)
                    .map(|song| (song.share_code.clone(), state.clone()))
            })
            .collect();

        PbState {
            song_states,
            current_flow_step: self.current_flow_step,
        }
    }

    /// Convert from the wire shape; the key set must match the catalog exactly.
    pub fn from_wire(wire: &PbState, catalog: &SongCatalog) -> Result<Self, KeySetError> {
        check_key_set(&wire.song_states, catalog)?;

        let song_states = catalog
            .songs()
            .iter()
            .map(|song| {
                let state = wire.song_states[&song.share_code].clone();
                (song.key.clone(), state)
            })
            .collect();

        Ok(Self {
            song_states,
            current_flow_step: wire.current_flow_step,
        })
    }
}

/// Verify that a share-code keyed mapping covers the catalog, no more, no less.
pub fn check_key_set<V>(
    mapping: &BTreeMap<String, V>,
    catalog: &SongCatalog,
) -> Result<(), KeySetError> {
    if let Some(unknown) = mapping
        .keys()
        .find(|code| catalog.by_share_code(code).is_none())
    {
        return Err(KeySetError::UnknownShareCode(unknown.clone()));
    }

    match catalog
        .songs()
        .iter()
        .find(|song| !mapping.contains_key(&song.share_code))
    {
        Some(missing) => Err(KeySetError::MissingShareCode(missing.share_code.clone())),
        None => Ok(()),
    }
}

/// Wire and persistence shape: song states keyed by share code, plus the cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbState {
    pub song_states: BTreeMap<String, SongState>,
    pub current_flow_step: usize,
}
