//! Turning a submitted full snapshot into a single action.
//!
//! Callers submit the whole song-state mapping they want to see. The only
//! submission accepted is the current state plus exactly one song moved from
//! untouched to the status, participant and step the current flow step
//! prescribes.

use crate::core::{check_key_set, PbState, Song, SongKey, SongState, SongStatus};
use crate::gateway::error::{ConflictReason, GatewayError};
use crate::machine::{ActionError, PickBanMachine};

/// Find the one song the submission resolves, or explain why it cannot apply.
pub(crate) fn reconcile(
    machine: &PickBanMachine,
    submitted: &PbState,
) -> Result<SongKey, GatewayError> {
    let current = machine.current_step();
    let expected = machine.expected_step().ok_or(ActionError::FlowComplete {
        steps: machine.flow().len(),
    })?;

    if submitted.current_flow_step != current {
        return Err(ActionError::StaleStep {
            requested: submitted.current_flow_step,
            current,
        }
        .into());
    }

    let catalog = machine.catalog();
    check_key_set(&submitted.song_states, catalog).map_err(ConflictReason::from)?;

    let state = machine.state();
    let mut newly_resolved: Vec<(&Song, &SongState)> = Vec::new();
    for song in catalog.songs() {
        let proposed = &submitted.song_states[&song.share_code];
        let held = state.get(&song.key).cloned().unwrap_or_default();

        if held.is_untouched() {
            if proposed.status.is_resolved() {
                newly_resolved.push((song, proposed));
            }
        } else if *proposed != held {
            return Err(ConflictReason::ResolvedSongChanged {
                share_code: song.share_code.clone(),
            }
            .into());
        }
    }

    let (song, proposed) = match newly_resolved.as_slice() {
        [] => return Err(ConflictReason::NoAction.into()),
        [single] => *single,
        many => {
            return Err(ConflictReason::MultipleActions {
                share_codes: many.iter().map(|(s, _)| s.share_code.clone()).collect(),
            }
            .into())
        }
    };

    let share_code = song.share_code.clone();
    if proposed.status != SongStatus::from(expected.action) {
        return Err(ConflictReason::WrongAction {
            share_code,
            expected: expected.action,
            submitted: proposed.status,
        }
        .into());
    }
    if proposed.participant != Some(expected.participant) {
        return Err(ConflictReason::WrongParticipant {
            share_code,
            expected: expected.participant,
            submitted: proposed.participant,
        }
        .into());
    }
    if proposed.step != Some(current) {
        return Err(ConflictReason::WrongStep {
            share_code,
            expected: current,
            submitted: proposed.step,
        }
        .into());
    }

    Ok(song.key.clone())
}
