//! The pick/ban state machine.

use crate::checkpoint::{CheckpointError, SessionCheckpoint};
use crate::config::SessionConfig;
use crate::core::{
    ActionHistory, ActionRecord, FlowDefinition, FlowStep, InvalidFlow, PbState, SessionState,
    SongCatalog, SongKey, SongState,
};
use crate::machine::error::ActionError;
use chrono::Utc;
use std::sync::Arc;

/// Authoritative pick/ban state for one session.
///
/// `apply_action` is the only way forward: one song, one step, checked
/// against the caller's view of the cursor. Every precondition is checked
/// before anything is written, so a rejected call leaves the machine as it
/// was.
#[derive(Clone, Debug)]
pub struct PickBanMachine {
    catalog: Arc<SongCatalog>,
    flow: Arc<FlowDefinition>,
    config: SessionConfig,
    state: SessionState,
    history: ActionHistory,
}

impl PickBanMachine {
    /// Create a machine at step 0 with every song untouched.
    ///
    /// The flow is re-validated against the catalog size and must have been
    /// built for the configured participant count.
    pub fn new(
        catalog: Arc<SongCatalog>,
        flow: Arc<FlowDefinition>,
        config: SessionConfig,
    ) -> Result<Self, InvalidFlow> {
        flow.check_fits(config.participant_count, catalog.len())?;

        let state = SessionState::fresh(&catalog);
        Ok(Self {
            catalog,
            flow,
            config,
            state,
            history: ActionHistory::new(),
        })
    }

    pub fn catalog(&self) -> &SongCatalog {
        &self.catalog
    }

    pub fn flow(&self) -> &FlowDefinition {
        &self.flow
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn current_step(&self) -> usize {
        self.state.current_flow_step
    }

    /// The step waiting to be played, or `None` once the flow is complete.
    pub fn expected_step(&self) -> Option<&FlowStep> {
        self.flow.get(self.state.current_flow_step)
    }

    pub fn is_complete(&self) -> bool {
        self.state.current_flow_step >= self.flow.len()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    pub(crate) fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current state in the share-code keyed wire shape.
    pub fn wire_snapshot(&self) -> PbState {
        self.state.to_wire(&self.catalog)
    }

    /// Apply the current flow step to `song`.
    ///
    /// `requested_step` is the caller's belief about the cursor; a mismatch
    /// is reported as [`ActionError::StaleStep`]. Once the flow is complete
    /// every call fails with [`ActionError::FlowComplete`].
    pub fn apply_action(
        &mut self,
        song: &SongKey,
        requested_step: usize,
    ) -> Result<SessionState, ActionError> {
        let current = self.state.current_flow_step;
        let (participant, action) = match self.flow.get(current) {
            Some(step) => (step.participant, step.action),
            None => {
                return Err(ActionError::FlowComplete {
                    steps: self.flow.len(),
                })
            }
        };

        if requested_step != current {
            return Err(ActionError::StaleStep {
                requested: requested_step,
                current,
            });
        }

        let song_state = self
            .state
            .song_states
            .get_mut(song)
            .ok_or_else(|| ActionError::UnknownSong(song.clone()))?;

        if !song_state.is_untouched() {
            return Err(ActionError::SongAlreadyResolved {
                song: song.clone(),
                status: song_state.status,
            });
        }

        *song_state = SongState::resolved(action, participant, current);
        self.state.current_flow_step += 1;
        self.history = self.history.record(ActionRecord {
            song: song.clone(),
            participant,
            action,
            step: current,
            timestamp: Utc::now(),
        });

        Ok(self.state.clone())
    }

    /// Back to step 0 with every song untouched. Always succeeds.
    pub fn reset(&mut self) -> SessionState {
        self.state = SessionState::fresh(&self.catalog);
        self.history = ActionHistory::new();
        self.state.clone()
    }

    /// Revert the latest action, if the session allows it.
    pub fn undo_last_action(&mut self) -> Result<SessionState, ActionError> {
        if !self.config.allow_undo {
            return Err(ActionError::UndoDisabled);
        }

        let song = self
            .history
            .last()
            .map(|record| record.song.clone())
            .ok_or(ActionError::NothingToUndo)?;

        // Every recorded song is in the catalog: records only come from
        // apply_action or a validated checkpoint.
        if let Some(state) = self.state.song_states.get_mut(&song) {
            *state = SongState::default();
        }
        self.state.current_flow_step -= 1;
        self.history = self.history.without_last();

        Ok(self.state.clone())
    }

    /// Capture the current state and history.
    pub fn checkpoint(&self) -> SessionCheckpoint {
        SessionCheckpoint::new(
            self.catalog.title(),
            self.wire_snapshot(),
            self.history.clone(),
        )
    }

    /// Replace state and history with a validated checkpoint.
    ///
    /// On error nothing changes.
    pub fn restore(&mut self, checkpoint: &SessionCheckpoint) -> Result<SessionState, CheckpointError> {
        let (state, history) = checkpoint.restore(&self.catalog, &self.flow)?;
        self.state = state;
        self.history = history;
        Ok(self.state.clone())
    }
}
