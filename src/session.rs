//! Shared, lock-guarded session.
//!
//! A [`Session`] owns one [`PickBanMachine`] behind a reader-writer lock:
//! snapshots take the read side and may run concurrently, while actions,
//! resets, undo and restore take the write side one at a time. Sessions are
//! handed around explicitly (usually as `Arc<Session>`), never stored in a
//! global.

use crate::checkpoint::{CheckpointError, SessionCheckpoint};
use crate::core::{PbState, SessionState, SongKey};
use crate::machine::{ActionError, PickBanMachine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Identifier used to tell sessions apart in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One running pick/ban negotiation.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    machine: RwLock<PickBanMachine>,
}

impl Session {
    pub fn new(machine: PickBanMachine) -> Self {
        let id = SessionId::new();
        tracing::info!(
            session = %id,
            playlist = machine.catalog().title(),
            songs = machine.catalog().len(),
            steps = machine.flow().len(),
            "session started"
        );
        Self {
            id,
            machine: RwLock::new(machine),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    // Writers validate before mutating, so a panicking holder cannot leave
    // a half-applied action behind and the guarded value stays usable.
    fn read(&self) -> RwLockReadGuard<'_, PickBanMachine> {
        self.machine.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PickBanMachine> {
        self.machine.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SessionState {
        self.read().snapshot()
    }

    pub fn wire_snapshot(&self) -> PbState {
        self.read().wire_snapshot()
    }

    /// Run `f` with shared access to the machine.
    pub fn with_machine<R>(&self, f: impl FnOnce(&PickBanMachine) -> R) -> R {
        f(&*self.read())
    }

    /// Run `f` with exclusive access; used where a read-check-write sequence
    /// must not interleave with other writers.
    pub(crate) fn with_machine_mut<R>(&self, f: impl FnOnce(&mut PickBanMachine) -> R) -> R {
        f(&mut *self.write())
    }

    pub fn apply_action(
        &self,
        song: &SongKey,
        requested_step: usize,
    ) -> Result<SessionState, ActionError> {
        self.with_machine_mut(|machine| self.apply_locked(machine, song, requested_step))
    }

    /// Apply an action on an already-locked machine, logging the outcome.
    pub(crate) fn apply_locked(
        &self,
        machine: &mut PickBanMachine,
        song: &SongKey,
        requested_step: usize,
    ) -> Result<SessionState, ActionError> {
        match machine.apply_action(song, requested_step) {
            Ok(state) => {
                if let Some(record) = machine.history().last() {
                    tracing::debug!(
                        session = %self.id,
                        song = %song,
                        step = record.step,
                        participant = record.participant,
                        action = %record.action,
                        "action applied"
                    );
                }
                if machine.is_complete() {
                    tracing::info!(session = %self.id, "flow complete");
                }
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(
                    session = %self.id,
                    song = %song,
                    requested_step,
                    error = %e,
                    "action rejected"
                );
                Err(e)
            }
        }
    }

    pub fn reset(&self) -> SessionState {
        let state = self.write().reset();
        tracing::info!(session = %self.id, "session reset");
        state
    }

    pub fn undo_last_action(&self) -> Result<SessionState, ActionError> {
        let result = self.write().undo_last_action();
        match &result {
            Ok(state) => tracing::info!(
                session = %self.id,
                step = state.current_flow_step,
                "last action undone"
            ),
            Err(e) => tracing::warn!(session = %self.id, error = %e, "undo rejected"),
        }
        result
    }

    pub fn checkpoint(&self) -> SessionCheckpoint {
        self.read().checkpoint()
    }

    pub fn restore(&self, checkpoint: &SessionCheckpoint) -> Result<SessionState, CheckpointError> {
        let result = self.write().restore(checkpoint);
        match &result {
            Ok(state) => tracing::info!(
                session = %self.id,
                checkpoint = %checkpoint.id,
                step = state.current_flow_step,
                "session restored"
            ),
            Err(e) => tracing::warn!(
                session = %self.id,
                checkpoint = %checkpoint.id,
                error = %e,
                "checkpoint rejected"
            ),
        }
        result
    }
}
