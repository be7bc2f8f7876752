//! The externally callable surface of a session.
//!
//! [`StateGateway`] mirrors the three operations external callers (UI,
//! tournament controller) invoke: update, reset and query. Across that
//! boundary failures are plain `false`/`None`; [`StateGateway::try_update`] keeps the
//! typed error for in-process callers.

mod error;
mod reconcile;

pub use error::{ConflictReason, GatewayError};

use crate::core::{PbState, SessionState};
use crate::session::Session;
use std::sync::Arc;

/// The operations a transport exposes for one session.
pub trait PickBanService: Send + Sync {
    /// Submit the full song-state mapping after one pick or ban.
    fn update_state(&self, request: &PbState) -> bool;

    fn reset_state(&self) -> bool;

    fn get_current_state(&self) -> Option<PbState>;
}

/// Validating front door to a shared [`Session`].
#[derive(Clone, Debug)]
pub struct StateGateway {
    session: Arc<Session>,
}

impl StateGateway {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Reconcile a submitted snapshot and apply the single action it implies.
    ///
    /// Diffing and applying happen under one write lock, so no other writer
    /// can move the cursor in between.
    pub fn try_update(&self, submitted: &PbState) -> Result<SessionState, GatewayError> {
        self.session.with_machine_mut(|machine| {
            let song = reconcile::reconcile(machine, submitted).inspect_err(|e| {
                tracing::warn!(
                    session = %self.session.id(),
                    submitted_step = submitted.current_flow_step,
                    error = %e,
                    "update rejected"
                );
            })?;

            Ok(self
                .session
                .apply_locked(machine, &song, submitted.current_flow_step)?)
        })
    }

    pub fn update(&self, submitted: &PbState) -> bool {
        self.try_update(submitted).is_ok()
    }

    pub fn reset(&self) -> bool {
        self.session.reset();
        true
    }

    pub fn get_current_state(&self) -> Option<PbState> {
        Some(self.session.wire_snapshot())
    }
}

impl PickBanService for StateGateway {
    fn update_state(&self, request: &PbState) -> bool {
        self.update(request)
    }

    fn reset_state(&self) -> bool {
        self.reset()
    }

    fn get_current_state(&self) -> Option<PbState> {
        StateGateway::get_current_state(self)
    }
}
