//! Builder for constructing sessions.

use crate::builder::error::BuildError;
use crate::config::SessionConfig;
use crate::core::{FlowDefinition, FlowStep, Playlist, SongCatalog};
use crate::gateway::StateGateway;
use crate::machine::PickBanMachine;
use crate::session::Session;
use std::sync::Arc;

/// Builder that assembles catalog, flow and configuration into a session.
///
/// This is the session-start path: catalog key checks and flow validation
/// both run here, and any failure aborts the start.
pub struct SessionBuilder {
    catalog: Option<SongCatalog>,
    steps: Option<Vec<FlowStep>>,
    config: SessionConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            catalog: None,
            steps: None,
            config: SessionConfig::default(),
        }
    }

    /// Load the catalog from a playlist.
    /// Returns an error if song keys or share codes repeat.
    pub fn playlist(mut self, playlist: Playlist) -> Result<Self, BuildError> {
        self.catalog = Some(SongCatalog::from_playlist(playlist)?);
        Ok(self)
    }

    pub fn catalog(mut self, catalog: SongCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set the turn order (required).
    pub fn flow(mut self, steps: impl Into<Vec<FlowStep>>) -> Self {
        self.steps = Some(steps.into());
        self
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build_machine(self) -> Result<PickBanMachine, BuildError> {
        let catalog = self.catalog.ok_or(BuildError::MissingCatalog)?;
        let steps = self.steps.ok_or(BuildError::MissingFlow)?;

        let flow = FlowDefinition::new(steps, self.config.participant_count, catalog.len())?;
        Ok(PickBanMachine::new(
            Arc::new(catalog),
            Arc::new(flow),
            self.config,
        )?)
    }

    pub fn build(self) -> Result<Session, BuildError> {
        Ok(Session::new(self.build_machine()?))
    }

    /// Build a session and wrap it in a gateway.
    pub fn build_gateway(self) -> Result<StateGateway, BuildError> {
        Ok(StateGateway::new(Arc::new(self.build()?)))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::{catalog, song};
    use crate::core::{ActionKind, CatalogError};

    #[test]
    fn builder_requires_catalog() {
        let result = SessionBuilder::new()
            .flow(vec![FlowStep::unlabeled(0, ActionKind::Ban)])
            .build_machine();

        assert!(matches!(result, Err(BuildError::MissingCatalog)));
    }

    #[test]
    fn builder_requires_flow() {
        let result = SessionBuilder::new().catalog(catalog(&["a"])).build_machine();

        assert!(matches!(result, Err(BuildError::MissingFlow)));
    }

    #[test]
    fn builder_rejects_duplicate_songs() {
        let result = SessionBuilder::new().playlist(Playlist {
            title: "Dupes".to_string(),
            songs: vec![song("a"), song("a")],
        });

        assert!(matches!(
            result,
            Err(BuildError::Catalog(CatalogError::DuplicateKey(_)))
        ));
    }

    #[test]
    fn builder_rejects_flow_longer_than_catalog() {
        let result = SessionBuilder::new()
            .catalog(catalog(&["a"]))
            .flow(vec![
                FlowStep::unlabeled(0, ActionKind::Ban),
                FlowStep::unlabeled(1, ActionKind::Ban),
            ])
            .build();

        assert!(matches!(result, Err(BuildError::InvalidFlow(_))));
    }

    #[test]
    fn builder_honours_participant_count() {
        let machine = SessionBuilder::new()
            .catalog(catalog(&["a", "b", "c"]))
            .config(SessionConfig::default().with_participants(3))
            .flow(vec![
                FlowStep::unlabeled(0, ActionKind::Ban),
                FlowStep::unlabeled(1, ActionKind::Ban),
                FlowStep::unlabeled(2, ActionKind::Pick),
            ])
            .build_machine()
            .unwrap();

        assert_eq!(machine.flow().participant_count(), 3);
        assert_eq!(machine.flow().get(2).unwrap().participant, 2);
    }

    #[test]
    fn builder_produces_working_gateway() {
        let gateway = SessionBuilder::new()
            .catalog(catalog(&["a", "b"]))
            .flow(vec![FlowStep::unlabeled(0, ActionKind::Pick)])
            .build_gateway()
            .unwrap();

        assert_eq!(gateway.get_current_state().unwrap().song_states.len(), 2);
    }
}
