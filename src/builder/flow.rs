//! Builder for constructing flow definitions.

use crate::builder::error::BuildError;
use crate::core::{ActionKind, FlowDefinition, FlowStep};

/// Builder for flow definitions with a fluent API.
///
/// Steps added without a label get "Player N Ban" / "Player N Pick".
pub struct FlowBuilder {
    participant_count: usize,
    steps: Vec<FlowStep>,
}

impl FlowBuilder {
    /// Create a builder for two participants.
    pub fn new() -> Self {
        Self {
            participant_count: 2,
            steps: Vec::new(),
        }
    }

    pub fn participants(mut self, n: usize) -> Self {
        self.participant_count = n;
        self
    }

    pub fn ban(self, participant: usize) -> Self {
        self.push(FlowStep::unlabeled(participant, ActionKind::Ban))
    }

    pub fn pick(self, participant: usize) -> Self {
        self.push(FlowStep::unlabeled(participant, ActionKind::Pick))
    }

    /// Add a labelled step.
    pub fn step(self, label: impl Into<String>, participant: usize, action: ActionKind) -> Self {
        self.push(FlowStep::new(label, participant, action))
    }

    /// Append several pre-built steps.
    pub fn steps(mut self, steps: impl IntoIterator<Item = FlowStep>) -> Self {
        self.steps.extend(steps);
        self
    }

    fn push(mut self, step: FlowStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Steps added so far, unvalidated.
    pub fn into_steps(self) -> Vec<FlowStep> {
        self.steps
    }

    /// Validate against a catalog of `song_count` songs.
    pub fn build(self, song_count: usize) -> Result<FlowDefinition, BuildError> {
        Ok(FlowDefinition::new(
            self.steps,
            self.participant_count,
            song_count,
        )?)
    }
}

impl Default for FlowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FlowViolation;

    #[test]
    fn fluent_api_builds_flow() {
        let flow = FlowBuilder::new()
            .ban(0)
            .ban(1)
            .step("Decider", 0, ActionKind::Pick)
            .build(5)
            .unwrap();

        assert_eq!(flow.len(), 3);
        assert_eq!(flow.get(1).unwrap().label, "Player 2 Ban");
        assert_eq!(flow.get(2).unwrap().label, "Decider");
    }

    #[test]
    fn builder_validates_participants() {
        let result = FlowBuilder::new().participants(3).pick(3).build(4);

        match result {
            Err(BuildError::InvalidFlow(err)) => assert_eq!(
                err.violations,
                vec![FlowViolation::ParticipantOutOfRange {
                    step: 0,
                    participant: 3,
                    participant_count: 3,
                }]
            ),
            other => panic!("Expected InvalidFlow, got {other:?}"),
        }
    }

    #[test]
    fn builder_validates_song_count() {
        let result = FlowBuilder::new().ban(0).ban(1).pick(0).build(2);
        assert!(matches!(result, Err(BuildError::InvalidFlow(_))));
    }

    #[test]
    fn empty_builder_gives_empty_flow() {
        assert!(FlowBuilder::default().build(0).unwrap().is_empty());
    }
}
