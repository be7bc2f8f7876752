//! Flow definition: the fixed turn order of a pick/ban session.
//!
//! A flow is validated once at construction. Validation accumulates every
//! violation through Stillwater's `Validation` rather than stopping at the
//! first one, so a misconfigured flow is reported in full.

use serde::{Deserialize, Serialize};
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// The action expected at a flow step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Pick,
    Ban,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pick => "Pick",
            Self::Ban => "Ban",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the turn order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
    pub label: String,
    #[serde(rename = "player")]
    pub participant: usize,
    pub action: ActionKind,
}

impl FlowStep {
    pub fn new(label: impl Into<String>, participant: usize, action: ActionKind) -> Self {
        Self {
            label: label.into(),
            participant,
            action,
        }
    }

    /// Step labelled "Player N Pick" / "Player N Ban".
    pub fn unlabeled(participant: usize, action: ActionKind) -> Self {
        Self::new(
            format!("Player {} {}", participant + 1, action),
            participant,
            action,
        )
    }
}

/// A single reason a flow is invalid.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FlowViolation {
    #[error("participant count must be at least one")]
    NoParticipants,

    #[error("step {step} references participant {participant}, but only {participant_count} are configured")]
    ParticipantOutOfRange {
        step: usize,
        participant: usize,
        participant_count: usize,
    },

    #[error("flow has {steps} steps but the catalog only holds {songs} songs")]
    TooManySteps { steps: usize, songs: usize },

    #[error("flow was built for {flow} participants, but {configured} are configured")]
    ParticipantCountMismatch { flow: usize, configured: usize },
}

/// Construction failure carrying every violation found.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid flow: {}", join_violations(.violations))]
pub struct InvalidFlow {
    pub violations: Vec<FlowViolation>,
}

fn join_violations(violations: &[FlowViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check a step sequence against a participant count and song count.
pub fn validate_steps(
    steps: &[FlowStep],
    participant_count: usize,
    song_count: usize,
) -> Validation<(), NonEmptyVec<FlowViolation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<FlowViolation>>> = Vec::new();

    if participant_count == 0 {
        checks.push(Validation::fail(FlowViolation::NoParticipants));
    }

    if steps.len() > song_count {
        checks.push(Validation::fail(FlowViolation::TooManySteps {
            steps: steps.len(),
            songs: song_count,
        }));
    }

    for (index, step) in steps.iter().enumerate() {
        let check = if step.participant >= participant_count {
            Validation::fail(FlowViolation::ParticipantOutOfRange {
                step: index,
                participant: step.participant,
                participant_count,
            })
        } else {
            Validation::success(())
        };
        checks.push(check);
    }

    Validation::all_vec(checks).map(|_| ())
}

fn into_result(validation: Validation<(), NonEmptyVec<FlowViolation>>) -> Result<(), InvalidFlow> {
    match validation {
        Validation::Success(_) => Ok(()),
        Validation::Failure(violations) => Err(InvalidFlow {
            violations: violations.iter().cloned().collect(),
        }),
    }
}

/// Validated, immutable turn order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlowDefinition {
    steps: Vec<FlowStep>,
    participant_count: usize,
}

impl FlowDefinition {
    /// Validate and build a flow for a catalog of `song_count` songs.
    pub fn new(
        steps: Vec<FlowStep>,
        participant_count: usize,
        song_count: usize,
    ) -> Result<Self, InvalidFlow> {
        into_result(validate_steps(&steps, participant_count, song_count))?;
        Ok(Self {
            steps,
            participant_count,
        })
    }

    /// The flow for an empty catalog: no steps, already complete.
    pub fn empty(participant_count: usize) -> Self {
        Self {
            steps: Vec::new(),
            participant_count,
        }
    }

    /// Bans then picks, rotating through participants in each phase.
    ///
    /// `bans` and `picks` are per participant, so with two participants,
    /// one ban and two picks the order is P1 ban, P2 ban, P1 pick, P2 pick,
    /// P1 pick, P2 pick.
    pub fn alternating(
        participant_count: usize,
        bans: usize,
        picks: usize,
        song_count: usize,
    ) -> Result<Self, InvalidFlow> {
        let phase = |action: ActionKind, rounds: usize| {
            (0..rounds).flat_map(move |_| {
                (0..participant_count).map(move |p| FlowStep::unlabeled(p, action))
            })
        };
        let steps = phase(ActionKind::Ban, bans)
            .chain(phase(ActionKind::Pick, picks))
            .collect();

        Self::new(steps, participant_count, song_count)
    }

    /// Re-check this flow against a participant count and catalog size.
    ///
    /// The participant count must be the one the flow was built for.
    pub fn check_fits(&self, participant_count: usize, song_count: usize) -> Result<(), InvalidFlow> {
        let count_check = if participant_count == self.participant_count {
            Validation::success(())
        } else {
            Validation::fail(FlowViolation::ParticipantCountMismatch {
                flow: self.participant_count,
                configured: participant_count,
            })
        };
        into_result(
            Validation::all_vec(vec![
                count_check,
                validate_steps(&self.steps, participant_count, song_count),
            ])
            .map(|_| ()),
        )
    }

    pub fn get(&self, step: usize) -> Option<&FlowStep> {
        self.steps.get(step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    pub fn participant_count(&self) -> usize {
        self.participant_count
    }
}
