//! Exercise form definitions.
//!
//! An [`ExerciseForm`] is plain data: the angle ranges a joint should sit in
//! per phase, and an ordered list of [`FormCheckpoint`]s. Each checkpoint
//! pairs its coaching text with a [`FormCheck`] predicate, so adding an
//! exercise never touches the analyzer.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::features::Joint;
use crate::landmarks::LandmarkFrame;
use crate::phase::{MovementPhase, PhaseThresholds};

pub mod catalog;
pub mod checks;
pub mod registry;

pub use registry::{builtin_registry, FormRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPart {
    Head,
    Shoulders,
    Back,
    Hips,
    Knees,
    Feet,
    Arms,
    Core,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Which way the user should move to correct a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Rotate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub severity: Option<Severity>,
    pub direction: Option<Direction>,
}

impl CheckOutcome {
    pub const fn pass() -> Self {
        Self {
            passed: true,
            severity: None,
            direction: None,
        }
    }

    pub const fn fail(severity: Severity, direction: Option<Direction>) -> Self {
        Self {
            passed: false,
            severity: Some(severity),
            direction,
        }
    }
}

/// A pure predicate over one landmark frame.
///
/// Implementations must pass when the landmarks they need are below
/// `min_visibility`: occlusion is never penalized.
pub trait FormCheck: Send + Sync {
    fn check(&self, frame: &LandmarkFrame, min_visibility: f32) -> CheckOutcome;
}

impl<F> FormCheck for F
where
    F: Fn(&LandmarkFrame, f32) -> CheckOutcome + Send + Sync,
{
    fn check(&self, frame: &LandmarkFrame, min_visibility: f32) -> CheckOutcome {
        self(frame, min_visibility)
    }
}

#[derive(Clone)]
pub struct FormCheckpoint {
    pub body_part: BodyPart,
    pub message: String,
    pub suggestion: String,
    check: Arc<dyn FormCheck>,
}

impl FormCheckpoint {
    pub fn new(
        body_part: BodyPart,
        message: impl Into<String>,
        suggestion: impl Into<String>,
        check: impl FormCheck + 'static,
    ) -> Self {
        Self {
            body_part,
            message: message.into(),
            suggestion: suggestion.into(),
            check: Arc::new(check),
        }
    }

    pub fn evaluate(&self, frame: &LandmarkFrame, min_visibility: f32) -> CheckOutcome {
        self.check.check(frame, min_visibility)
    }
}

impl fmt::Debug for FormCheckpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormCheckpoint")
            .field("body_part", &self.body_part)
            .field("message", &self.message)
            .field("suggestion", &self.suggestion)
            .finish_non_exhaustive()
    }
}

/// Phases an angle requirement is enforced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseScope {
    All,
    Bottom,
    Top,
}

impl PhaseScope {
    pub fn applies_to(self, phase: MovementPhase) -> bool {
        match self {
            PhaseScope::All => true,
            PhaseScope::Bottom => phase == MovementPhase::Bottom,
            PhaseScope::Top => phase == MovementPhase::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleRequirement {
    pub joint: Joint,
    pub min_angle: f32,
    pub max_angle: f32,
    pub phase: PhaseScope,
}

impl AngleRequirement {
    pub const fn new(joint: Joint, min_angle: f32, max_angle: f32, phase: PhaseScope) -> Self {
        Self {
            joint,
            min_angle,
            max_angle,
            phase,
        }
    }

    pub fn contains(&self, angle: f32) -> bool {
        (self.min_angle..=self.max_angle).contains(&angle)
    }
}

#[derive(Debug, Clone)]
pub struct ExerciseForm {
    /// Canonical registry key.
    pub name: String,
    pub display_name: String,
    pub angles: Vec<AngleRequirement>,
    pub checkpoints: Vec<FormCheckpoint>,
    pub phase_thresholds: PhaseThresholds,
    /// Joints whose first measurable angle drives the phase state machine.
    pub depth_joints: Vec<Joint>,
}

impl ExerciseForm {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            angles: Vec::new(),
            checkpoints: Vec::new(),
            phase_thresholds: PhaseThresholds::default(),
            depth_joints: vec![Joint::LeftKnee, Joint::RightKnee],
        }
    }

    pub fn with_angle(mut self, requirement: AngleRequirement) -> Self {
        self.angles.push(requirement);
        self
    }

    pub fn with_checkpoint(mut self, checkpoint: FormCheckpoint) -> Self {
        self.checkpoints.push(checkpoint);
        self
    }

    pub fn with_phase_thresholds(mut self, thresholds: PhaseThresholds) -> Self {
        self.phase_thresholds = thresholds;
        self
    }

    pub fn with_depth_joints(mut self, joints: impl IntoIterator<Item = Joint>) -> Self {
        self.depth_joints = joints.into_iter().collect();
        self
    }
}
