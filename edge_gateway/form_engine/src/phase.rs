use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParsePhaseError;

/// Repetition phase, driven by the exercise's depth angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementPhase {
    #[default]
    Idle,
    Descending,
    Bottom,
    Ascending,
}

impl MovementPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementPhase::Idle => "idle",
            MovementPhase::Descending => "descending",
            MovementPhase::Bottom => "bottom",
            MovementPhase::Ascending => "ascending",
        }
    }
}

impl fmt::Display for MovementPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementPhase {
    type Err = ParsePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(MovementPhase::Idle),
            "descending" => Ok(MovementPhase::Descending),
            "bottom" => Ok(MovementPhase::Bottom),
            "ascending" => Ok(MovementPhase::Ascending),
            _ => Err(ParsePhaseError(s.to_string())),
        }
    }
}

/// Phase carried between frames, with the lowest depth angle reached since
/// entering [`MovementPhase::Bottom`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseState {
    pub phase: MovementPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_angle: Option<f32>,
}

impl From<MovementPhase> for PhaseState {
    fn from(phase: MovementPhase) -> Self {
        Self {
            phase,
            bottom_angle: None,
        }
    }
}

/// Depth-angle thresholds (degrees) of the phase state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    /// Idle -> Descending once the angle drops below this.
    pub descend_below: f32,
    /// Descending -> Bottom once the angle drops below this.
    pub bottom_below: f32,
    /// Bottom -> Ascending once the angle climbs this far above the lowest
    /// angle reached at the bottom.
    pub rise_margin: f32,
    /// Ascending -> Idle (rep complete) once the angle rises above this.
    pub stand_above: f32,
}

impl PhaseThresholds {
    pub const fn new(
        descend_below: f32,
        bottom_below: f32,
        rise_margin: f32,
        stand_above: f32,
    ) -> Self {
        Self {
            descend_below,
            bottom_below,
            rise_margin,
            stand_above,
        }
    }

    /// Angle the depth joint must exceed to leave the bottom. Without a
    /// recorded low point the bottom entry threshold is used.
    fn bottom_exit(&self, lowest: Option<f32>) -> f32 {
        lowest.map_or(self.bottom_below, |low| low + self.rise_margin)
    }
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self::new(160.0, 100.0, 10.0, 160.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseStep {
    pub phase: MovementPhase,
    /// Lowest depth angle so far while in `Bottom`, `None` in other phases.
    pub bottom_angle: Option<f32>,
    pub rep_completed: bool,
}

impl PhaseStep {
    /// State to pass into the next frame.
    pub fn state(&self) -> PhaseState {
        PhaseState {
            phase: self.phase,
            bottom_angle: self.bottom_angle,
        }
    }
}

/// Advances the phase by one frame.
///
/// With no depth angle this frame the state carries over unchanged. The
/// bottom is left only on a real rise, so a slow descent keeps deepening the
/// recorded low point instead of flipping to `Ascending`.
pub fn advance(
    previous: impl Into<PhaseState>,
    depth_angle: Option<f32>,
    thresholds: &PhaseThresholds,
) -> PhaseStep {
    let previous = previous.into();
    let Some(angle) = depth_angle else {
        return PhaseStep {
            phase: previous.phase,
            bottom_angle: previous.bottom_angle,
            rep_completed: false,
        };
    };

    let mut rep_completed = false;
    let mut bottom_angle = None;
    let phase = match previous.phase {
        MovementPhase::Idle => {
            if angle < thresholds.descend_below {
                MovementPhase::Descending
            } else {
                MovementPhase::Idle
            }
        }
        MovementPhase::Descending => {
            if angle < thresholds.bottom_below {
                bottom_angle = Some(angle);
                MovementPhase::Bottom
            } else {
                MovementPhase::Descending
            }
        }
        MovementPhase::Bottom => {
            if angle > thresholds.bottom_exit(previous.bottom_angle) {
                MovementPhase::Ascending
            } else {
                bottom_angle = Some(previous.bottom_angle.map_or(angle, |low| low.min(angle)));
                MovementPhase::Bottom
            }
        }
        MovementPhase::Ascending => {
            if angle > thresholds.stand_above {
                rep_completed = true;
                MovementPhase::Idle
            } else {
                MovementPhase::Ascending
            }
        }
    };

    PhaseStep {
        phase,
        bottom_angle,
        rep_completed,
    }
}
