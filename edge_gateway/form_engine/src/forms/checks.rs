//! Reusable geometric rules behind the built-in checkpoints.

use crate::geometry::is_visible;
use crate::landmarks::{LandmarkFrame, LandmarkIndex};

use super::{CheckOutcome, Direction, FormCheck, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Fails when, on any visible side, two landmarks drift apart along `axis`
/// by more than `max_offset`.
///
/// Typical uses: knee over ankle, shoulder over hip, heel against toe.
#[derive(Debug, Clone)]
pub struct SegmentOffset {
    pub axis: Axis,
    /// One `(a, b)` landmark pair per body side.
    pub pairs: Vec<(LandmarkIndex, LandmarkIndex)>,
    pub max_offset: f32,
    pub severity: Severity,
    pub direction: Option<Direction>,
}

impl SegmentOffset {
    pub fn horizontal(
        pairs: impl IntoIterator<Item = (LandmarkIndex, LandmarkIndex)>,
        max_offset: f32,
        severity: Severity,
        direction: Option<Direction>,
    ) -> Self {
        Self {
            axis: Axis::Horizontal,
            pairs: pairs.into_iter().collect(),
            max_offset,
            severity,
            direction,
        }
    }

    pub fn vertical(
        pairs: impl IntoIterator<Item = (LandmarkIndex, LandmarkIndex)>,
        max_offset: f32,
        severity: Severity,
        direction: Option<Direction>,
    ) -> Self {
        Self {
            axis: Axis::Vertical,
            ..Self::horizontal(pairs, max_offset, severity, direction)
        }
    }
}

/// True when both landmarks are visible and lie more than `max_offset` apart
/// along `axis`.
fn pair_exceeds(
    frame: &LandmarkFrame,
    (a, b): (LandmarkIndex, LandmarkIndex),
    axis: Axis,
    max_offset: f32,
    min_visibility: f32,
) -> bool {
    let (a, b) = (frame.get(a), frame.get(b));
    if !is_visible(Some(a), min_visibility) || !is_visible(Some(b), min_visibility) {
        return false;
    }
    let offset = match axis {
        Axis::Horizontal => (a.x - b.x).abs(),
        Axis::Vertical => (a.y - b.y).abs(),
    };
    offset > max_offset
}

impl FormCheck for SegmentOffset {
    fn check(&self, frame: &LandmarkFrame, min_visibility: f32) -> CheckOutcome {
        let exceeded = self
            .pairs
            .iter()
            .any(|&pair| pair_exceeds(frame, pair, self.axis, self.max_offset, min_visibility));

        if exceeded {
            CheckOutcome::fail(self.severity, self.direction)
        } else {
            CheckOutcome::pass()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Horizontal nose-to-hip distance below which the body counts as facing
/// the camera.
pub const MIN_FACING_OFFSET: f32 = 0.03;

/// Side of the forward leg in a side view.
///
/// The nose against the hip midpoint gives the facing direction, and the
/// front leg is the one whose ankle lies further that way. `None` when the
/// body faces the camera or the needed landmarks are occluded.
pub fn front_side(frame: &LandmarkFrame, min_visibility: f32) -> Option<Side> {
    let visible = |index: LandmarkIndex| {
        let landmark = frame.get(index);
        is_visible(Some(landmark), min_visibility).then_some(landmark)
    };

    let nose = visible(LandmarkIndex::Nose)?;
    let hips: Vec<f32> = [LandmarkIndex::LeftHip, LandmarkIndex::RightHip]
        .into_iter()
        .filter_map(visible)
        .map(|hip| hip.x)
        .collect();
    if hips.is_empty() {
        return None;
    }
    let facing = nose.x - hips.iter().sum::<f32>() / hips.len() as f32;
    if facing.abs() < MIN_FACING_OFFSET {
        return None;
    }

    let left = visible(LandmarkIndex::LeftAnkle)?;
    let right = visible(LandmarkIndex::RightAnkle)?;
    if (left.x - right.x) * facing.signum() >= 0.0 {
        Some(Side::Left)
    } else {
        Some(Side::Right)
    }
}

/// [`SegmentOffset`] applied to the forward leg only.
///
/// Split-stance exercises load the legs differently: the back knee travels
/// ahead of its ankle and the back heel rises in a correct lunge. Passes
/// when the forward leg cannot be told apart.
#[derive(Debug, Clone)]
pub struct FrontLeg {
    pub axis: Axis,
    /// `(a, b)` landmark pairs of the left and the right leg.
    pub legs: [(LandmarkIndex, LandmarkIndex); 2],
    pub max_offset: f32,
    pub severity: Severity,
    pub direction: Option<Direction>,
}

impl FrontLeg {
    pub fn horizontal(
        legs: [(LandmarkIndex, LandmarkIndex); 2],
        max_offset: f32,
        severity: Severity,
        direction: Option<Direction>,
    ) -> Self {
        Self {
            axis: Axis::Horizontal,
            legs,
            max_offset,
            severity,
            direction,
        }
    }

    pub fn vertical(
        legs: [(LandmarkIndex, LandmarkIndex); 2],
        max_offset: f32,
        severity: Severity,
        direction: Option<Direction>,
    ) -> Self {
        Self {
            axis: Axis::Vertical,
            ..Self::horizontal(legs, max_offset, severity, direction)
        }
    }
}

impl FormCheck for FrontLeg {
    fn check(&self, frame: &LandmarkFrame, min_visibility: f32) -> CheckOutcome {
        let pair = match front_side(frame, min_visibility) {
            Some(Side::Left) => self.legs[0],
            Some(Side::Right) => self.legs[1],
            None => return CheckOutcome::pass(),
        };

        if pair_exceeds(frame, pair, self.axis, self.max_offset, min_visibility) {
            CheckOutcome::fail(self.severity, self.direction)
        } else {
            CheckOutcome::pass()
        }
    }
}

/// Fails when a left/right landmark pair is tilted: their vertical positions
/// differ by more than `max_tilt`.
///
/// The hint points at the higher side (image `y` grows downward).
#[derive(Debug, Clone)]
pub struct LevelPair {
    pub left: LandmarkIndex,
    pub right: LandmarkIndex,
    pub max_tilt: f32,
    pub severity: Severity,
}

impl LevelPair {
    pub fn new(
        left: LandmarkIndex,
        right: LandmarkIndex,
        max_tilt: f32,
        severity: Severity,
    ) -> Self {
        Self {
            left,
            right,
            max_tilt,
            severity,
        }
    }
}

impl FormCheck for LevelPair {
    fn check(&self, frame: &LandmarkFrame, min_visibility: f32) -> CheckOutcome {
        let (left, right) = (frame.get(self.left), frame.get(self.right));
        if !is_visible(Some(left), min_visibility) || !is_visible(Some(right), min_visibility) {
            return CheckOutcome::pass();
        }

        if (left.y - right.y).abs() <= self.max_tilt {
            return CheckOutcome::pass();
        }

        let higher = if left.y < right.y { Direction::Left } else { Direction::Right };
        CheckOutcome::fail(self.severity, Some(higher))
    }
}
