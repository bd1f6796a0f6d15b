use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// Number of body landmarks in one frame.
pub const LANDMARK_COUNT: usize = 33;

/// A single tracked body point in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, z: None, visibility }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Stable slot indices of the 33-point body landmark layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const ALL: [LandmarkIndex; LANDMARK_COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }
}

/// One full frame of landmarks, one slot per [`LandmarkIndex`].
///
/// The fixed shape is enforced on construction, so everything downstream
/// indexes without bounds checks failing.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Validates the landmark count and copies the slice into a frame.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, FrameError> {
        let points: [Landmark; LANDMARK_COUNT] =
            points.try_into().map_err(|_| FrameError::LandmarkCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            })?;
        Ok(Self { points })
    }

    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.points[index.index()]
    }

    pub fn set(&mut self, index: LandmarkIndex, landmark: Landmark) {
        self.points[index.index()] = landmark;
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }
}

impl Default for LandmarkFrame {
    fn default() -> Self {
        Self {
            points: [Landmark::default(); LANDMARK_COUNT],
        }
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkFrame {
    type Error = FrameError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::from_slice(&points)
    }
}

impl std::ops::Index<LandmarkIndex> for LandmarkFrame {
    type Output = Landmark;

    fn index(&self, index: LandmarkIndex) -> &Landmark {
        self.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_slot_order() {
        for (slot, index) in LandmarkIndex::ALL.iter().enumerate() {
            assert_eq!(index.index(), slot);
        }
        assert_eq!(LandmarkIndex::LeftHip.index(), 23);
        assert_eq!(LandmarkIndex::RightKnee.name(), "right_knee");
    }

    #[test]
    fn wrong_landmark_count_is_rejected() {
        let short = vec![Landmark::new(0.5, 0.5, 1.0); 17];
        let err = LandmarkFrame::try_from(short).unwrap_err();
        assert_eq!(
            err,
            FrameError::LandmarkCount {
                expected: LANDMARK_COUNT,
                actual: 17
            }
        );
    }

    #[test]
    fn full_frame_is_accepted() {
        let mut points = vec![Landmark::new(0.5, 0.5, 1.0); LANDMARK_COUNT];
        points[LandmarkIndex::LeftKnee.index()] = Landmark::new(0.4, 0.7, 0.9);
        let frame = LandmarkFrame::try_from(points).unwrap();
        assert_eq!(frame[LandmarkIndex::LeftKnee].x, 0.4);
    }

    #[test]
    fn z_is_optional_on_input() {
        let lm: Landmark = serde_json::from_str(r#"{"x":0.1,"y":0.2,"visibility":0.9}"#).unwrap();
        assert_eq!(lm.z, None);
        let lm: Landmark =
            serde_json::from_str(r#"{"x":0.1,"y":0.2,"z":-0.3,"visibility":0.9}"#).unwrap();
        assert_eq!(lm.z, Some(-0.3));
    }
}
