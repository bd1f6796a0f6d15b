use serde::{Deserialize, Serialize};

use crate::geometry::{angle_between, is_visible};
use crate::landmarks::{LandmarkFrame, LandmarkIndex as L};

/// Named joints whose angle the extractor can measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Joint {
    LeftElbow,
    RightElbow,
    LeftKnee,
    RightKnee,
    LeftHip,
    RightHip,
    LeftShoulder,
    RightShoulder,
}

impl Joint {
    /// Extraction order of the joints.
    pub const ALL: [Joint; 8] = [
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftShoulder,
        Joint::RightShoulder,
    ];

    /// Landmark triple `(a, vertex, c)` the angle is measured over.
    pub fn landmarks(self) -> (L, L, L) {
        match self {
            Joint::LeftElbow => (L::LeftShoulder, L::LeftElbow, L::LeftWrist),
            Joint::RightElbow => (L::RightShoulder, L::RightElbow, L::RightWrist),
            Joint::LeftKnee => (L::LeftHip, L::LeftKnee, L::LeftAnkle),
            Joint::RightKnee => (L::RightHip, L::RightKnee, L::RightAnkle),
            Joint::LeftHip => (L::LeftShoulder, L::LeftHip, L::LeftKnee),
            Joint::RightHip => (L::RightShoulder, L::RightHip, L::RightKnee),
            Joint::LeftShoulder => (L::LeftHip, L::LeftShoulder, L::LeftElbow),
            Joint::RightShoulder => (L::RightHip, L::RightShoulder, L::RightElbow),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Joint::LeftElbow => "leftElbow",
            Joint::RightElbow => "rightElbow",
            Joint::LeftKnee => "leftKnee",
            Joint::RightKnee => "rightKnee",
            Joint::LeftHip => "leftHip",
            Joint::RightHip => "rightHip",
            Joint::LeftShoulder => "leftShoulder",
            Joint::RightShoulder => "rightShoulder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JointAngle {
    pub joint: Joint,
    /// Interior angle in degrees, [0, 180].
    pub angle: f32,
    pub is_valid: bool,
}

/// Measures one joint, or `None` when any of its three landmarks is occluded.
pub fn measure_joint(frame: &LandmarkFrame, joint: Joint, threshold: f32) -> Option<JointAngle> {
    let (a, b, c) = joint.landmarks();
    let (a, b, c) = (frame.get(a), frame.get(b), frame.get(c));

    if ![a, b, c].into_iter().all(|lm| is_visible(Some(lm), threshold)) {
        return None;
    }

    Some(JointAngle {
        joint,
        angle: angle_between(a, b, c),
        is_valid: true,
    })
}

/// Extracts every measurable joint angle in [`Joint::ALL`] order.
///
/// Occluded joints are omitted, never reported with `is_valid = false`, so
/// the output length varies from frame to frame.
pub fn extract_joint_angles(frame: &LandmarkFrame, threshold: f32) -> Vec<JointAngle> {
    Joint::ALL
        .iter()
        .filter_map(|&joint| measure_joint(frame, joint, threshold))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;
    use approx::assert_abs_diff_eq;

    fn upright_frame() -> LandmarkFrame {
        let mut frame = LandmarkFrame::default();
        let points = [
            (L::LeftShoulder, 0.45, 0.3),
            (L::RightShoulder, 0.55, 0.3),
            (L::LeftElbow, 0.45, 0.45),
            (L::RightElbow, 0.55, 0.45),
            (L::LeftWrist, 0.45, 0.6),
            (L::RightWrist, 0.55, 0.6),
            (L::LeftHip, 0.45, 0.6),
            (L::RightHip, 0.55, 0.6),
            (L::LeftKnee, 0.45, 0.75),
            (L::RightKnee, 0.55, 0.75),
            (L::LeftAnkle, 0.45, 0.9),
            (L::RightAnkle, 0.55, 0.9),
        ];
        for (index, x, y) in points {
            frame.set(index, Landmark::new(x, y, 0.95));
        }
        frame
    }

    #[test]
    fn extracts_all_joints_in_order() {
        let angles = extract_joint_angles(&upright_frame(), 0.5);
        let joints: Vec<Joint> = angles.iter().map(|a| a.joint).collect();
        assert_eq!(joints, Joint::ALL.to_vec());
        assert!(angles.iter().all(|a| a.is_valid));
    }

    #[test]
    fn straight_limbs_measure_180() {
        let angles = extract_joint_angles(&upright_frame(), 0.5);
        for joint in [Joint::LeftElbow, Joint::LeftKnee, Joint::RightHip] {
            let angle = angles.iter().find(|a| a.joint == joint).unwrap();
            assert_abs_diff_eq!(angle.angle, 180.0, epsilon = 1e-3);
        }
        // Arms hang along the torso.
        let shoulder = angles.iter().find(|a| a.joint == Joint::LeftShoulder).unwrap();
        assert_abs_diff_eq!(shoulder.angle, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn occluded_joints_are_omitted() {
        let mut frame = upright_frame();
        frame.set(L::LeftKnee, Landmark::new(0.45, 0.75, 0.2));
        let angles = extract_joint_angles(&frame, 0.5);
        let joints: Vec<Joint> = angles.iter().map(|a| a.joint).collect();
        // Left knee feeds both the left knee and left hip angles.
        assert_eq!(
            joints,
            vec![
                Joint::LeftElbow,
                Joint::RightElbow,
                Joint::RightKnee,
                Joint::RightHip,
                Joint::LeftShoulder,
                Joint::RightShoulder,
            ]
        );
    }

    #[test]
    fn nothing_visible_yields_empty() {
        assert!(extract_joint_angles(&LandmarkFrame::default(), 0.5).is_empty());
    }

    #[test]
    fn joint_names_are_camel_case() {
        assert_eq!(Joint::LeftKnee.name(), "leftKnee");
        let json = serde_json::to_string(&Joint::RightShoulder).unwrap();
        assert_eq!(json, "\"rightShoulder\"");
    }
}
