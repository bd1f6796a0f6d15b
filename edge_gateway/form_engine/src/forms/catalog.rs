//! Built-in exercise definitions.

use crate::features::Joint;
use crate::landmarks::LandmarkIndex as L;
use crate::phase::PhaseThresholds;

use super::checks::{FrontLeg, LevelPair, SegmentOffset};
use super::{
    AngleRequirement, BodyPart, Direction, ExerciseForm, FormCheckpoint, PhaseScope, Severity,
};

const KNEES: [(L, L); 2] = [(L::LeftKnee, L::LeftAnkle), (L::RightKnee, L::RightAnkle)];
const TORSO: [(L, L); 2] = [(L::LeftShoulder, L::LeftHip), (L::RightShoulder, L::RightHip)];
const ARMS: [(L, L); 2] = [(L::LeftWrist, L::LeftShoulder), (L::RightWrist, L::RightShoulder)];
const HEELS: [(L, L); 2] = [(L::LeftHeel, L::LeftFootIndex), (L::RightHeel, L::RightFootIndex)];

pub fn builtin_forms() -> Vec<ExerciseForm> {
    vec![squat(), deadlift(), lunge()]
}

pub fn squat() -> ExerciseForm {
    ExerciseForm::new("squat", "Squat")
        .with_angle(AngleRequirement::new(Joint::LeftKnee, 70.0, 100.0, PhaseScope::Bottom))
        .with_angle(AngleRequirement::new(Joint::RightKnee, 70.0, 100.0, PhaseScope::Bottom))
        .with_angle(AngleRequirement::new(Joint::LeftHip, 60.0, 110.0, PhaseScope::Bottom))
        .with_angle(AngleRequirement::new(Joint::RightHip, 60.0, 110.0, PhaseScope::Bottom))
        .with_checkpoint(FormCheckpoint::new(
            BodyPart::Knees,
            "Knees are drifting past your toes",
            "Sit your hips back and keep your knees stacked over your ankles",
            SegmentOffset::horizontal(KNEES, 0.1, Severity::Warning, Some(Direction::Down)),
        ))
        .with_checkpoint(FormCheckpoint::new(
            BodyPart::Back,
            "You're folding forward",
            "Lift your chest and keep your back straight",
            SegmentOffset::horizontal(TORSO, 0.15, Severity::Error, Some(Direction::Up)),
        ))
        .with_checkpoint(FormCheckpoint::new(
            BodyPart::Hips,
            "Your hips are uneven",
            "Spread your weight evenly across both feet",
            LevelPair::new(L::LeftHip, L::RightHip, 0.05, Severity::Warning),
        ))
}

/// The hip hinge is tracked through the hip angle rather than the knees,
/// which barely bend in a deadlift.
pub fn deadlift() -> ExerciseForm {
    ExerciseForm::new("deadlift", "Deadlift")
        .with_depth_joints([Joint::LeftHip, Joint::RightHip])
        .with_phase_thresholds(PhaseThresholds::new(160.0, 110.0, 10.0, 165.0))
        .with_angle(AngleRequirement::new(Joint::LeftHip, 45.0, 100.0, PhaseScope::Bottom))
        .with_angle(AngleRequirement::new(Joint::RightHip, 45.0, 100.0, PhaseScope::Bottom))
        .with_angle(AngleRequirement::new(Joint::LeftKnee, 110.0, 165.0, PhaseScope::Bottom))
        .with_angle(AngleRequirement::new(Joint::RightKnee, 110.0, 165.0, PhaseScope::Bottom))
        .with_angle(AngleRequirement::new(Joint::LeftElbow, 160.0, 180.0, PhaseScope::All))
        .with_angle(AngleRequirement::new(Joint::RightElbow, 160.0, 180.0, PhaseScope::All))
        .with_checkpoint(FormCheckpoint::new(
            BodyPart::Back,
            "Your back is rounding",
            "Brace your core and keep a neutral spine through the pull",
            SegmentOffset::horizontal(TORSO, 0.3, Severity::Error, Some(Direction::Up)),
        ))
        .with_checkpoint(FormCheckpoint::new(
            BodyPart::Arms,
            "The bar is drifting away from your body",
            "Keep your arms hanging straight under your shoulders",
            SegmentOffset::horizontal(ARMS, 0.12, Severity::Warning, None),
        ))
        .with_checkpoint(FormCheckpoint::new(
            BodyPart::Knees,
            "Knees are pushing too far forward",
            "Hinge at the hips and keep your shins close to vertical",
            SegmentOffset::horizontal(KNEES, 0.08, Severity::Warning, Some(Direction::Up)),
        ))
        .with_checkpoint(FormCheckpoint::new(
            BodyPart::Shoulders,
            "Your shoulders are uneven",
            "Grip the bar evenly and pull with both arms",
            LevelPair::new(L::LeftShoulder, L::RightShoulder, 0.05, Severity::Warning),
        ))
}

/// Knee and heel rules look at the forward leg only; the back knee passing
/// its ankle and the back heel rising are part of a correct lunge.
pub fn lunge() -> ExerciseForm {
    ExerciseForm::new("lunge", "Lunge")
        .with_angle(AngleRequirement::new(Joint::LeftKnee, 80.0, 110.0, PhaseScope::Bottom))
        .with_angle(AngleRequirement::new(Joint::RightKnee, 80.0, 110.0, PhaseScope::Bottom))
        .with_checkpoint(FormCheckpoint::new(
            BodyPart::Knees,
            "Front knee is past your toes",
            "Take a longer step so your knee stays over your ankle",
            FrontLeg::horizontal(KNEES, 0.12, Severity::Warning, Some(Direction::Down)),
        ))
        .with_checkpoint(FormCheckpoint::new(
            BodyPart::Back,
            "Your torso is leaning",
            "Keep your torso upright with your shoulders over your hips",
            SegmentOffset::horizontal(TORSO, 0.1, Severity::Error, Some(Direction::Up)),
        ))
        .with_checkpoint(FormCheckpoint::new(
            BodyPart::Hips,
            "Your hips are twisting",
            "Square your hips to the front",
            LevelPair::new(L::LeftHip, L::RightHip, 0.07, Severity::Warning),
        ))
        .with_checkpoint(FormCheckpoint::new(
            BodyPart::Feet,
            "Your front heel is lifting",
            "Drive through the heel of your front foot",
            FrontLeg::vertical(HEELS, 0.06, Severity::Warning, Some(Direction::Down)),
        ))
}
