use std::path::Path;

use log::{debug, trace};
use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::error::EngineError;
use crate::features::{extract_joint_angles, Joint, JointAngle};
use crate::forms::{BodyPart, Direction, ExerciseForm, FormRegistry, Severity};
use crate::landmarks::{Landmark, LandmarkFrame};
use crate::phase::{self, MovementPhase, PhaseState};

pub const SUCCESS_ID: &str = "success";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Success,
    Warning,
    Error,
    Info,
}

impl From<Severity> for FeedbackKind {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Warning => FeedbackKind::Warning,
            Severity::Error => FeedbackKind::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFeedback {
    /// `checkpoint-<index>` or `success`; stable within one analysis.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub body_part: BodyPart,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl FormFeedback {
    fn success() -> Self {
        Self {
            id: SUCCESS_ID.to_string(),
            kind: FeedbackKind::Success,
            body_part: BodyPart::Core,
            message: "Great form, keep it up!".to_string(),
            suggestion: None,
            direction: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseAnalysisResult {
    pub angles: Vec<JointAngle>,
    /// Quality score in [0, 100].
    pub score: u8,
    /// Never empty.
    pub feedbacks: Vec<FormFeedback>,
    pub phase: MovementPhase,
    /// Lowest depth angle reached so far while at the bottom.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_angle: Option<f32>,
    pub rep_completed: bool,
}

impl PoseAnalysisResult {
    /// Phase state to pass in with the next frame.
    pub fn state(&self) -> PhaseState {
        PhaseState {
            phase: self.phase,
            bottom_angle: self.bottom_angle,
        }
    }

    pub fn angle(&self, joint: Joint) -> Option<f32> {
        self.angles.iter().find(|a| a.joint == joint).map(|a| a.angle)
    }

    pub fn has_errors(&self) -> bool {
        self.feedbacks.iter().any(|f| f.kind == FeedbackKind::Error)
    }
}

/// Per-frame form analysis.
///
/// Holds only configuration: the rep phase is passed in and handed back on
/// every call, so the same analyzer can serve any number of sessions.
#[derive(Debug, Clone, Default)]
pub struct PoseAnalyzer {
    config: AnalyzerConfig,
}

impl PoseAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Builds an analyzer from a TOML config file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        Ok(Self::with_config(AnalyzerConfig::load(path)?))
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes one frame against `form`. Never fails: occluded landmarks
    /// drop angles and pass checkpoints instead.
    ///
    /// `previous` is the state returned for the last frame, either a bare
    /// [`MovementPhase`] or the full [`PoseAnalysisResult::state`].
    pub fn analyze(
        &self,
        frame: &LandmarkFrame,
        form: &ExerciseForm,
        previous: impl Into<PhaseState>,
    ) -> PoseAnalysisResult {
        let previous = previous.into();
        let min_visibility = self.config.visibility_threshold;
        let angles = extract_joint_angles(frame, min_visibility);

        let mut score: i64 = 100;
        let mut feedbacks = Vec::new();

        for (index, checkpoint) in form.checkpoints.iter().enumerate() {
            let outcome = checkpoint.evaluate(frame, min_visibility);
            if outcome.passed {
                continue;
            }
            // A failing check without a severity is treated as a warning.
            let severity = outcome.severity.unwrap_or(Severity::Warning);
            score -= i64::from(match severity {
                Severity::Error => self.config.error_penalty,
                Severity::Warning => self.config.warning_penalty,
            });
            debug!(
                target: "form_engine::pose",
                "{}: checkpoint {} ({:?}) failed: {}",
                form.name,
                index,
                checkpoint.body_part,
                checkpoint.message
            );
            feedbacks.push(FormFeedback {
                id: format!("checkpoint-{index}"),
                kind: severity.into(),
                body_part: checkpoint.body_part,
                message: checkpoint.message.clone(),
                suggestion: Some(checkpoint.suggestion.clone()),
                direction: outcome.direction,
            });
        }

        let depth_angle = form
            .depth_joints
            .iter()
            .find_map(|&joint| angles.iter().find(|a| a.joint == joint).map(|a| a.angle));
        let step = phase::advance(previous, depth_angle, &form.phase_thresholds);

        // Out-of-range angles cost score but produce no feedback item.
        for requirement in form.angles.iter().filter(|r| r.phase.applies_to(step.phase)) {
            if let Some(measured) = angles.iter().find(|a| a.joint == requirement.joint) {
                if !requirement.contains(measured.angle) {
                    score -= i64::from(self.config.angle_penalty);
                }
            }
        }

        let score = score.clamp(0, 100) as u8;

        if step.phase != previous.phase {
            debug!(
                target: "form_engine::pose",
                "{}: phase {} -> {}",
                form.name,
                previous.phase,
                step.phase
            );
        }
        if step.rep_completed {
            debug!(target: "form_engine::pose", "{}: repetition completed", form.name);
        }

        if feedbacks.is_empty() {
            feedbacks.push(FormFeedback::success());
        }

        trace!(
            target: "form_engine::pose",
            "{}: {} angles, score {}, phase {}",
            form.name,
            angles.len(),
            score,
            step.phase
        );

        PoseAnalysisResult {
            angles,
            score,
            feedbacks,
            phase: step.phase,
            bottom_angle: step.bottom_angle,
            rep_completed: step.rep_completed,
        }
    }

    /// Validates raw landmarks, resolves `exercise` and analyzes the frame.
    pub fn analyze_named(
        &self,
        registry: &FormRegistry,
        exercise: &str,
        landmarks: &[Landmark],
        previous: impl Into<PhaseState>,
    ) -> Result<PoseAnalysisResult, EngineError> {
        let frame = LandmarkFrame::from_slice(landmarks)?;
        let form = registry.lookup(exercise)?;
        Ok(self.analyze(&frame, form, previous))
    }

    /// Runs a recorded sequence, threading the phase state from frame to frame.
    pub fn analyze_sequence(
        &self,
        frames: &[LandmarkFrame],
        form: &ExerciseForm,
        start: impl Into<PhaseState>,
    ) -> Vec<PoseAnalysisResult> {
        let mut state = start.into();
        frames
            .iter()
            .map(|frame| {
                let result = self.analyze(frame, form, state);
                state = result.state();
                result
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::forms::catalog;
    use crate::forms::{CheckOutcome, FormCheckpoint, AngleRequirement, PhaseScope};
    use crate::landmarks::LandmarkIndex as L;

    fn standing() -> LandmarkFrame {
        let mut frame = LandmarkFrame::default();
        for (index, x, y) in [
            (L::Nose, 0.5, 0.1),
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
        ] {
            frame.set(index, Landmark::new(x, y, 0.9));
        }
        frame
    }

    fn always_failing(severity: Severity) -> FormCheckpoint {
        FormCheckpoint::new(BodyPart::Core, "fail", "fix it", move |_: &LandmarkFrame, _: f32| {
            CheckOutcome::fail(severity, None)
        })
    }

    #[test]
    fn clean_frame_yields_success() {
        let result =
            PoseAnalyzer::new().analyze(&standing(), &catalog::squat(), MovementPhase::Idle);
        assert_eq!(result.score, 100);
        assert_eq!(result.feedbacks.len(), 1);
        assert_eq!(result.feedbacks[0].id, SUCCESS_ID);
        assert_eq!(result.feedbacks[0].kind, FeedbackKind::Success);
        assert_eq!(result.phase, MovementPhase::Idle);
        assert!(!result.rep_completed);
        assert_eq!(result.angles.len(), 8);
    }

    #[test]
    fn failed_checkpoints_are_numbered_by_definition_index() {
        let mut frame = standing();
        frame.set(L::LeftKnee, Landmark::new(0.60, 0.75, 0.9));
        frame.set(L::LeftShoulder, Landmark::new(0.65, 0.3, 0.9));
        let result = PoseAnalyzer::new().analyze(&frame, &catalog::squat(), MovementPhase::Idle);
        let ids: Vec<&str> = result.feedbacks.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["checkpoint-0", "checkpoint-1"]);
        assert_eq!(result.feedbacks[0].kind, FeedbackKind::Warning);
        assert_eq!(result.feedbacks[1].kind, FeedbackKind::Error);
        assert_eq!(result.feedbacks[1].direction, Some(Direction::Up));
        assert!(result.has_errors());
        assert_eq!(result.score, 100 - 8 - 15);
    }

    #[test]
    fn score_floors_at_zero() {
        let mut form = ExerciseForm::new("gauntlet", "Gauntlet");
        for _ in 0..10 {
            form = form.with_checkpoint(always_failing(Severity::Error));
        }
        let result = PoseAnalyzer::new().analyze(&standing(), &form, MovementPhase::Idle);
        assert_eq!(result.score, 0);
        assert_eq!(result.feedbacks.len(), 10);
    }

    #[test]
    fn angle_violations_cost_score_silently() {
        let form = ExerciseForm::new("stiff", "Stiff")
            .with_angle(AngleRequirement::new(Joint::LeftElbow, 30.0, 90.0, PhaseScope::All))
            .with_angle(AngleRequirement::new(Joint::LeftKnee, 30.0, 90.0, PhaseScope::Bottom));
        let result = PoseAnalyzer::new().analyze(&standing(), &form, MovementPhase::Idle);
        // Only the all-phase requirement applies while idle.
        assert_eq!(result.score, 95);
        assert_eq!(result.feedbacks.len(), 1);
        assert_eq!(result.feedbacks[0].kind, FeedbackKind::Success);
    }

    #[test]
    fn occluded_requirement_is_skipped() {
        let form = ExerciseForm::new("stiff", "Stiff")
            .with_angle(AngleRequirement::new(Joint::LeftElbow, 30.0, 90.0, PhaseScope::All));
        let mut frame = standing();
        frame.set(L::LeftWrist, Landmark::new(0.45, 0.6, 0.1));
        let result = PoseAnalyzer::new().analyze(&frame, &form, MovementPhase::Idle);
        assert_eq!(result.score, 100);
        assert_eq!(result.angle(Joint::LeftElbow), None);
    }

    #[test]
    fn custom_penalties_apply() {
        let analyzer = PoseAnalyzer::with_config(AnalyzerConfig {
            warning_penalty: 20,
            ..AnalyzerConfig::default()
        });
        let form = ExerciseForm::new("w", "W").with_checkpoint(always_failing(Severity::Warning));
        assert_eq!(analyzer.analyze(&standing(), &form, MovementPhase::Idle).score, 80);
    }

    #[test]
    fn analyze_named_validates_input() {
        let analyzer = PoseAnalyzer::new();
        let registry = FormRegistry::with_builtin();
        let points = standing().points().to_vec();

        let ok = analyzer.analyze_named(&registry, "Squat", &points, MovementPhase::Idle);
        assert_eq!(ok.unwrap().score, 100);

        let err = analyzer.analyze_named(&registry, "squat", &points[..10], MovementPhase::Idle);
        assert!(matches!(err, Err(EngineError::Frame(_))));

        let err = analyzer.analyze_named(&registry, "trampoline", &points, MovementPhase::Idle);
        assert!(matches!(err, Err(EngineError::Registry(_))));
    }

    #[test]
    fn config_file_errors_surface_as_engine_errors() {
        let err = PoseAnalyzer::from_config_file("/nonexistent/form_engine.toml").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.to_string().contains("/nonexistent/form_engine.toml"));

        let path = std::env::temp_dir()
            .join(format!("form_engine_analyzer_{}.toml", std::process::id()));
        std::fs::write(&path, "visibility_threshold = 2.0\n").unwrap();
        let invalid = PoseAnalyzer::from_config_file(&path);
        std::fs::write(&path, "warning_penalty = 12\n").unwrap();
        let loaded = PoseAnalyzer::from_config_file(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(invalid, Err(EngineError::Config(ConfigError::Invalid(_)))));
        assert_eq!(loaded.unwrap().config().warning_penalty, 12);
    }

    #[test]
    fn bottom_low_point_is_handed_back() {
        let squat = catalog::squat();
        let analyzer = PoseAnalyzer::new();
        let at_bottom = PhaseState {
            phase: MovementPhase::Bottom,
            bottom_angle: Some(40.0),
        };

        // Standing straight is far above the low point.
        let result = analyzer.analyze(&standing(), &squat, at_bottom);
        assert_eq!(result.phase, MovementPhase::Ascending);
        assert_eq!(result.bottom_angle, None);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("bottomAngle").is_none());
    }
}
