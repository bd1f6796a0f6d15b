//! Real-time exercise form analysis.
//!
//! Feed one [`LandmarkFrame`] at a time from an external pose estimator,
//! together with the exercise's [`ExerciseForm`] and the [`PhaseState`]
//! returned for the previous frame. [`PoseAnalyzer::analyze`] measures joint angles,
//! runs the exercise's checkpoints, advances the repetition phase and scores
//! the frame.

pub mod config;
pub mod error;
pub mod features;
pub mod forms;
pub mod geometry;
pub mod landmarks;
pub mod phase;
pub mod pose;

pub use config::AnalyzerConfig;
pub use error::{ConfigError, EngineError, FrameError, ParsePhaseError, RegistryError};
pub use features::{extract_joint_angles, Joint, JointAngle};
pub use forms::{
    builtin_registry, AngleRequirement, BodyPart, CheckOutcome, Direction, ExerciseForm, FormCheck,
    FormCheckpoint, FormRegistry, PhaseScope, Severity,
};
pub use geometry::{angle_between, distance, is_visible};
pub use landmarks::{Landmark, LandmarkFrame, LandmarkIndex, LANDMARK_COUNT};
pub use phase::{MovementPhase, PhaseState, PhaseStep, PhaseThresholds};
pub use pose::{FeedbackKind, FormFeedback, PoseAnalysisResult, PoseAnalyzer};

#[cfg(feature = "python")]
mod python {
    use pyo3::exceptions::{PyKeyError, PyValueError};
    use pyo3::prelude::*;
    use pyo3::types::PyList;

    use crate::{EngineError, FormRegistry, Landmark, MovementPhase, PhaseState, PoseAnalyzer};

    fn to_py_err(err: EngineError) -> PyErr {
        match err {
            EngineError::Registry(_) => PyKeyError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }

    /// Python entry point. Holds the built-in forms and scoring config only;
    /// the caller keeps the phase between frames.
    #[pyclass]
    pub struct FormEngine {
        registry: FormRegistry,
        analyzer: PoseAnalyzer,
    }

    #[pymethods]
    impl FormEngine {
        #[new]
        #[pyo3(signature = (config_path=None))]
        pub fn new(config_path: Option<&str>) -> PyResult<Self> {
            let analyzer = match config_path {
                Some(path) => PoseAnalyzer::from_config_file(path).map_err(to_py_err)?,
                None => PoseAnalyzer::new(),
            };

            Ok(FormEngine {
                registry: FormRegistry::with_builtin(),
                analyzer,
            })
        }

        /// `bottom_angle` is the `bottomAngle` of the previous result, if any.
        #[pyo3(signature = (exercise, landmarks, previous_phase="idle", bottom_angle=None))]
        pub fn analyze(
            &self,
            py: Python<'_>,
            exercise: &str,
            landmarks: &Bound<'_, PyList>,
            previous_phase: &str,
            bottom_angle: Option<f32>,
        ) -> PyResult<PyObject> {
            let points: Vec<Landmark> = pythonize::depythonize_bound(landmarks.clone().into_any())
                .map_err(|e| PyValueError::new_err(format!("invalid landmarks: {}", e)))?;
            let phase: MovementPhase = previous_phase
                .parse()
                .map_err(|e| to_py_err(EngineError::Phase(e)))?;
            let previous = PhaseState {
                phase,
                bottom_angle,
            };

            let result = self
                .analyzer
                .analyze_named(&self.registry, exercise, &points, previous)
                .map_err(to_py_err)?;

            pythonize::pythonize(py, &result).map_err(|e| PyValueError::new_err(e.to_string()))
        }

        pub fn exercises(&self) -> Vec<String> {
            self.registry.names().into_iter().map(str::to_string).collect()
        }
    }

    #[pymodule]
    fn form_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<FormEngine>()?;
        Ok(())
    }
}
