use thiserror::Error;

/// Rejection of a landmark frame at the input boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("malformed landmark frame: expected {expected} landmarks, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("exercise '{name}' not found")]
    ExerciseNotFound { name: String },
    #[error("exercise '{name}' is already registered")]
    DuplicateExercise { name: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown movement phase '{0}'")]
pub struct ParsePhaseError(pub String);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Umbrella error for callers that validate, resolve and analyze in one go.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Phase(#[from] ParsePhaseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
