//! Error types for afinar
//!
//! Three categories matter to the search loop:
//! - [`ConfigurationError`]: reported immediately, never retried
//! - [`TrainingFailure`]: recoverable, the driver records a failed trial
//! - [`Error::Exhausted`]: every evaluation in the budget failed

use thiserror::Error;

/// Result type for afinar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid bounds, candidates, budgets, or model geometry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("{name} = {value} is outside [{low}, {high}]")]
    OutOfBounds {
        name: &'static str,
        value: f64,
        low: f64,
        high: f64,
    },

    #[error("{name} must be a finite positive number, got {value}")]
    NotPositiveFinite { name: &'static str, value: f64 },

    #[error("Invalid bounds for {name}: [{low}, {high}] (need finite 0 < low < high)")]
    InvalidBounds {
        name: &'static str,
        low: f64,
        high: f64,
    },

    #[error("Evaluation budget is empty (init_points + iterations must be > 0)")]
    EmptyBudget,

    #[error("Invalid model geometry: {0}")]
    InvalidModel(String),

    #[error("Invalid {field}: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("Path does not exist: {0}")]
    PathNotFound(String),
}

/// A single evaluation could not produce a score
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingFailure {
    #[error("Training diverged at epoch {epoch} (loss = {loss})")]
    Diverged { epoch: usize, loss: f32 },

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Dataset is empty: {0}")]
    EmptyDataset(&'static str),

    #[error("{0}")]
    Other(String),
}

/// Crate-wide error
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Training failure: {0}")]
    Training(#[from] TrainingFailure),

    #[error("Search exhausted: all {trials} evaluations failed, no best candidate")]
    Exhausted { trials: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Audio error: {0}")]
    Audio(String),
}

impl Error {
    /// Whether the search driver may continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Training(_))
    }
}

impl From<hound::Error> for Error {
    fn from(e: hound::Error) -> Self {
        Error::Audio(e.to_string())
    }
}
