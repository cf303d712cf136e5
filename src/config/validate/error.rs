//! Validation error types

use crate::error::ConfigurationError;

/// Why a tuning specification cannot run
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Training data path does not exist: {0}")]
    TrainDataNotFound(String),

    #[error("Validation data path does not exist: {0}")]
    ValDataNotFound(String),

    #[error("Training data path is empty")]
    MissingTrainData,

    #[error("Invalid validation split: {0} (must be in (0.0, 1.0))")]
    InvalidValidationSplit(f64),
}

impl From<ValidationError> for crate::Error {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::Configuration(inner) => inner.into(),
            ValidationError::TrainDataNotFound(path) | ValidationError::ValDataNotFound(path) => {
                ConfigurationError::PathNotFound(path).into()
            }
            other => ConfigurationError::InvalidValue {
                field: "data",
                message: other.to_string(),
            }
            .into(),
        }
    }
}
