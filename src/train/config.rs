//! Training loop settings

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Epoch/batch settings shared by every trial of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Full passes over the training set
    pub epochs: usize,
    /// Mini-batch size for training and evaluation
    pub batch_size: usize,
    /// Seeds weight init, dropout masks and shuffling
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self { epochs: 10, batch_size: 32, seed: 42 }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.epochs == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "training.epochs",
                message: "must be > 0".to_string(),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "training.batch_size",
                message: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
