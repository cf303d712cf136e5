//! Classifier artifact produced by the model factory

use super::architecture::Architecture;
use super::network::Network;
use crate::optim::AdamConfig;

/// Untrained classifier: topology plus bound optimizer settings
///
/// Cheap to create. Weights exist only once [`Classifier::instantiate`]
/// materializes a [`Network`].
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    architecture: Architecture,
    optimizer: AdamConfig,
    regularization_strength: f32,
}

impl Classifier {
    pub(crate) fn new(
        architecture: Architecture,
        optimizer: AdamConfig,
        regularization_strength: f32,
    ) -> Self {
        Self { architecture, optimizer, regularization_strength }
    }

    pub fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    pub fn optimizer(&self) -> &AdamConfig {
        &self.optimizer
    }

    pub fn learning_rate(&self) -> f32 {
        self.optimizer.learning_rate
    }

    pub fn regularization_strength(&self) -> f32 {
        self.regularization_strength
    }

    /// Number of output classes
    pub fn classes(&self) -> usize {
        self.architecture.output_units()
    }

    /// Initialize weights from `seed` and attach a fresh optimizer
    pub fn instantiate(&self, seed: u64) -> Network {
        Network::new(&self.architecture, self.optimizer, self.regularization_strength, seed)
    }
}
