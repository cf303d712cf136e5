//! Builds classifiers from hyperparameter candidates

use super::architecture::{Architecture, ModelConfig};
use super::classifier::Classifier;
use crate::error::ConfigurationError;
use crate::optim::hpo::{Candidate, SearchSpace};
use crate::optim::AdamConfig;

/// Pure constructor of fixed-topology classifiers
///
/// Rejects hyperparameters outside `space`; values are never clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFactory {
    architecture: Architecture,
    space: SearchSpace,
}

impl ModelFactory {
    /// Factory for the given geometry and the reference search space
    pub fn new(config: ModelConfig) -> Result<Self, ConfigurationError> {
        Ok(Self { architecture: Architecture::new(config)?, space: SearchSpace::default() })
    }

    /// Accept hyperparameters from `space` instead
    pub fn with_space(mut self, space: SearchSpace) -> Result<Self, ConfigurationError> {
        space.validate()?;
        self.space = space;
        Ok(self)
    }

    pub fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    /// Classifier bound to Adam(`learning_rate`) with an L2 penalty of
    /// `regularization_strength` on the second and third convolutions
    pub fn build(
        &self,
        learning_rate: f64,
        regularization_strength: f64,
    ) -> Result<Classifier, ConfigurationError> {
        self.space.learning_rate.check("learning_rate", learning_rate)?;
        self.space
            .regularization_strength
            .check("regularization_strength", regularization_strength)?;
        Ok(Classifier::new(
            self.architecture.clone(),
            AdamConfig::with_lr(learning_rate as f32),
            regularization_strength as f32,
        ))
    }

    pub fn build_candidate(&self, candidate: &Candidate) -> Result<Classifier, ConfigurationError> {
        self.build(candidate.learning_rate, candidate.regularization_strength)
    }
}

impl Default for ModelFactory {
    fn default() -> Self {
        // The reference geometry always has non-empty stage outputs
        let architecture = Architecture::new(ModelConfig::default())
            .expect("reference geometry is valid");
        Self { architecture, space: SearchSpace::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::hpo::Bounds;
    use approx::assert_relative_eq;

    #[test]
    fn test_build_binds_optimizer() {
        let factory = ModelFactory::default();
        let classifier = factory.build(1e-3, 1e-5).unwrap();
        assert_relative_eq!(classifier.learning_rate(), 1e-3);
        assert_relative_eq!(classifier.regularization_strength(), 1e-5);
        assert_relative_eq!(classifier.optimizer().beta1, 0.9);
        assert_relative_eq!(classifier.optimizer().beta2, 0.999);
        assert_relative_eq!(classifier.optimizer().epsilon, 1e-7);
        assert_eq!(classifier.classes(), 26);
    }

    #[test]
    fn test_build_accepts_bounds_inclusive() {
        let factory = ModelFactory::default();
        assert!(factory.build(1e-5, 1e-7).is_ok());
        assert!(factory.build(1e-2, 1e-4).is_ok());
    }

    #[test]
    fn test_build_rejects_out_of_bounds() {
        let factory = ModelFactory::default();
        assert!(matches!(
            factory.build(0.5, 1e-5),
            Err(ConfigurationError::OutOfBounds { name: "learning_rate", .. })
        ));
        assert!(matches!(
            factory.build(1e-3, 1e-3),
            Err(ConfigurationError::OutOfBounds { name: "regularization_strength", .. })
        ));
    }

    #[test]
    fn test_build_rejects_non_finite_and_non_positive() {
        let factory = ModelFactory::default();
        for (lr, reg) in [(f64::NAN, 1e-5), (1e-3, f64::INFINITY), (-1e-3, 1e-5), (1e-3, 0.0)] {
            assert!(matches!(
                factory.build(lr, reg),
                Err(ConfigurationError::NotPositiveFinite { .. })
            ));
        }
    }

    #[test]
    fn test_custom_space() {
        let mut space = SearchSpace::default();
        space.learning_rate = Bounds::log(1e-4, 1.0);
        let factory = ModelFactory::default().with_space(space).unwrap();
        assert!(factory.build(0.5, 1e-5).is_ok());

        space.learning_rate = Bounds::linear(1.0, 0.1);
        assert!(ModelFactory::default().with_space(space).is_err());
    }

    #[test]
    fn test_impossible_geometry() {
        let config = ModelConfig { image_size: 4, ..Default::default() };
        assert!(matches!(ModelFactory::new(config), Err(ConfigurationError::InvalidModel(_))));
    }

    #[test]
    fn test_each_build_is_fresh() {
        let factory = ModelFactory::default();
        let candidate = Candidate::new(2e-3, 3e-6);
        let a = factory.build_candidate(&candidate).unwrap();
        let b = factory.build_candidate(&candidate).unwrap();
        assert_eq!(a, b);
    }
}
