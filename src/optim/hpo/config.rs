//! Search driver configuration

use serde::{Deserialize, Serialize};

use super::grid::GridProposer;
use super::proposer::{GaussianProcessProposer, Proposer, RandomProposer};
use super::types::{AcquisitionFunction, Exploration, SearchSpace, SurrogateModel};
use crate::error::ConfigurationError;

/// Everything the driver needs besides the objective
///
/// Defaults reproduce the reference run: 10 exploratory + 50 guided
/// evaluations, UCB with κ = 2.576, seed 42.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Bounds for each candidate field
    pub space: SearchSpace,
    /// Seed for exploration and acquisition sampling
    pub seed: u64,
    /// Exploratory evaluations before the surrogate is used
    pub init_points: usize,
    /// Guided evaluations after exploration
    pub iterations: usize,
    pub acquisition: AcquisitionFunction,
    pub surrogate: SurrogateModel,
    pub exploration: Exploration,
    /// Score recorded for failed evaluations
    pub failure_score: f64,
    /// Random points scored per guided proposal
    pub acquisition_samples: usize,
    /// Best random points refined by local search
    pub local_restarts: usize,
    /// Observation noise of the Gaussian process surrogate
    pub surrogate_noise: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            space: SearchSpace::default(),
            seed: 42,
            init_points: 10,
            iterations: 50,
            acquisition: AcquisitionFunction::default(),
            surrogate: SurrogateModel::default(),
            exploration: Exploration::default(),
            failure_score: 0.0,
            acquisition_samples: 10_000,
            local_restarts: 10,
            surrogate_noise: 1e-6,
        }
    }
}

impl SearchConfig {
    /// Total number of evaluations
    pub fn budget(&self) -> usize {
        self.init_points.saturating_add(self.iterations)
    }

    /// Check bounds, budget, and acquisition settings
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.space.validate()?;
        if self.budget() == 0 {
            return Err(ConfigurationError::EmptyBudget);
        }
        if !self.failure_score.is_finite() {
            return Err(ConfigurationError::InvalidValue {
                field: "failure_score",
                message: format!("{} (must be finite)", self.failure_score),
            });
        }
        if !(self.surrogate_noise >= 0.0 && self.surrogate_noise.is_finite()) {
            return Err(ConfigurationError::InvalidValue {
                field: "surrogate_noise",
                message: format!("{} (must be finite and >= 0)", self.surrogate_noise),
            });
        }
        if self.acquisition_samples == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "acquisition_samples",
                message: "must be > 0".to_string(),
            });
        }
        match self.acquisition {
            AcquisitionFunction::UpperConfidenceBound { kappa } if !(kappa >= 0.0) => {
                return Err(ConfigurationError::InvalidValue {
                    field: "acquisition.kappa",
                    message: format!("{kappa} (must be >= 0)"),
                });
            }
            AcquisitionFunction::ExpectedImprovement { xi }
            | AcquisitionFunction::ProbabilityOfImprovement { xi }
                if !xi.is_finite() =>
            {
                return Err(ConfigurationError::InvalidValue {
                    field: "acquisition.xi",
                    message: format!("{xi} (must be finite)"),
                });
            }
            _ => {}
        }
        if let SurrogateModel::Grid { points_per_dim } = self.surrogate {
            if points_per_dim < 2 {
                return Err(ConfigurationError::InvalidValue {
                    field: "surrogate.points_per_dim",
                    message: format!("{points_per_dim} (must be >= 2)"),
                });
            }
        }
        Ok(())
    }

    /// Build the proposer selected by `surrogate`
    pub fn proposer(&self) -> Box<dyn Proposer> {
        match self.surrogate {
            SurrogateModel::GaussianProcess => Box::new(
                GaussianProcessProposer::new(self.acquisition)
                    .with_samples(self.acquisition_samples)
                    .with_restarts(self.local_restarts)
                    .with_noise(self.surrogate_noise),
            ),
            SurrogateModel::Random => Box::new(RandomProposer),
            SurrogateModel::Grid { points_per_dim } => Box::new(GridProposer::new(points_per_dim)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::hpo::types::Bounds;

    #[test]
    fn test_default_is_reference_configuration() {
        let config = SearchConfig::default();
        assert_eq!(config.budget(), 60);
        assert_eq!(config.seed, 42);
        assert_eq!(config.acquisition, AcquisitionFunction::UpperConfidenceBound { kappa: 2.576 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_budget_rejected() {
        let config = SearchConfig { init_points: 0, iterations: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigurationError::EmptyBudget));
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut config = SearchConfig::default();
        config.space.learning_rate = Bounds::linear(1e-2, 1e-5);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidBounds { name: "learning_rate", .. })
        ));
    }

    #[test]
    fn test_negative_kappa_rejected() {
        let config = SearchConfig {
            acquisition: AcquisitionFunction::UpperConfidenceBound { kappa: -1.0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_surrogate_noise_validated() {
        let config: SearchConfig = serde_yaml::from_str("surrogate_noise: 0.01\n").unwrap();
        assert_eq!(config.surrogate_noise, 0.01);
        assert!(config.validate().is_ok());

        for noise in [-1e-3, f64::NAN, f64::INFINITY] {
            let config = SearchConfig { surrogate_noise: noise, ..Default::default() };
            assert!(matches!(
                config.validate(),
                Err(ConfigurationError::InvalidValue { field: "surrogate_noise", .. })
            ));
        }
    }

    #[test]
    fn test_proposer_selection() {
        let mut config = SearchConfig::default();
        assert_eq!(config.proposer().name(), "gaussian_process");
        config.surrogate = SurrogateModel::Random;
        assert_eq!(config.proposer().name(), "random");
        config.surrogate = SurrogateModel::Grid { points_per_dim: 3 };
        assert_eq!(config.proposer().name(), "grid");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: SearchConfig = serde_yaml::from_str("seed: 7\niterations: 5\n").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.iterations, 5);
        assert_eq!(config.init_points, 10);
        assert_eq!(config.space, SearchSpace::default());
    }
}
