//! Search strategy types for HPO

use serde::{Deserialize, Serialize};

/// Acquisition function for Bayesian optimization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AcquisitionFunction {
    /// Upper Confidence Bound: μ + κσ
    #[serde(alias = "ucb")]
    UpperConfidenceBound { kappa: f64 },
    /// Expected Improvement over the best observed score
    #[serde(alias = "ei")]
    ExpectedImprovement {
        #[serde(default)]
        xi: f64,
    },
    /// Probability of Improvement over the best observed score
    #[serde(alias = "poi")]
    ProbabilityOfImprovement {
        #[serde(default)]
        xi: f64,
    },
}

impl Default for AcquisitionFunction {
    fn default() -> Self {
        AcquisitionFunction::UpperConfidenceBound { kappa: 2.576 }
    }
}

/// Surrogate used for guided proposals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurrogateModel {
    /// Gaussian process with a Matérn 5/2 kernel
    #[default]
    GaussianProcess,
    /// Uniform random proposals (ignores observations)
    Random,
    /// Regular grid visited in lexicographic order
    Grid { points_per_dim: usize },
}

/// How exploratory candidates are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exploration {
    /// Independent uniform samples
    #[default]
    Random,
    /// One sample per stratum in every dimension
    LatinHypercube,
}
