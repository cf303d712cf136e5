//! Candidate record and the two-dimensional search space

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::bounds::Bounds;
use crate::error::ConfigurationError;

/// One proposed hyperparameter configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub learning_rate: f64,
    pub regularization_strength: f64,
}

impl Candidate {
    pub fn new(learning_rate: f64, regularization_strength: f64) -> Self {
        Self { learning_rate, regularization_strength }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "learning_rate={:.3e}, regularization_strength={:.3e}",
            self.learning_rate, self.regularization_strength
        )
    }
}

/// Bounded search space over [`Candidate`] fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    #[serde(default = "default_learning_rate")]
    pub learning_rate: Bounds,
    #[serde(default = "default_regularization_strength")]
    pub regularization_strength: Bounds,
}

fn default_learning_rate() -> Bounds {
    Bounds::linear(1e-5, 1e-2)
}

fn default_regularization_strength() -> Bounds {
    Bounds::linear(1e-7, 1e-4)
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            learning_rate: default_learning_rate(),
            regularization_strength: default_regularization_strength(),
        }
    }
}

impl SearchSpace {
    /// Number of searched dimensions
    pub const DIM: usize = 2;

    /// Check both intervals
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.learning_rate.validate("learning_rate")?;
        self.regularization_strength.validate("regularization_strength")
    }

    /// Whether both fields lie inside their bounds
    pub fn contains(&self, candidate: &Candidate) -> bool {
        self.learning_rate.contains(candidate.learning_rate)
            && self.regularization_strength.contains(candidate.regularization_strength)
    }

    /// Reject a candidate outside the space
    pub fn check(&self, candidate: &Candidate) -> Result<(), ConfigurationError> {
        self.learning_rate.check("learning_rate", candidate.learning_rate)?;
        self.regularization_strength
            .check("regularization_strength", candidate.regularization_strength)
    }

    /// Map a candidate into the unit square
    pub fn to_unit(&self, candidate: &Candidate) -> Vec<f64> {
        vec![
            self.learning_rate.to_unit(candidate.learning_rate),
            self.regularization_strength.to_unit(candidate.regularization_strength),
        ]
    }

    /// Map a unit-square point back into the space (clamped)
    pub fn from_unit(&self, point: &[f64]) -> Candidate {
        let coord = |i: usize| point.get(i).copied().unwrap_or(0.0);
        Candidate {
            learning_rate: self.learning_rate.from_unit(coord(0)),
            regularization_strength: self.regularization_strength.from_unit(coord(1)),
        }
    }

    /// Sample a random candidate
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Candidate {
        Candidate {
            learning_rate: self.learning_rate.sample(rng),
            regularization_strength: self.regularization_strength.sample(rng),
        }
    }
}
