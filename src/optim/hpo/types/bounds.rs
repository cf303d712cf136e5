//! Continuous parameter bounds

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Closed interval `[low, high]`, optionally searched in log space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
    #[serde(default)]
    pub log_scale: bool,
}

impl Bounds {
    /// Linear-scale bounds
    pub const fn linear(low: f64, high: f64) -> Self {
        Self { low, high, log_scale: false }
    }

    /// Log-scale bounds
    pub const fn log(low: f64, high: f64) -> Self {
        Self { low, high, log_scale: true }
    }

    /// Check the interval is finite, positive, and non-degenerate
    pub fn validate(&self, name: &'static str) -> Result<(), ConfigurationError> {
        let ok = self.low.is_finite()
            && self.high.is_finite()
            && self.low > 0.0
            && self.low < self.high;
        if ok {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidBounds { name, low: self.low, high: self.high })
        }
    }

    /// Whether `value` lies inside the interval
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.low && value <= self.high
    }

    /// Reject non-finite, non-positive, or out-of-range values
    pub fn check(&self, name: &'static str, value: f64) -> Result<(), ConfigurationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigurationError::NotPositiveFinite { name, value });
        }
        if !self.contains(value) {
            return Err(ConfigurationError::OutOfBounds {
                name,
                value,
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    /// Map a value to `[0, 1]`
    pub fn to_unit(&self, value: f64) -> f64 {
        let t = if self.log_scale {
            (value.ln() - self.low.ln()) / (self.high.ln() - self.low.ln())
        } else {
            (value - self.low) / (self.high - self.low)
        };
        t.clamp(0.0, 1.0)
    }

    /// Map a unit coordinate back into the interval
    ///
    /// The result is clamped so rounding never leaves the bounds.
    pub fn from_unit(&self, t: f64) -> f64 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let value = if self.log_scale {
            (self.low.ln() + t * (self.high.ln() - self.low.ln())).exp()
        } else {
            self.low + t * (self.high - self.low)
        };
        value.clamp(self.low, self.high)
    }

    /// Sample uniformly (in log space when `log_scale`)
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.from_unit(rng.random::<f64>())
    }
}
