//! Objective capability consumed by the search driver

use super::types::Candidate;
use crate::error::Result;

/// Scores a candidate; higher is better
///
/// Returning [`crate::Error::Training`] marks the trial failed and the search
/// goes on. Any other error aborts the search.
pub trait Objective {
    fn evaluate(&mut self, candidate: &Candidate) -> Result<f64>;
}

impl<F> Objective for F
where
    F: FnMut(&Candidate) -> Result<f64>,
{
    fn evaluate(&mut self, candidate: &Candidate) -> Result<f64> {
        self(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_objective() {
        let mut calls = 0;
        let mut objective = |c: &Candidate| -> Result<f64> {
            calls += 1;
            Ok(c.learning_rate * 10.0)
        };
        let score = objective.evaluate(&Candidate::new(0.5, 0.0)).unwrap();
        assert_eq!(score, 5.0);
        assert_eq!(calls, 1);
    }
}
