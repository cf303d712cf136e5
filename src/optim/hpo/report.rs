//! Search outcome

use serde::{Deserialize, Serialize};
use std::fmt;

use super::state::SearchState;
use super::types::Trial;
use crate::error::{Error, Result};

/// Best configuration found
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestResult {
    pub learning_rate: f64,
    pub regularization_strength: f64,
    pub score: f64,
}

impl From<&Trial> for BestResult {
    fn from(trial: &Trial) -> Self {
        Self {
            learning_rate: trial.candidate.learning_rate,
            regularization_strength: trial.candidate.regularization_strength,
            score: trial.score,
        }
    }
}

/// Best result plus the full trial history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub best: BestResult,
    pub trials: Vec<Trial>,
    pub failed: usize,
}

impl SearchReport {
    /// Summarize a finished search
    ///
    /// Fails with [`Error::Exhausted`] if no trial completed.
    pub fn from_state(state: &SearchState) -> Result<Self> {
        let best = state.best().ok_or(Error::Exhausted { trials: state.len() })?;
        Ok(Self {
            best: BestResult::from(best),
            trials: state.trials().to_vec(),
            failed: state.n_failed(),
        })
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Best score: {:.4}", self.best.score)?;
        writeln!(f, "  learning_rate:           {:.6e}", self.best.learning_rate)?;
        writeln!(f, "  regularization_strength: {:.6e}", self.best.regularization_strength)?;
        write!(f, "Trials: {} ({} failed)", self.trials.len(), self.failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::hpo::types::{Candidate, TrialPhase};

    #[test]
    fn test_report_from_state() {
        let mut state = SearchState::new();
        let mut a = Trial::new(0, Candidate::new(1e-3, 1e-6), TrialPhase::Exploratory);
        a.complete(0.42);
        let mut b = Trial::new(1, Candidate::new(2e-3, 2e-6), TrialPhase::Guided);
        b.fail(0.0, "diverged");
        state.push(a);
        state.push(b);

        let report = SearchReport::from_state(&state).unwrap();
        assert_eq!(report.best.score, 0.42);
        assert_eq!(report.best.learning_rate, 1e-3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.trials.len(), 2);

        let text = report.to_string();
        assert!(text.contains("Best score: 0.4200"));
        assert!(text.contains("1 failed"));

        let json = report.to_json().unwrap();
        let back: SearchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.trials.len(), 2);
        assert!((back.best.score - 0.42).abs() < 1e-12);
        assert_eq!(back.trials[1].error.as_deref(), Some("diverged"));
    }

    #[test]
    fn test_report_exhausted() {
        let mut state = SearchState::new();
        let mut t = Trial::new(0, Candidate::new(1e-3, 1e-6), TrialPhase::Exploratory);
        t.fail(0.0, "oom");
        state.push(t);
        assert!(matches!(SearchReport::from_state(&state), Err(Error::Exhausted { trials: 1 })));
    }
}
