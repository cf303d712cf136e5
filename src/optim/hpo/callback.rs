//! Search lifecycle hooks
//!
//! All methods default to no-ops; implement only the events you need.

use super::state::SearchState;
use super::types::{Candidate, Trial};
use crate::cli::{log, LogLevel};

/// Observer of search events
pub trait SearchCallback {
    /// Called once before the first proposal
    fn on_search_begin(&mut self, _budget: usize) {}

    /// Called before a candidate is evaluated
    fn on_trial_begin(&mut self, _id: usize, _candidate: &Candidate) {}

    /// Called after a trial completed
    fn on_trial_end(&mut self, _trial: &Trial, _best: Option<&Trial>) {}

    /// Called after a trial failed recoverably
    fn on_trial_failed(&mut self, _trial: &Trial) {}

    /// Called once the budget is spent
    fn on_search_end(&mut self, _state: &SearchState) {}

    fn name(&self) -> &'static str {
        "SearchCallback"
    }
}

/// Prints one line per trial
#[derive(Debug, Clone, Copy)]
pub struct ProgressReporter {
    level: LogLevel,
    budget: usize,
}

impl ProgressReporter {
    pub fn new(level: LogLevel) -> Self {
        Self { level, budget: 0 }
    }
}

impl SearchCallback for ProgressReporter {
    fn on_search_begin(&mut self, budget: usize) {
        self.budget = budget;
        log(self.level, LogLevel::Normal, &format!("Searching {budget} configurations"));
    }

    fn on_trial_begin(&mut self, id: usize, candidate: &Candidate) {
        log(
            self.level,
            LogLevel::Verbose,
            &format!("  [{}/{}] evaluating {candidate}", id + 1, self.budget),
        );
    }

    fn on_trial_end(&mut self, trial: &Trial, best: Option<&Trial>) {
        let best = best.map(|b| b.score).unwrap_or(trial.score);
        log(
            self.level,
            LogLevel::Normal,
            &format!(
                "  [{}/{}] {:?} score: {:.4} (best: {best:.4})",
                trial.id + 1,
                self.budget,
                trial.phase,
                trial.score
            ),
        );
    }

    fn on_trial_failed(&mut self, trial: &Trial) {
        log(
            self.level,
            LogLevel::Normal,
            &format!(
                "  [{}/{}] failed: {}",
                trial.id + 1,
                self.budget,
                trial.error.as_deref().unwrap_or("unknown error")
            ),
        );
    }

    fn on_search_end(&mut self, state: &SearchState) {
        log(
            self.level,
            LogLevel::Normal,
            &format!(
                "Search finished: {} completed, {} failed",
                state.n_completed(),
                state.n_failed()
            ),
        );
    }

    fn name(&self) -> &'static str {
        "ProgressReporter"
    }
}
