//! Ordered trial history

use serde::{Deserialize, Serialize};

use super::proposer::Observation;
use super::types::{SearchSpace, Trial, TrialStatus};

/// Every evaluated trial, in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    trials: Vec<Trial>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished trial
    pub fn push(&mut self, trial: Trial) {
        self.trials.push(trial);
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Highest-scoring completed trial; ties go to the earliest
    pub fn best(&self) -> Option<&Trial> {
        let mut best: Option<&Trial> = None;
        for trial in self.trials.iter().filter(|t| t.is_completed()) {
            if best.is_none_or(|b| trial.score > b.score) {
                best = Some(trial);
            }
        }
        best
    }

    pub fn n_completed(&self) -> usize {
        self.count(TrialStatus::Completed)
    }

    pub fn n_failed(&self) -> usize {
        self.count(TrialStatus::Failed)
    }

    fn count(&self, status: TrialStatus) -> usize {
        self.trials.iter().filter(|t| t.status == status).count()
    }

    /// Surrogate inputs: finished trials mapped into the unit cube
    ///
    /// Failed trials carry their sentinel score and are included.
    pub fn observations(&self, space: &SearchSpace) -> Vec<Observation> {
        self.trials
            .iter()
            .filter(|t| t.status != TrialStatus::Pending)
            .map(|t| Observation { point: space.to_unit(&t.candidate), score: t.score })
            .collect()
    }
}
