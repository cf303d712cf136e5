//! Trial types for HPO

use serde::{Deserialize, Serialize};

use super::space::Candidate;

/// A single trial (candidate + score)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Trial ID (evaluation order, 0-based)
    pub id: usize,
    /// Evaluated candidate
    pub candidate: Candidate,
    /// Objective score (higher is better); the sentinel for failed trials
    pub score: f64,
    /// Trial status
    pub status: TrialStatus,
    /// How the candidate was chosen
    pub phase: TrialPhase,
    /// Failure reason, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Trial {
    /// Create a new pending trial
    pub fn new(id: usize, candidate: Candidate, phase: TrialPhase) -> Self {
        Self {
            id,
            candidate,
            score: f64::NEG_INFINITY,
            status: TrialStatus::Pending,
            phase,
            error: None,
        }
    }

    /// Mark trial as complete with score
    pub fn complete(&mut self, score: f64) {
        self.score = score;
        self.status = TrialStatus::Completed;
    }

    /// Mark trial as failed, recording the sentinel score
    pub fn fail(&mut self, sentinel: f64, reason: impl Into<String>) {
        self.score = sentinel;
        self.status = TrialStatus::Failed;
        self.error = Some(reason.into());
    }

    pub fn is_completed(&self) -> bool {
        self.status == TrialStatus::Completed
    }
}

/// Trial status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    Pending,
    Completed,
    Failed,
}

/// Search phase a trial belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialPhase {
    /// Chosen without the surrogate
    Exploratory,
    /// Chosen by maximizing the acquisition function
    Guided,
}
