//! Bayesian search driver
//!
//! The driver is an explicit state machine:
//!
//! ```text
//! INIT -> { PROPOSE -> EVALUATE -> UPDATE }* -> TERMINATED
//! ```
//!
//! `INIT` draws every exploratory point from the seeded generator. `PROPOSE`
//! hands out exploratory points first, then asks the [`Proposer`] for guided
//! ones. `PROPOSE` moves to `TERMINATED` once the budget is spent.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

use super::callback::SearchCallback;
use super::config::SearchConfig;
use super::objective::Objective;
use super::proposer::Proposer;
use super::report::SearchReport;
use super::state::SearchState;
use super::types::{SearchSpace, Trial, TrialPhase};
use crate::error::Result;

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Init,
    Propose,
    Evaluate,
    Update,
    Terminated,
}

/// Runs an [`Objective`] over a [`SearchConfig`] budget
pub struct SearchDriver {
    config: SearchConfig,
    proposer: Box<dyn Proposer>,
    callbacks: Vec<Box<dyn SearchCallback>>,
    rng: StdRng,
    state: DriverState,
    history: SearchState,
    exploratory: VecDeque<Vec<f64>>,
    pending: Option<Trial>,
}

impl SearchDriver {
    /// Validate `config` and create a driver in the `Init` state
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let proposer = config.proposer();
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            proposer,
            callbacks: Vec::new(),
            rng,
            state: DriverState::Init,
            history: SearchState::new(),
            exploratory: VecDeque::new(),
            pending: None,
        })
    }

    /// Replace the proposer chosen by the configuration
    pub fn with_proposer(mut self, proposer: Box<dyn Proposer>) -> Self {
        self.proposer = proposer;
        self
    }

    pub fn add_callback(&mut self, callback: Box<dyn SearchCallback>) {
        self.callbacks.push(callback);
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Trials evaluated so far
    pub fn history(&self) -> &SearchState {
        &self.history
    }

    fn space(&self) -> &SearchSpace {
        &self.config.space
    }

    /// Perform exactly one state transition
    ///
    /// A non-recoverable objective error terminates the driver and is
    /// returned unchanged.
    pub fn advance(&mut self, objective: &mut dyn Objective) -> Result<DriverState> {
        self.state = match self.state {
            DriverState::Init => self.initialize(),
            DriverState::Propose => self.propose(),
            DriverState::Evaluate => match self.evaluate(objective) {
                Ok(next) => next,
                Err(e) => {
                    self.state = DriverState::Terminated;
                    return Err(e);
                }
            },
            DriverState::Update => self.update(),
            DriverState::Terminated => DriverState::Terminated,
        };
        Ok(self.state)
    }

    /// Run until the budget is spent and summarize
    pub fn run(&mut self, objective: &mut dyn Objective) -> Result<SearchReport> {
        while self.advance(objective)? != DriverState::Terminated {}
        SearchReport::from_state(&self.history)
    }

    fn initialize(&mut self) -> DriverState {
        let n = self.config.init_points;
        let points = self.config.exploration.points(n, SearchSpace::DIM, &mut self.rng);
        self.exploratory = points.into();
        let budget = self.config.budget();
        for cb in &mut self.callbacks {
            cb.on_search_begin(budget);
        }
        DriverState::Propose
    }

    fn propose(&mut self) -> DriverState {
        if self.history.len() >= self.config.budget() {
            for cb in &mut self.callbacks {
                cb.on_search_end(&self.history);
            }
            return DriverState::Terminated;
        }

        let (point, phase) = match self.exploratory.pop_front() {
            Some(point) => (point, TrialPhase::Exploratory),
            None => {
                let observations = self.history.observations(self.space());
                let point = self.proposer.propose(&observations, SearchSpace::DIM, &mut self.rng);
                (point, TrialPhase::Guided)
            }
        };
        let candidate = self.space().from_unit(&point);
        let trial = Trial::new(self.history.len(), candidate, phase);
        for cb in &mut self.callbacks {
            cb.on_trial_begin(trial.id, &trial.candidate);
        }
        self.pending = Some(trial);
        DriverState::Evaluate
    }

    fn evaluate(&mut self, objective: &mut dyn Objective) -> Result<DriverState> {
        let Some(trial) = self.pending.as_mut() else {
            return Ok(DriverState::Propose);
        };
        match objective.evaluate(&trial.candidate) {
            Ok(score) if score.is_finite() => trial.complete(score),
            Ok(score) => trial.fail(self.config.failure_score, format!("non-finite score {score}")),
            Err(e) if e.is_recoverable() => trial.fail(self.config.failure_score, e.to_string()),
            Err(e) => return Err(e),
        }
        Ok(DriverState::Update)
    }

    fn update(&mut self) -> DriverState {
        let Some(trial) = self.pending.take() else {
            return DriverState::Propose;
        };
        self.history.push(trial);
        if let Some(trial) = self.history.trials().last() {
            let best = self.history.best();
            for cb in &mut self.callbacks {
                if trial.is_completed() {
                    cb.on_trial_end(trial, best);
                } else {
                    cb.on_trial_failed(trial);
                }
            }
        }
        DriverState::Propose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, TrainingFailure};
    use crate::optim::hpo::types::{Candidate, SurrogateModel, TrialStatus};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn small_config(init_points: usize, iterations: usize) -> SearchConfig {
        SearchConfig {
            init_points,
            iterations,
            acquisition_samples: 200,
            local_restarts: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_state_sequence_single_evaluation() {
        let mut driver = SearchDriver::new(small_config(1, 0)).unwrap();
        let mut objective = |_: &Candidate| -> crate::Result<f64> { Ok(0.5) };
        assert_eq!(driver.state(), DriverState::Init);
        let mut seen = Vec::new();
        loop {
            let s = driver.advance(&mut objective).unwrap();
            seen.push(s);
            if s == DriverState::Terminated {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                DriverState::Propose,
                DriverState::Evaluate,
                DriverState::Update,
                DriverState::Propose,
                DriverState::Terminated,
            ]
        );
        assert_eq!(driver.advance(&mut objective).unwrap(), DriverState::Terminated);
    }

    #[test]
    fn test_run_spends_exact_budget() {
        let mut calls = 0;
        let mut objective = |c: &Candidate| -> crate::Result<f64> {
            calls += 1;
            Ok(c.learning_rate * 100.0)
        };
        let mut driver = SearchDriver::new(small_config(3, 4)).unwrap();
        let report = driver.run(&mut objective).unwrap();
        assert_eq!(calls, 7);
        assert_eq!(report.trials.len(), 7);
        assert_eq!(
            report.trials.iter().filter(|t| t.phase == TrialPhase::Exploratory).count(),
            3
        );
        let max = report.trials.iter().map(|t| t.score).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(report.best.score, max);
    }

    #[test]
    fn test_recoverable_failure_continues() {
        let mut n = 0;
        let mut objective = |_: &Candidate| -> crate::Result<f64> {
            n += 1;
            if n == 2 {
                Err(TrainingFailure::Diverged { epoch: 0, loss: f32::NAN }.into())
            } else {
                Ok(0.1 * n as f64)
            }
        };
        let config = SearchConfig { failure_score: -1.0, ..small_config(3, 0) };
        let report = SearchDriver::new(config).unwrap().run(&mut objective).unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.trials[1].status, TrialStatus::Failed);
        assert_eq!(report.trials[1].score, -1.0);
        assert!(report.trials[1].error.as_deref().unwrap_or("").contains("diverged"));
    }

    #[test]
    fn test_non_finite_score_is_failure() {
        let mut objective = |_: &Candidate| -> crate::Result<f64> { Ok(f64::NAN) };
        let mut driver = SearchDriver::new(small_config(2, 0)).unwrap();
        assert!(matches!(driver.run(&mut objective), Err(Error::Exhausted { trials: 2 })));
        assert_eq!(driver.history().n_failed(), 2);
    }

    #[test]
    fn test_fatal_error_terminates() {
        let mut objective = |_: &Candidate| -> crate::Result<f64> {
            Err(Error::Dataset("missing images".into()))
        };
        let mut driver = SearchDriver::new(small_config(2, 2)).unwrap();
        assert!(matches!(driver.run(&mut objective), Err(Error::Dataset(_))));
        assert_eq!(driver.state(), DriverState::Terminated);
        assert!(driver.history().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(SearchDriver::new(small_config(0, 0)).is_err());
    }

    #[test]
    fn test_callbacks_observe_every_trial() {
        #[derive(Default)]
        struct Counts {
            begin: usize,
            ended: usize,
            failed: usize,
            finished: bool,
        }
        struct Recorder(Rc<RefCell<Counts>>);
        impl SearchCallback for Recorder {
            fn on_trial_begin(&mut self, _id: usize, _c: &Candidate) {
                self.0.borrow_mut().begin += 1;
            }
            fn on_trial_end(&mut self, _t: &Trial, _b: Option<&Trial>) {
                self.0.borrow_mut().ended += 1;
            }
            fn on_trial_failed(&mut self, _t: &Trial) {
                self.0.borrow_mut().failed += 1;
            }
            fn on_search_end(&mut self, _s: &SearchState) {
                self.0.borrow_mut().finished = true;
            }
        }

        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut driver = SearchDriver::new(small_config(2, 2)).unwrap();
        driver.add_callback(Box::new(Recorder(Rc::clone(&counts))));
        let mut n = 0;
        let mut objective = |_: &Candidate| -> crate::Result<f64> {
            n += 1;
            if n % 2 == 0 {
                Err(TrainingFailure::Other("boom".into()).into())
            } else {
                Ok(1.0)
            }
        };
        driver.run(&mut objective).unwrap();
        let c = counts.borrow();
        assert_eq!((c.begin, c.ended, c.failed, c.finished), (4, 2, 2, true));
    }

    #[test]
    fn test_guided_candidates_stay_in_bounds() {
        let surrogates = [
            SurrogateModel::GaussianProcess,
            SurrogateModel::Random,
            SurrogateModel::Grid { points_per_dim: 3 },
        ];
        for surrogate in surrogates {
            let config = SearchConfig { surrogate, ..small_config(2, 5) };
            let space = config.space;
            let mut objective = |c: &Candidate| -> crate::Result<f64> { Ok(-c.learning_rate) };
            let report = SearchDriver::new(config).unwrap().run(&mut objective).unwrap();
            assert!(report.trials.iter().all(|t| space.contains(&t.candidate)));
        }
    }
}
