//! Integration tests for the Bayesian search driver
//!
//! Scenarios:
//! - Single exploratory evaluation
//! - Recoverable failure in the middle of a run
//! - Every evaluation failing
//! - Seeded reproducibility of exploration
//! - Guided proposals beating the exploratory phase
//! - Candidates always inside the declared bounds

use afinar::optim::hpo::{
    Candidate, SearchConfig, SearchDriver, SearchSpace, SurrogateModel, TrialPhase, TrialStatus,
};
use afinar::{Error, Result, TrainingFailure};
use proptest::prelude::*;

fn config(init_points: usize, iterations: usize) -> SearchConfig {
    SearchConfig { init_points, iterations, acquisition_samples: 500, ..Default::default() }
}

/// Smooth score peaking near lr = 1e-3, reg = 1e-5
fn bowl(c: &Candidate) -> f64 {
    let lr = (c.learning_rate.log10() + 3.0).powi(2);
    let reg = (c.regularization_strength.log10() + 5.0).powi(2);
    1.0 / (1.0 + lr + reg)
}

#[test]
fn test_single_exploratory_evaluation() {
    let mut calls = 0;
    let mut objective = |c: &Candidate| -> Result<f64> {
        calls += 1;
        Ok(bowl(c))
    };
    let mut driver = SearchDriver::new(config(1, 0)).unwrap();
    let report = driver.run(&mut objective).unwrap();

    assert_eq!(calls, 1);
    assert_eq!(report.trials.len(), 1);
    assert_eq!(report.trials[0].phase, TrialPhase::Exploratory);
    assert_eq!(report.best.score, report.trials[0].score);
    assert_eq!(report.best.learning_rate, report.trials[0].candidate.learning_rate);
}

#[test]
fn test_failure_on_third_evaluation() {
    let mut calls = 0;
    let mut objective = |c: &Candidate| -> Result<f64> {
        calls += 1;
        if calls == 3 {
            return Err(TrainingFailure::Diverged { epoch: 1, loss: f32::NAN }.into());
        }
        Ok(bowl(c))
    };
    let mut driver = SearchDriver::new(config(3, 2)).unwrap();
    let report = driver.run(&mut objective).unwrap();

    assert_eq!(report.trials.len(), 5);
    assert_eq!(report.failed, 1);
    let failed = &report.trials[2];
    assert_eq!(failed.status, TrialStatus::Failed);
    assert_eq!(failed.score, 0.0);
    assert!(failed.error.as_deref().unwrap_or_default().contains("diverged"));
    assert!(report
        .trials
        .iter()
        .filter(|t| t.id != 2)
        .all(|t| t.status == TrialStatus::Completed));
}

#[test]
fn test_all_failures_exhaust_the_search() {
    let mut objective = |_: &Candidate| -> Result<f64> {
        Err(TrainingFailure::ResourceExhausted("out of memory".into()).into())
    };
    let mut driver = SearchDriver::new(config(2, 2)).unwrap();
    let err = driver.run(&mut objective).unwrap_err();
    assert!(matches!(err, Error::Exhausted { trials: 4 }));
    assert_eq!(driver.history().n_failed(), 4);
}

#[test]
fn test_best_is_first_maximum() {
    let mut scores = [0.3, 0.9, 0.9, 0.1].into_iter();
    let mut objective = |_: &Candidate| -> Result<f64> { Ok(scores.next().unwrap_or(0.0)) };
    let mut driver = SearchDriver::new(config(4, 0)).unwrap();
    let report = driver.run(&mut objective).unwrap();
    let best = &report.trials[1];
    assert_eq!(report.best.score, 0.9);
    assert_eq!(report.best.learning_rate, best.candidate.learning_rate);
    assert_eq!(report.best.regularization_strength, best.candidate.regularization_strength);
}

#[test]
fn test_same_seed_same_exploration() {
    let run = |seed: u64| {
        let mut driver = SearchDriver::new(SearchConfig { seed, ..config(5, 2) }).unwrap();
        let mut objective = |c: &Candidate| -> Result<f64> { Ok(bowl(c)) };
        driver.run(&mut objective).unwrap()
    };
    let a = run(42);
    let b = run(42);
    let c = run(7);
    let exploratory = |r: &afinar::optim::hpo::SearchReport| -> Vec<Candidate> {
        r.trials
            .iter()
            .filter(|t| t.phase == TrialPhase::Exploratory)
            .map(|t| t.candidate)
            .collect()
    };
    assert_eq!(exploratory(&a), exploratory(&b));
    assert_ne!(exploratory(&a), exploratory(&c));
    assert_eq!(a.trials, b.trials);
}

#[test]
fn test_configuration_error_aborts_search() {
    let mut calls = 0;
    let mut objective = |_: &Candidate| -> Result<f64> {
        calls += 1;
        Err(afinar::ConfigurationError::EmptyBudget.into())
    };
    let mut driver = SearchDriver::new(config(3, 0)).unwrap();
    assert!(matches!(driver.run(&mut objective), Err(Error::Configuration(_))));
    assert_eq!(calls, 1);
}

#[test]
fn test_guided_search_improves_on_exploration() {
    let mut objective = |c: &Candidate| -> Result<f64> { Ok(bowl(c)) };
    let mut driver = SearchDriver::new(config(5, 15)).unwrap();
    let report = driver.run(&mut objective).unwrap();
    assert_eq!(report.trials.len(), 20);

    let best_in = |phase: TrialPhase| {
        report
            .trials
            .iter()
            .filter(|t| t.phase == phase)
            .map(|t| t.score)
            .fold(f64::NEG_INFINITY, f64::max)
    };
    let exploratory = best_in(TrialPhase::Exploratory);
    let guided = best_in(TrialPhase::Guided);
    assert!(guided > exploratory, "guided {guided} <= exploratory {exploratory}");
    assert_eq!(report.best.score, guided);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn prop_candidates_stay_in_bounds(
        seed in 0u64..10_000,
        surrogate in prop_oneof![
            Just(SurrogateModel::GaussianProcess),
            Just(SurrogateModel::Random),
            Just(SurrogateModel::Grid { points_per_dim: 3 }),
        ],
    ) {
        let space = SearchSpace::default();
        let mut seen = Vec::new();
        let mut objective = |c: &Candidate| -> Result<f64> {
            seen.push(*c);
            Ok(bowl(c))
        };
        let cfg = SearchConfig { seed, surrogate, acquisition_samples: 200, ..config(3, 4) };
        let mut driver = SearchDriver::new(cfg).unwrap();
        driver.run(&mut objective).unwrap();

        prop_assert_eq!(seen.len(), 7);
        for c in &seen {
            prop_assert!((1e-5..=1e-2).contains(&c.learning_rate), "{}", c);
            prop_assert!((1e-7..=1e-4).contains(&c.regularization_strength), "{}", c);
            prop_assert!(space.contains(c));
        }
    }
}
