//! Hyperparameter search
//!
//! Bayesian optimization over learning rate and regularization strength:
//! a Gaussian process surrogate (Matérn 5/2) proposes candidates by
//! maximizing an acquisition function, after a seeded exploratory phase.
//!
//! # Example
//!
//! ```ignore
//! use afinar::optim::hpo::{Candidate, SearchConfig, SearchDriver};
//!
//! let mut driver = SearchDriver::new(SearchConfig::default())?;
//! let mut objective = |c: &Candidate| -> afinar::Result<f64> {
//!     Ok(-(c.learning_rate - 1e-3).abs())
//! };
//! let report = driver.run(&mut objective)?;
//! println!("{report}");
//! ```
//!
//! # References
//!
//! \[1\] Srinivas et al. (2010) - Gaussian Process Optimization in the Bandit Setting (GP-UCB)
//! \[2\] Rasmussen & Williams (2006) - Gaussian Processes for Machine Learning

mod acquisition;
mod callback;
mod config;
mod driver;
mod exploration;
pub mod gp;
mod grid;
mod objective;
mod proposer;
mod report;
mod state;
mod types;

pub use acquisition::{normal_cdf, normal_pdf};
pub use callback::{ProgressReporter, SearchCallback};
pub use config::SearchConfig;
pub use driver::{DriverState, SearchDriver};
pub use grid::GridProposer;
pub use objective::Objective;
pub use proposer::{GaussianProcessProposer, Observation, Proposer, RandomProposer};
pub use report::{BestResult, SearchReport};
pub use state::SearchState;
pub use types::{
    AcquisitionFunction, Bounds, Candidate, Exploration, SearchSpace, SurrogateModel, Trial,
    TrialPhase, TrialStatus,
};
