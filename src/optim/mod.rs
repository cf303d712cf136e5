//! Optimizers for training and hyperparameter search

mod adam;
pub mod hpo;
mod optimizer;

pub use adam::{Adam, AdamConfig};
pub use hpo::{
    AcquisitionFunction, Candidate, SearchConfig, SearchDriver, SearchReport, SearchSpace,
    SurrogateModel, Trial, TrialStatus,
};
pub use optimizer::{Optimizer, Param};
