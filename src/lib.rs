//! # afinar
//!
//! Bayesian hyperparameter search for a fixed-topology convolutional
//! letter classifier.
//!
//! A Gaussian-process surrogate with an upper-confidence-bound acquisition
//! searches learning rate × L2 regularization strength. Each candidate is
//! turned into a thirteen-stage convolutional classifier by the
//! [`model::ModelFactory`], trained by a [`train::Trainer`], and scored by
//! validation accuracy.
//!
//! # Modules
//!
//! - [`optim::hpo`]: search space, surrogates, acquisition and the driver
//! - [`model`]: classifier topology, layers and the factory
//! - [`train`]: epoch trainer and the search objective
//! - [`data`]: safetensors image sets and WAV speed augmentation
//! - [`config`]: YAML tuning specification and CLI arguments
//! - [`cli`]: command handlers and output levels
//!
//! # Example
//!
//! ```
//! use afinar::optim::hpo::{Candidate, SearchConfig, SearchDriver};
//!
//! let config = SearchConfig { init_points: 3, iterations: 2, ..Default::default() };
//! let mut driver = SearchDriver::new(config)?;
//! let mut objective = |c: &Candidate| -> afinar::Result<f64> {
//!     Ok(-(c.learning_rate.log10() + 3.0).powi(2))
//! };
//! let report = driver.run(&mut objective)?;
//! assert_eq!(report.trials.len(), 5);
//! # Ok::<(), afinar::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod optim;
pub mod train;

pub use error::{ConfigurationError, Error, Result, TrainingFailure};
