//! Training and scoring of factory-built classifiers
//!
//! [`EpochTrainer`] runs a seeded, fixed-epoch mini-batch loop and scores
//! the result by validation accuracy. [`ClassifierObjective`] joins a
//! [`crate::model::ModelFactory`] and a [`Trainer`] into the search driver's
//! objective.
//!
//! # Example
//!
//! ```no_run
//! use afinar::data::ImageDataset;
//! use afinar::model::ModelFactory;
//! use afinar::optim::hpo::{SearchConfig, SearchDriver};
//! use afinar::train::{ClassifierObjective, EpochTrainer, TrainConfig};
//!
//! let train = ImageDataset::load("train.safetensors")?;
//! let (train, val) = train.split(0.2, 42)?;
//! let trainer = EpochTrainer::new(TrainConfig::default(), train, val);
//! let mut objective = ClassifierObjective::new(ModelFactory::default(), trainer);
//!
//! let mut driver = SearchDriver::new(SearchConfig::default())?;
//! let report = driver.run(&mut objective)?;
//! println!("{report}");
//! # Ok::<(), afinar::Error>(())
//! ```

mod config;
mod epoch_trainer;
mod objective;

pub use config::TrainConfig;
pub use epoch_trainer::{EpochTrainer, TrainResult, Trainer};
pub use objective::ClassifierObjective;
