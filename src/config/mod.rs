//! Declarative tuning configuration
//!
//! A YAML file with `search`, `model`, `training` and `data` sections, all
//! optional and defaulting to the reference run.
//!
//! ```yaml
//! search:
//!   seed: 42
//!   init_points: 10
//!   iterations: 50
//!   acquisition:
//!     kind: ucb
//!     kappa: 2.576
//! training:
//!   epochs: 10
//!   batch_size: 32
//! data:
//!   train: letters/train.safetensors
//!   validation_split: 0.2
//! ```

mod cli;
mod loader;
mod schema;
mod tune;
mod validate;

pub use cli::{
    apply_overrides, parse_args, AugmentArgs, Cli, Command, InfoArgs, TuneArgs, ValidateArgs,
};
pub use loader::load_config;
pub use schema::{DataConfig, TuneSpec};
pub use tune::{check_datasets, load_datasets, tune_from_spec, tune_from_yaml};
pub use validate::{validate_config, ValidationError};
