//! YAML schema for a tuning run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::model::ModelConfig;
use crate::optim::hpo::SearchConfig;
use crate::train::TrainConfig;

/// Complete tuning specification
///
/// Every section is optional in YAML; omitted values fall back to the
/// reference configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TuneSpec {
    /// Search bounds, budget and acquisition settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Classifier geometry
    #[serde(default)]
    pub model: ModelConfig,

    /// Per-trial training loop
    #[serde(default)]
    pub training: TrainConfig,

    /// Dataset locations
    #[serde(default)]
    pub data: DataConfig,
}

/// Data configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Training set (safetensors with `images` and `labels`)
    #[serde(default)]
    pub train: PathBuf,

    /// Optional validation set; when absent the training set is split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val: Option<PathBuf>,

    /// Share of the training set held out when `val` is absent
    #[serde(default = "default_validation_split")]
    pub validation_split: f64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { train: PathBuf::new(), val: None, validation_split: default_validation_split() }
    }
}

fn default_validation_split() -> f64 {
    0.2
}
