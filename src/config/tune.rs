//! Main entry points for YAML-driven tuning

use std::path::Path;

use super::loader::load_config;
use super::schema::{DataConfig, TuneSpec};
use super::validate::validate_config;
use crate::cli::LogLevel;
use crate::data::ImageDataset;
use crate::error::{ConfigurationError, Result};
use crate::model::{ModelConfig, ModelFactory};
use crate::optim::hpo::{ProgressReporter, SearchDriver, SearchReport};
use crate::train::{ClassifierObjective, EpochTrainer};

/// Load the training set and either the validation file or a seeded split
pub fn load_datasets(data: &DataConfig, seed: u64) -> Result<(ImageDataset, ImageDataset)> {
    let train = ImageDataset::load(&data.train)?;
    match &data.val {
        Some(val) => Ok((train, ImageDataset::load(val)?)),
        None => train.split(data.validation_split, seed),
    }
}

/// Check that both sets are non-empty and fit the configured geometry
///
/// A mismatch here would fail every trial the same way, so it is reported
/// as a configuration error before the search starts.
pub fn check_datasets(
    model: &ModelConfig,
    train: &ImageDataset,
    validation: &ImageDataset,
) -> std::result::Result<(), ConfigurationError> {
    for (field, set) in [("data.train", train), ("data.val", validation)] {
        if set.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                field,
                message: "dataset has no samples".to_string(),
            });
        }
        if set.image_shape() != model.input_shape() {
            return Err(ConfigurationError::InvalidValue {
                field,
                message: format!(
                    "images are {:?} but the model expects {:?}",
                    set.image_shape(),
                    model.input_shape()
                ),
            });
        }
        if set.num_classes() > model.classes {
            return Err(ConfigurationError::InvalidValue {
                field,
                message: format!(
                    "label {} out of range for {} classes",
                    set.num_classes() - 1,
                    model.classes
                ),
            });
        }
    }
    Ok(())
}

/// Validate `spec`, load its data and run the full search
///
/// Progress is printed at `level`; the report is returned, not printed.
pub fn tune_from_spec(spec: &TuneSpec, level: LogLevel) -> Result<SearchReport> {
    validate_config(spec)?;
    let (train, validation) = load_datasets(&spec.data, spec.training.seed)?;
    check_datasets(&spec.model, &train, &validation)?;
    let factory = ModelFactory::new(spec.model)?.with_space(spec.search.space)?;
    let trainer = EpochTrainer::new(spec.training, train, validation).with_log_level(level);
    let mut objective = ClassifierObjective::new(factory, trainer);

    let mut driver = SearchDriver::new(spec.search.clone())?;
    driver.add_callback(Box::new(ProgressReporter::new(level)));
    driver.run(&mut objective)
}

/// Load, validate and run a YAML tuning specification
///
/// # Example
///
/// ```no_run
/// use afinar::cli::LogLevel;
/// use afinar::config::tune_from_yaml;
///
/// let report = tune_from_yaml("tune.yaml", LogLevel::Normal)?;
/// println!("{report}");
/// # Ok::<(), afinar::Error>(())
/// ```
pub fn tune_from_yaml<P: AsRef<Path>>(config_path: P, level: LogLevel) -> Result<SearchReport> {
    let spec = load_config(config_path)?;
    tune_from_spec(&spec, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::Array4;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_dataset(dir: &TempDir, name: &str, n: usize) -> PathBuf {
        write_sized(dir, name, n, 12, 2)
    }

    fn write_sized(dir: &TempDir, name: &str, n: usize, size: usize, classes: usize) -> PathBuf {
        let images =
            Array4::from_shape_fn((n, size, size, 1), |(i, y, x, _)| ((i + y * x) % 7) as f32);
        let labels = (0..n).map(|i| i % classes).collect();
        let path = dir.path().join(name);
        ImageDataset::new(images, labels).unwrap().save(&path).unwrap();
        path
    }

    fn small_spec() -> TuneSpec {
        let mut spec = TuneSpec::default();
        spec.model.image_size = 12;
        spec.model.channels = 1;
        spec.model.classes = 2;
        spec.model.hidden_units = 4;
        spec.model.bottleneck_units = 4;
        spec.training.epochs = 1;
        spec.training.batch_size = 4;
        spec.search.init_points = 3;
        spec.search.iterations = 3;
        spec.search.acquisition_samples = 50;
        spec
    }

    fn assert_data_error(spec: &TuneSpec, field: &str) {
        match tune_from_spec(spec, LogLevel::Quiet) {
            Err(Error::Configuration(ConfigurationError::InvalidValue { field: f, .. })) => {
                assert_eq!(f, field);
            }
            other => panic!("expected configuration error for {field}, got {other:?}"),
        }
    }

    #[test]
    fn test_load_datasets_split() {
        let dir = TempDir::new().unwrap();
        let data = DataConfig {
            train: write_dataset(&dir, "train.safetensors", 10),
            val: None,
            validation_split: 0.2,
        };
        let (train, val) = load_datasets(&data, 1).unwrap();
        assert_eq!((train.len(), val.len()), (8, 2));
    }

    #[test]
    fn test_load_datasets_separate_file() {
        let dir = TempDir::new().unwrap();
        let data = DataConfig {
            train: write_dataset(&dir, "train.safetensors", 6),
            val: Some(write_dataset(&dir, "val.safetensors", 3)),
            validation_split: 0.2,
        };
        let (train, val) = load_datasets(&data, 1).unwrap();
        assert_eq!((train.len(), val.len()), (6, 3));
    }

    #[test]
    fn test_tune_small_search() {
        let dir = TempDir::new().unwrap();
        let mut spec = small_spec();
        spec.data.train = write_dataset(&dir, "train.safetensors", 8);
        spec.data.val = Some(write_dataset(&dir, "val.safetensors", 4));
        spec.search.init_points = 2;
        spec.search.iterations = 1;

        let report = tune_from_spec(&spec, LogLevel::Quiet).unwrap();
        assert_eq!(report.trials.len(), 3);
        assert!((0.0..=1.0).contains(&report.best.score));
        assert!(spec.search.space.learning_rate.contains(report.best.learning_rate));
    }

    #[test]
    fn test_tune_rejects_invalid_spec_before_loading() {
        let mut spec = TuneSpec::default();
        spec.data.train = PathBuf::from("missing.safetensors");
        spec.search.init_points = 0;
        spec.search.iterations = 0;
        assert!(matches!(tune_from_spec(&spec, LogLevel::Quiet), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_image_size_mismatch_fails_before_search() {
        let dir = TempDir::new().unwrap();
        let mut spec = small_spec();
        spec.data.train = write_sized(&dir, "train.safetensors", 8, 16, 2);
        spec.data.val = Some(write_dataset(&dir, "val.safetensors", 4));
        assert_data_error(&spec, "data.train");
    }

    #[test]
    fn test_split_leaving_empty_validation_fails_before_search() {
        let dir = TempDir::new().unwrap();
        let mut spec = small_spec();
        spec.data.train = write_dataset(&dir, "train.safetensors", 2);
        spec.data.validation_split = 0.2;
        assert_data_error(&spec, "data.val");
    }

    #[test]
    fn test_label_beyond_classes_fails_before_search() {
        let dir = TempDir::new().unwrap();
        let mut spec = small_spec();
        spec.data.train = write_dataset(&dir, "train.safetensors", 8);
        spec.data.val = Some(write_sized(&dir, "val.safetensors", 4, 12, 3));
        assert_data_error(&spec, "data.val");
    }

    #[test]
    fn test_check_datasets_accepts_matching_sets() {
        let dir = TempDir::new().unwrap();
        let train = ImageDataset::load(write_dataset(&dir, "train.safetensors", 4)).unwrap();
        let val = ImageDataset::load(write_dataset(&dir, "val.safetensors", 2)).unwrap();
        assert!(check_datasets(&small_spec().model, &train, &val).is_ok());
    }
}
