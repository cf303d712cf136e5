use super::*;
use crate::config::{DataConfig, TuneSpec};
use crate::error::{ConfigurationError, Error};
use crate::optim::hpo::Bounds;
use std::path::PathBuf;

fn valid_spec() -> TuneSpec {
    TuneSpec {
        data: DataConfig { train: PathBuf::from("train.safetensors"), ..Default::default() },
        ..Default::default()
    }
}

#[test]
fn test_reference_spec_is_valid() {
    assert!(validate_config(&valid_spec()).is_ok());
}

#[test]
fn test_missing_train_path() {
    let spec = TuneSpec::default();
    assert!(matches!(validate_config(&spec), Err(ValidationError::MissingTrainData)));
}

#[test]
fn test_empty_budget() {
    let mut spec = valid_spec();
    spec.search.init_points = 0;
    spec.search.iterations = 0;
    assert!(matches!(
        validate_config(&spec),
        Err(ValidationError::Configuration(ConfigurationError::EmptyBudget))
    ));
}

#[test]
fn test_inverted_bounds() {
    let mut spec = valid_spec();
    spec.search.space.learning_rate = Bounds::log(1e-2, 1e-5);
    let err = validate_config(&spec).unwrap_err();
    assert!(err.to_string().contains("learning_rate"));
}

#[test]
fn test_impossible_geometry() {
    let mut spec = valid_spec();
    spec.model.image_size = 8;
    assert!(matches!(
        validate_config(&spec),
        Err(ValidationError::Configuration(ConfigurationError::InvalidModel(_)))
    ));
}

#[test]
fn test_zero_batch_size() {
    let mut spec = valid_spec();
    spec.training.batch_size = 0;
    assert!(validate_config(&spec).unwrap_err().to_string().contains("batch_size"));
}

#[test]
fn test_validation_split_only_checked_without_val_path() {
    let mut spec = valid_spec();
    spec.data.validation_split = 1.5;
    assert!(matches!(
        validate_config(&spec),
        Err(ValidationError::InvalidValidationSplit(_))
    ));

    spec.data.val = Some(PathBuf::from("val.safetensors"));
    assert!(validate_config(&spec).is_ok());
}

#[test]
fn test_into_crate_error() {
    let err: Error = ValidationError::TrainDataNotFound("x".into()).into();
    assert!(matches!(err, Error::Configuration(ConfigurationError::PathNotFound(_))));
    let err: Error = ValidationError::InvalidValidationSplit(2.0).into();
    assert!(!err.is_recoverable());
}
