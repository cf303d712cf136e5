//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::TuneSpec;
use crate::model::Architecture;

/// Validate a tuning specification
///
/// Checks:
/// - Search bounds, budget and acquisition settings
/// - Model geometry yields non-empty stage outputs
/// - Epochs, batch size and validation split
/// - Data paths exist
pub fn validate_config(spec: &TuneSpec) -> Result<(), ValidationError> {
    spec.search.validate()?;
    Architecture::new(spec.model)?;
    spec.training.validate()?;

    if spec.data.train.as_os_str().is_empty() {
        return Err(ValidationError::MissingTrainData);
    }

    // Validate data paths (skip in tests where files may not exist)
    #[cfg(not(test))]
    {
        if !spec.data.train.exists() {
            return Err(ValidationError::TrainDataNotFound(
                spec.data.train.display().to_string(),
            ));
        }

        if let Some(val_path) = &spec.data.val {
            if !val_path.exists() {
                return Err(ValidationError::ValDataNotFound(val_path.display().to_string()));
            }
        }
    }

    if spec.data.val.is_none() {
        let split = spec.data.validation_split;
        if !(split > 0.0 && split < 1.0) {
            return Err(ValidationError::InvalidValidationSplit(split));
        }
    }

    Ok(())
}
