//! Loading tuning specifications from YAML

use std::fs;
use std::path::Path;

use super::schema::TuneSpec;
use crate::error::{Error, Result};

/// Read and parse a YAML tuning specification
///
/// Parsing only; call [`crate::config::validate_config`] after applying any
/// command-line overrides.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<TuneSpec> {
    let path = config_path.as_ref();
    let yaml_content = fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read config file {}: {e}", path.display()),
        ))
    })?;

    serde_yaml::from_str(&yaml_content)
        .map_err(|e| Error::Serialization(format!("Failed to parse YAML config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_config() {
        let yaml = r"
search:
  init_points: 2
  iterations: 3
data:
  train: train.safetensors
";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let spec = load_config(file.path()).unwrap();
        assert_eq!(spec.search.budget(), 5);
        assert_eq!(spec.data.train.to_str(), Some("train.safetensors"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config("/nonexistent/tune.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("/nonexistent/tune.yaml"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"search: [unclosed").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_load_does_not_validate() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"search:\n  init_points: 0\n  iterations: 0\n").unwrap();
        let spec = load_config(file.path()).unwrap();
        assert_eq!(spec.search.budget(), 0);
    }
}
