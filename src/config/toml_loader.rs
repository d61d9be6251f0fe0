//! TOML settings file loading.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Deserialize a TOML file into `T`.
///
/// A missing file is not an error: it yields whatever `T` deserializes to
/// from an empty document, so types with `#[serde(default)]` get their
/// defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, and
/// [`ConfigError::Parse`] if its contents are not valid for `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = if path.exists() {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        tracing::debug!("no settings file at {}, using defaults", path.display());
        String::new()
    };

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq, Eq)]
    #[serde(default)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s: Sample = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(s, Sample::default());
    }

    #[test]
    fn reads_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.toml");
        std::fs::write(&path, "name = \"x\"\ncount = 3\n").unwrap();
        let s: Sample = load_config(&path).unwrap();
        assert_eq!(s.name, "x");
        assert_eq!(s.count, 3);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.toml");
        std::fs::write(&path, "name = [\n").unwrap();
        let err = load_config::<Sample>(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
