//! TOML configuration file parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Load and deserialize a TOML file.
///
/// Returns `Ok(None)` when the file does not exist, so callers can fall back
/// to built-in defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, and
/// [`ConfigError::InvalidSyntax`] if it does not parse into `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&path.display().to_string(), &content).map(Some)
}

/// Deserialize TOML text. `file` names the source in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSyntax`] if `content` does not parse into `T`.
pub fn parse_config<T: DeserializeOwned>(file: &str, content: &str) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::InvalidSyntax {
        file: file.to_string(),
        message: e.message().to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        brands: Vec<String>,
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<Sample> = load_config(&dir.path().join("tokens.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn present_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.toml");
        std::fs::write(&path, "brands = [\"acme\"]\n").unwrap();
        let loaded: Sample = load_config(&path).unwrap().unwrap();
        assert_eq!(loaded.brands, vec!["acme"]);
    }

    #[test]
    fn invalid_toml_names_the_file() {
        let err = parse_config::<Sample>("tokens.toml", "brands = [").unwrap_err();
        match err {
            ConfigError::InvalidSyntax { file, .. } => assert_eq!(file, "tokens.toml"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
