//! Cross-checks between platforms, targets and output paths.
//!
//! Problems that make a build impossible are returned as [`ConfigError`];
//! problems that only make it surprising are collected as warnings.
use std::collections::BTreeMap;

use crate::error::ConfigError;

use super::{Config, Pair, interpolate};

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration section (e.g., "targets", "templates").
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}': {}", self.source, self.item, self.message)
    }
}

/// Validate `config`.
///
/// # Errors
///
/// - [`ConfigError::UnknownPlatform`] if a built platform has no targets entry
/// - [`ConfigError::EmptyPlatform`] if a platform maps to no targets
/// - [`ConfigError::UnknownTarget`] if a platform names an undefined target
/// - [`ConfigError::OutputCollision`] if two files would write the same path
pub fn validate(config: &Config) -> Result<Vec<ValidationWarning>, ConfigError> {
    for platform in &config.platforms {
        if !config.platform_targets.contains_key(platform) {
            return Err(ConfigError::UnknownPlatform(platform.clone()));
        }
    }

    for (platform, names) in &config.platform_targets {
        if names.is_empty() {
            return Err(ConfigError::EmptyPlatform(platform.clone()));
        }
        if let Some(missing) = names.iter().find(|n| !config.targets.contains_key(*n)) {
            return Err(ConfigError::UnknownTarget {
                platform: platform.clone(),
                target: missing.clone(),
            });
        }
    }

    check_collisions(config)?;

    let mut warnings = unused_targets(config);
    warnings.extend(missing_templates(config));
    Ok(warnings)
}

/// Every output path of every built platform, with `{platform}` filled in
/// and `{brand}` left as written, must be claimed by one file only.
fn check_collisions(config: &Config) -> Result<(), ConfigError> {
    let mut claimed: BTreeMap<String, String> = BTreeMap::new();

    for platform in &config.platforms {
        let pair = Pair {
            platform: platform.clone(),
            brand: "{brand}".to_string(),
        };
        for target in config.targets_for(platform)? {
            for file in &target.files {
                let path = format!(
                    "{}/{}",
                    interpolate(&target.build_path, &pair).trim_end_matches('/'),
                    interpolate(&file.destination, &pair)
                );
                let owner = format!("{} ({platform})", target.name);
                if let Some(first) = claimed.get(&path) {
                    return Err(ConfigError::OutputCollision {
                        path,
                        first: first.clone(),
                        second: owner,
                    });
                }
                claimed.insert(path, owner);
            }
        }
    }
    Ok(())
}

fn unused_targets(config: &Config) -> Vec<ValidationWarning> {
    config
        .targets
        .keys()
        .filter(|name| {
            !config
                .platforms
                .iter()
                .filter_map(|p| config.platform_targets.get(p))
                .any(|names| names.contains(*name))
        })
        .map(|name| ValidationWarning::new("targets", name, "not built by any platform"))
        .collect()
}

fn missing_templates(config: &Config) -> Vec<ValidationWarning> {
    let mut seen = Vec::new();
    for platform in &config.platforms {
        let Some(names) = config.platform_targets.get(platform) else {
            continue;
        };
        for target in names.iter().filter_map(|n| config.targets.get(n)) {
            for file in &target.files {
                if let Some(template) = file.format.template_file()
                    && !seen.contains(&template)
                    && !config.templates_dir.join(template).is_file()
                {
                    seen.push(template);
                }
            }
        }
    }
    seen.into_iter()
        .map(|template| {
            ValidationWarning::new(
                "templates",
                template,
                format!("not found in {}", config.templates_dir.display()),
            )
        })
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::path::Path;

    fn load(src: &str) -> Result<Config, ConfigError> {
        Config::from_toml(Path::new("/nonexistent"), src)
    }

    #[test]
    fn defaults_are_valid() {
        let config = load("").unwrap();
        assert!(
            config
                .warnings
                .iter()
                .all(|w| w.source == "templates"),
            "only missing templates expected, got {:?}",
            config.warnings
        );
        assert_eq!(config.warnings.len(), 6);
    }

    #[test]
    fn built_platform_without_entry_is_unknown() {
        let err = load("platforms = [\"tv\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlatform(p) if p == "tv"));
    }

    #[test]
    fn empty_platform_is_rejected() {
        let err = load("[platform_targets]\nweb = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPlatform(p) if p == "web"));
    }

    #[test]
    fn undefined_target_is_rejected() {
        let err = load("[platform_targets]\nios = [\"ios\", \"watchos\"]\n").unwrap_err();
        match err {
            ConfigError::UnknownTarget { platform, target } => {
                assert_eq!(platform, "ios");
                assert_eq!(target, "watchos");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn colliding_outputs_are_rejected() {
        let err = load(
            r#"
            [targets."web/json"]
            transform_group = "tokens-json"
            build_path = "output/web/{brand}"

            [[targets."web/json".files]]
            destination = "tokens.scss"
            format = "json/flat"
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::OutputCollision {
                path,
                first,
                second,
            } => {
                assert_eq!(path, "output/web/{brand}/tokens.scss");
                assert_eq!(first, "web/json (web)");
                assert_eq!(second, "web/scss (web)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn shared_target_without_platform_placeholder_collides() {
        let err = load(
            r#"
            [targets.styleguide]
            transform_group = "styleguide"
            build_path = "output/styleguide/"

            [[targets.styleguide.files]]
            destination = "{brand}.json"
            format = "json/flat"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::OutputCollision { .. }));
    }

    #[test]
    fn unused_target_is_a_warning() {
        let config = load("platforms = [\"web\"]\n").unwrap();
        let unused: Vec<_> = config
            .warnings
            .iter()
            .filter(|w| w.source == "targets")
            .map(|w| w.item.as_str())
            .collect();
        assert_eq!(unused, vec!["android", "flutter", "ios"]);
    }

    #[test]
    fn present_templates_do_not_warn() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("templates")).unwrap();
        std::fs::write(dir.path().join("templates/ios-plist.template"), "").unwrap();
        let config = Config::from_toml(dir.path(), "platforms = [\"ios\"]\n").unwrap();
        assert!(config.warnings.iter().all(|w| w.source != "templates"));
    }
}
