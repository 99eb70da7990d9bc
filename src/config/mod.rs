//! Project configuration: brands, platforms, sources and build targets.
//!
//! The built-in configuration reproduces the classic multi-brand layout
//! (`web`, `ios`, `android`, `flutter`). A `tokens.toml` at the project root
//! overrides it key by key.
pub mod filter;
pub mod targets;
pub mod toml_loader;
pub mod validation;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::transforms::Registry;

use self::targets::{Target, TargetConfig};
use self::validation::ValidationWarning;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "tokens.toml";

const DEFAULTS: &str = include_str!("defaults.toml");

/// `tokens.toml` as written. Every key is optional so a project file can
/// override only what it needs.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    brands: Option<Vec<String>>,
    platforms: Option<Vec<String>>,
    sources: Option<Vec<String>>,
    templates_dir: Option<String>,
    #[serde(default)]
    transform_groups: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    platform_targets: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    targets: BTreeMap<String, TargetConfig>,
}

impl RawConfig {
    fn overlay(mut self, other: Self) -> Self {
        self.brands = other.brands.or(self.brands);
        self.platforms = other.platforms.or(self.platforms);
        self.sources = other.sources.or(self.sources);
        self.templates_dir = other.templates_dir.or(self.templates_dir);
        self.transform_groups.extend(other.transform_groups);
        self.platform_targets.extend(other.platform_targets);
        self.targets.extend(other.targets);
        self
    }
}

/// One (platform, brand) combination to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// Platform name.
    pub platform: String,
    /// Brand name.
    pub brand: String,
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.platform, self.brand)
    }
}

/// Validated configuration for one project.
#[derive(Debug)]
pub struct Config {
    /// Project root; every relative path is resolved against it.
    pub root: PathBuf,
    /// Brands in build order.
    pub brands: Vec<String>,
    /// Platforms in build order.
    pub platforms: Vec<String>,
    /// Source glob patterns, may contain `{brand}` and `{platform}`.
    pub sources: Vec<String>,
    /// Directory holding `*.template` files.
    pub templates_dir: PathBuf,
    /// Target names built for each platform, in order.
    pub platform_targets: BTreeMap<String, Vec<String>>,
    /// Targets by name.
    pub targets: BTreeMap<String, Target>,
    /// Transform groups, built-in plus configured.
    pub registry: Registry,
    /// Non-fatal problems found during validation.
    pub warnings: Vec<ValidationWarning>,
}

impl Config {
    /// Load `tokens.toml` from `root`, falling back to the built-in
    /// configuration for every key it does not set.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// validation fails.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let project: Option<RawConfig> = toml_loader::load_config(&root.join(CONFIG_FILE))?;
        Self::build(root, project.unwrap_or_default())
    }

    /// Build a configuration from TOML text layered over the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn from_toml(root: &Path, content: &str) -> Result<Self, ConfigError> {
        let project: RawConfig = toml_loader::parse_config(CONFIG_FILE, content)?;
        Self::build(root, project)
    }

    fn build(root: &Path, project: RawConfig) -> Result<Self, ConfigError> {
        let defaults: RawConfig = toml_loader::parse_config("<built-in defaults>", DEFAULTS)?;
        let raw = defaults.overlay(project);

        let mut registry = Registry::builtin().map_err(|source| ConfigError::TransformGroup {
            group: "<built-in>".to_string(),
            source,
        })?;
        for (group, transforms) in &raw.transform_groups {
            registry
                .register(group, transforms.as_slice())
                .map_err(|source| ConfigError::TransformGroup {
                    group: group.clone(),
                    source,
                })?;
        }

        let targets = raw
            .targets
            .iter()
            .map(|(name, target)| Ok((name.clone(), target.resolve(name, &registry)?)))
            .collect::<Result<BTreeMap<String, Target>, ConfigError>>()?;

        let mut config = Self {
            root: root.to_path_buf(),
            brands: raw.brands.unwrap_or_default(),
            platforms: raw.platforms.unwrap_or_default(),
            sources: raw.sources.unwrap_or_default(),
            templates_dir: root.join(raw.templates_dir.as_deref().unwrap_or("templates")),
            platform_targets: raw.platform_targets,
            targets,
            registry,
            warnings: Vec::new(),
        };
        config.warnings = validation::validate(&config)?;
        Ok(config)
    }

    /// Targets built for `platform`, in configured order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPlatform`] if the platform has no entry.
    pub fn targets_for(&self, platform: &str) -> Result<Vec<&Target>, ConfigError> {
        let names = self
            .platform_targets
            .get(platform)
            .ok_or_else(|| ConfigError::UnknownPlatform(platform.to_string()))?;
        names
            .iter()
            .map(|name| {
                self.targets
                    .get(name)
                    .ok_or_else(|| ConfigError::UnknownTarget {
                        platform: platform.to_string(),
                        target: name.clone(),
                    })
            })
            .collect()
    }

    /// The (platform, brand) pairs to build, platforms outermost.
    ///
    /// Empty selections mean "all configured".
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPlatform`] or [`ConfigError::UnknownBrand`]
    /// for a selection that is not configured.
    pub fn pairs(&self, platforms: &[String], brands: &[String]) -> Result<Vec<Pair>, ConfigError> {
        if let Some(unknown) = platforms
            .iter()
            .find(|p| !self.platform_targets.contains_key(p.as_str()))
        {
            return Err(ConfigError::UnknownPlatform(unknown.clone()));
        }
        if let Some(unknown) = brands.iter().find(|b| !self.brands.contains(*b)) {
            return Err(ConfigError::UnknownBrand(unknown.clone()));
        }

        let platforms = if platforms.is_empty() {
            self.platforms.as_slice()
        } else {
            platforms
        };
        let brands = if brands.is_empty() {
            self.brands.as_slice()
        } else {
            brands
        };

        Ok(platforms
            .iter()
            .flat_map(|platform| {
                brands.iter().map(move |brand| Pair {
                    platform: platform.clone(),
                    brand: brand.clone(),
                })
            })
            .collect())
    }

    /// Source patterns for one pair.
    #[must_use]
    pub fn sources_for(&self, pair: &Pair) -> Vec<String> {
        self.sources
            .iter()
            .map(|s| interpolate(s, pair))
            .collect()
    }
}

/// Replace `{brand}` and `{platform}` in `template`.
#[must_use]
pub fn interpolate(template: &str, pair: &Pair) -> String {
    template
        .replace("{brand}", &pair.brand)
        .replace("{platform}", &pair.platform)
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
    use crate::formats::Format;

    fn pair(platform: &str, brand: &str) -> Pair {
        Pair {
            platform: platform.to_string(),
            brand: brand.to_string(),
        }
    }

    #[test]
    fn defaults_mirror_the_classic_layout() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.brands, vec!["brand#1", "brand#2", "brand#3"]);
        assert_eq!(config.platforms, vec!["web", "ios", "android", "flutter"]);

        let web = config.targets_for("web").unwrap();
        let web: Vec<_> = web.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(web, vec!["web/js", "web/json", "web/scss", "styleguide"]);

        let ios = config.targets_for("ios").unwrap();
        assert_eq!(ios[0].files.len(), 2);
        assert_eq!(ios[0].files[1].format, Format::IosPlist);
        assert!(!ios[0].files[1].filter.is_empty());
    }

    #[test]
    fn project_file_overrides_keys() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_toml(
            dir.path(),
            r#"
            brands = ["acme"]
            platforms = ["web"]
            "#,
        )
        .unwrap();
        assert_eq!(config.brands, vec!["acme"]);
        assert_eq!(config.platforms, vec!["web"]);
        assert!(config.targets.contains_key("web/scss"));
    }

    #[test]
    fn project_targets_replace_defaults_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_toml(
            dir.path(),
            r#"
            [targets."web/scss"]
            transforms = ["name/cti/snake"]
            build_path = "dist/{brand}/"

            [[targets."web/scss".files]]
            destination = "vars.scss"
            format = "scss/variables"
            "#,
        )
        .unwrap();
        let scss = &config.targets["web/scss"];
        assert_eq!(scss.build_path, "dist/{brand}/");
        assert_eq!(scss.files[0].destination, "vars.scss");
    }

    #[test]
    fn custom_transform_groups_are_registered() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_toml(
            dir.path(),
            r#"
            [transform_groups]
            tokens-docs = ["attribute/cti", "name/cti/snake"]

            [targets."web/scss"]
            transform_group = "tokens-docs"
            build_path = "out/"
            "#,
        )
        .unwrap();
        assert_eq!(config.targets["web/scss"].transforms.len(), 2);
    }

    #[test]
    fn custom_group_with_unknown_transform_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_toml(
            dir.path(),
            "[transform_groups]\nbroken = [\"size/em\"]\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::TransformGroup { group, .. } if group == "broken"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_toml(dir.path(), "brand = [\"x\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSyntax { .. }));
    }

    #[test]
    fn pairs_iterate_platforms_then_brands() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_toml(
            dir.path(),
            "brands = [\"a\", \"b\"]\nplatforms = [\"web\", \"ios\"]\n",
        )
        .unwrap();
        let pairs = config.pairs(&[], &[]).unwrap();
        assert_eq!(
            pairs,
            vec![
                pair("web", "a"),
                pair("web", "b"),
                pair("ios", "a"),
                pair("ios", "b")
            ]
        );

        let subset = config
            .pairs(&["ios".to_string()], &["b".to_string()])
            .unwrap();
        assert_eq!(subset, vec![pair("ios", "b")]);
    }

    #[test]
    fn unknown_selection_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(matches!(
            config.pairs(&["tv".to_string()], &[]),
            Err(ConfigError::UnknownPlatform(p)) if p == "tv"
        ));
        assert!(matches!(
            config.pairs(&[], &["brand#9".to_string()]),
            Err(ConfigError::UnknownBrand(b)) if b == "brand#9"
        ));
    }

    #[test]
    fn interpolation_fills_brand_and_platform() {
        assert_eq!(
            interpolate("output/styleguide/{platform}_{brand}.json", &pair("ios", "brand#2")),
            "output/styleguide/ios_brand#2.json"
        );
    }

    #[test]
    fn sources_are_interpolated_per_pair() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(
            config.sources_for(&pair("web", "acme")),
            vec!["tokens/brands/acme/*.json", "tokens/globals/**/*.json"]
        );
    }
}
