//! Build targets: one transform list, one output directory, several files.
use serde::Deserialize;

use crate::error::{ConfigError, TokenError};
use crate::formats::Format;
use crate::transforms::{Registry, Transform};

use super::filter::Filter;

/// A `[targets.<name>]` table as written in `tokens.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Named transform group; ignored when `transforms` is non-empty.
    pub transform_group: Option<String>,
    /// Explicit transform list.
    #[serde(default)]
    pub transforms: Vec<String>,
    /// Output directory, relative to the project root.
    pub build_path: String,
    /// Prefix prepended by name transforms.
    pub prefix: Option<String>,
    /// Files rendered by this target.
    #[serde(default)]
    pub files: Vec<FileConfig>,
}

/// A `[[targets.<name>.files]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// File name inside the build path; may contain `{brand}`/`{platform}`.
    pub destination: String,
    /// Registered format name.
    pub format: String,
    /// Class or variable name for formats that emit one.
    pub class_name: Option<String>,
    /// Constraints a token must satisfy to be included.
    #[serde(default)]
    pub filter: Filter,
}

/// A validated target.
#[derive(Debug, Clone)]
pub struct Target {
    /// Target name (`web/js`, `ios`, ...).
    pub name: String,
    /// Transforms applied in order.
    pub transforms: Vec<Transform>,
    /// Output directory template.
    pub build_path: String,
    /// Name prefix.
    pub prefix: Option<String>,
    /// Files rendered by this target.
    pub files: Vec<FileSpec>,
}

/// A validated output file.
#[derive(Debug, Clone)]
pub struct FileSpec {
    /// Destination template.
    pub destination: String,
    /// Output format.
    pub format: Format,
    /// Class or variable name.
    pub class_name: Option<String>,
    /// Token filter.
    pub filter: Filter,
}

impl TargetConfig {
    /// Resolve names into typed transforms and formats.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Target`] wrapping the first unknown transform,
    /// transform group or format.
    pub fn resolve(&self, name: &str, registry: &Registry) -> Result<Target, ConfigError> {
        let wrap = |source: TokenError| ConfigError::Target {
            target: name.to_string(),
            source,
        };

        let transforms = if self.transforms.is_empty() {
            match &self.transform_group {
                Some(group) => registry.group(group).map_err(wrap)?.to_vec(),
                None => Vec::new(),
            }
        } else {
            self.transforms
                .iter()
                .map(|t| t.parse())
                .collect::<Result<Vec<Transform>, _>>()
                .map_err(wrap)?
        };

        let files = self
            .files
            .iter()
            .map(|f| -> Result<FileSpec, ConfigError> {
                Ok(FileSpec {
                    destination: f.destination.clone(),
                    format: f.format.parse().map_err(wrap)?,
                    class_name: f.class_name.clone(),
                    filter: f.filter.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Target {
            name: name.to_string(),
            transforms,
            build_path: self.build_path.clone(),
            prefix: self.prefix.clone(),
            files,
        })
    }
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

    fn target(src: &str) -> TargetConfig {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn group_transforms_are_resolved() {
        let registry = Registry::builtin().unwrap();
        let t = target(
            r#"
            transform_group = "tokens-ios"
            build_path = "output/ios/{brand}/"
            prefix = "token"
            files = [{ destination = "tokens-all.plist", format = "ios/plist" }]
            "#,
        )
        .resolve("ios", &registry)
        .unwrap();
        assert_eq!(
            t.transforms,
            vec![
                Transform::AttributeCti,
                Transform::NameCamel,
                Transform::SizePxToPt
            ]
        );
        assert_eq!(t.files[0].format, Format::IosPlist);
        assert!(t.files[0].filter.is_empty());
    }

    #[test]
    fn explicit_transforms_win_over_group() {
        let registry = Registry::builtin().unwrap();
        let t = target(
            r#"
            transform_group = "tokens-ios"
            transforms = ["name/cti/snake"]
            build_path = "out/"
            "#,
        )
        .resolve("custom", &registry)
        .unwrap();
        assert_eq!(t.transforms, vec![Transform::NameSnake]);
    }

    #[test]
    fn unknown_format_is_reported_with_target() {
        let registry = Registry::builtin().unwrap();
        let err = target(
            r#"
            build_path = "out/"
            files = [{ destination = "a.txt", format = "text/plain" }]
            "#,
        )
        .resolve("docs", &registry)
        .unwrap_err();
        match err {
            ConfigError::Target { target, source } => {
                assert_eq!(target, "docs");
                assert!(matches!(source, TokenError::UnknownFormat(f) if f == "text/plain"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_group_is_reported_with_target() {
        let registry = Registry::builtin().unwrap();
        let err = target("transform_group = \"tokens-tv\"\nbuild_path = \"out/\"\n")
            .resolve("tv", &registry)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Target {
                source: TokenError::UnknownTransformGroup(_),
                ..
            }
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed = toml::from_str::<TargetConfig>("build_path = \"out/\"\nbuildPath = \"x\"\n");
        assert!(parsed.is_err());
    }
}
