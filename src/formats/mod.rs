//! Output formats and the renderer that dispatches to them.
//!
//! Formats form a closed set: structured formats serialize tokens directly,
//! template formats bind tokens into a template file read from the project's
//! templates directory.
pub mod flavor;
pub mod javascript;
pub mod json;
pub mod scss;
pub mod template;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::TokenError;
use crate::tokens::Token;

use self::flavor::Flavor;
use self::template::{Template, TemplateContext};

/// A registered output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `json/flat`
    JsonFlat,
    /// `javascript/es6`
    JavascriptEs6,
    /// `javascript/module`
    JavascriptModule,
    /// `javascript/object`
    JavascriptObject,
    /// `scss/variables`
    ScssVariables,
    /// `ios/plist`
    IosPlist,
    /// `android/xml`
    AndroidXml,
    /// `android/colors`
    AndroidColors,
    /// `flutter/class`
    FlutterClass,
    /// `flutter/dimensions`
    FlutterDimensions,
    /// `flutter/radii`
    FlutterRadii,
    /// `flutter/textStyles`
    FlutterTextStyles,
}

impl Format {
    /// Every registered format.
    pub const ALL: &[Self] = &[
        Self::JsonFlat,
        Self::JavascriptEs6,
        Self::JavascriptModule,
        Self::JavascriptObject,
        Self::ScssVariables,
        Self::IosPlist,
        Self::AndroidXml,
        Self::AndroidColors,
        Self::FlutterClass,
        Self::FlutterDimensions,
        Self::FlutterRadii,
        Self::FlutterTextStyles,
    ];

    /// Registered name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::JsonFlat => "json/flat",
            Self::JavascriptEs6 => "javascript/es6",
            Self::JavascriptModule => "javascript/module",
            Self::JavascriptObject => "javascript/object",
            Self::ScssVariables => "scss/variables",
            Self::IosPlist => "ios/plist",
            Self::AndroidXml => "android/xml",
            Self::AndroidColors => "android/colors",
            Self::FlutterClass => "flutter/class",
            Self::FlutterDimensions => "flutter/dimensions",
            Self::FlutterRadii => "flutter/radii",
            Self::FlutterTextStyles => "flutter/textStyles",
        }
    }

    /// Template file backing this format, if it is template-based.
    #[must_use]
    pub const fn template_file(self) -> Option<&'static str> {
        match self {
            Self::IosPlist => Some("ios-plist.template"),
            Self::AndroidXml | Self::AndroidColors => Some("android-xml.template"),
            Self::FlutterClass => Some("class-dart.template"),
            Self::FlutterDimensions => Some("dimensions-dart.template"),
            Self::FlutterRadii => Some("radii-dart.template"),
            Self::FlutterTextStyles => Some("text-styles-dart.template"),
            Self::JsonFlat
            | Self::JavascriptEs6
            | Self::JavascriptModule
            | Self::JavascriptObject
            | Self::ScssVariables => None,
        }
    }

    const fn flavor(self) -> Flavor {
        match self {
            Self::AndroidXml | Self::AndroidColors => Flavor::AndroidXml,
            Self::FlutterClass
            | Self::FlutterDimensions
            | Self::FlutterRadii
            | Self::FlutterTextStyles => Flavor::Dart,
            _ => Flavor::Plist,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| TokenError::UnknownFormat(s.to_string()))
    }
}

/// Per-file values bound into an artifact.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Brand being built.
    pub brand: &'a str,
    /// Platform being built (`web`, `ios`, ...).
    pub platform: &'a str,
    /// Target name (`web/js`, `styleguide`, ...).
    pub target: &'a str,
    /// Destination file name after interpolation.
    pub destination: &'a str,
    /// `class_name` parameter of the output file.
    pub class_name: Option<&'a str>,
}

/// Renders token sets into artifact text.
#[derive(Debug, Clone)]
pub struct Renderer {
    templates_dir: PathBuf,
}

impl Renderer {
    /// Create a renderer reading templates from `templates_dir`.
    #[must_use]
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Directory templates are read from.
    #[must_use]
    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Render `tokens` in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::TemplateRender`] if a template file is missing,
    /// malformed or names an unknown placeholder, and propagates serialization
    /// failures.
    pub fn render(
        &self,
        format: Format,
        tokens: &[Token],
        ctx: &RenderContext<'_>,
    ) -> Result<String, TokenError> {
        match format {
            Format::JsonFlat => json::flat(tokens),
            Format::JavascriptEs6 => Ok(javascript::es6(tokens)),
            Format::JavascriptModule => Ok(javascript::module(tokens)),
            Format::JavascriptObject => Ok(javascript::object(
                tokens,
                ctx.class_name.unwrap_or("_tokens"),
            )),
            Format::ScssVariables => Ok(scss::variables(tokens)),
            _ => self.render_template(format, tokens, ctx),
        }
    }

    fn render_template(
        &self,
        format: Format,
        tokens: &[Token],
        ctx: &RenderContext<'_>,
    ) -> Result<String, TokenError> {
        let file = format
            .template_file()
            .ok_or_else(|| TokenError::UnknownFormat(format.name().to_string()))?;
        let template = self.load_template(file)?;

        let flavor = format.flavor();
        let context = TemplateContext {
            class_name: ctx.class_name.unwrap_or_default().to_string(),
            brand: ctx.brand.to_string(),
            platform: ctx.platform.to_string(),
            target: ctx.target.to_string(),
            destination: ctx.destination.to_string(),
            count: tokens.len(),
            tokens: tokens.iter().map(|t| flavor.fields(t)).collect(),
        };
        template.render(&context)
    }

    /// Read and compile a template file.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::TemplateRender`] if the file is missing,
    /// unreadable or malformed.
    pub fn load_template(&self, file: &str) -> Result<Template, TokenError> {
        let path = self.templates_dir.join(file);
        let source = std::fs::read_to_string(&path).map_err(|e| TokenError::TemplateRender {
            template: file.to_string(),
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Template::parse(file, &source)
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

    fn ctx() -> RenderContext<'static> {
        RenderContext {
            brand: "acme",
            platform: "ios",
            target: "ios",
            destination: "tokens.plist",
            class_name: Some("Tokens"),
        }
    }

    #[test]
    fn every_format_round_trips_through_its_name() {
        for &f in Format::ALL {
            assert_eq!(f.name().parse::<Format>().unwrap(), f);
        }
    }

    #[test]
    fn unknown_format_name_fails() {
        let err = "css/variables".parse::<Format>().unwrap_err();
        assert!(matches!(err, TokenError::UnknownFormat(n) if n == "css/variables"));
    }

    #[test]
    fn missing_template_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(dir.path());
        let err = renderer.render(Format::IosPlist, &[], &ctx()).unwrap_err();
        match err {
            TokenError::TemplateRender { template, message } => {
                assert_eq!(template, "ios-plist.template");
                assert!(message.contains("cannot read"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_template_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("class-dart.template"), "class {{class_name").unwrap();
        let renderer = Renderer::new(dir.path());
        let err = renderer.render(Format::FlutterClass, &[], &ctx()).unwrap_err();
        assert!(matches!(err, TokenError::TemplateRender { .. }));
    }

    #[test]
    fn template_formats_bind_class_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("class-dart.template"),
            "class {{class_name}} ({{count}})\n",
        )
        .unwrap();
        let renderer = Renderer::new(dir.path());
        let out = renderer.render(Format::FlutterClass, &[], &ctx()).unwrap();
        assert_eq!(out, "class Tokens (0)\n");
    }

    #[test]
    fn unknown_placeholder_in_template_file_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ios-plist.template"),
            "{{#each tokens}}{{token.name}}{{/each}}",
        )
        .unwrap();
        let renderer = Renderer::new(dir.path());
        let tokens = vec![Token::from_def(
            vec!["color".into(), "brand".into()],
            &crate::tokens::TokenDef {
                value: "#336699".into(),
                properties: serde_json::Map::new(),
                source: "t.json".into(),
            },
        )];
        let err = renderer.render(Format::IosPlist, &tokens, &ctx()).unwrap_err();
        assert!(matches!(
            err,
            TokenError::TemplateRender { ref template, .. } if template == "ios-plist.template"
        ));
    }

    #[test]
    fn structured_formats_need_no_templates() {
        let renderer = Renderer::new("/nonexistent");
        assert!(renderer.render(Format::JsonFlat, &[], &ctx()).is_ok());
        assert!(renderer.render(Format::ScssVariables, &[], &ctx()).is_ok());
    }
}
