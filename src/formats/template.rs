//! Handlebars templates for template-backed formats.
//!
//! Templates see one typed [`TemplateContext`]: scalars such as
//! `{{class_name}}` and `{{brand}}`, plus a `tokens` list iterated with
//! `{{#each tokens}} ... {{/each}}` whose rows expose the [`TokenFields`]
//! keys. The registry runs in strict mode with no helpers registered, so a
//! placeholder outside that set is an error rather than an empty string.
//! Values are inserted verbatim; escaping is done per format beforehand.
use handlebars::Handlebars;
use serde::Serialize;

use crate::error::TokenError;

/// Values bound into a template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateContext {
    /// `class_name` parameter of the output file, empty when unset.
    pub class_name: String,
    /// Brand being built.
    pub brand: String,
    /// Platform being built.
    pub platform: String,
    /// Target name.
    pub target: String,
    /// Destination file name after interpolation.
    pub destination: String,
    /// Number of token rows.
    pub count: usize,
    /// One row per token, in output order.
    pub tokens: Vec<TokenFields>,
}

/// Per-token values available inside `{{#each tokens}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenFields {
    /// Output name.
    pub name: String,
    /// Value as text.
    pub value: String,
    /// The value as a target-language literal.
    pub literal: String,
    /// A target-language type or element name.
    pub kind: String,
    /// Dotted token path.
    pub path: String,
    /// First path segment.
    pub category: String,
    /// Second path segment.
    pub r#type: String,
    /// Third path segment.
    pub item: String,
    /// `comment` property, empty when unset.
    pub comment: String,
}

/// A compiled template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    registry: Handlebars<'static>,
}

impl Template {
    /// Compile `source`. `name` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::TemplateRender`] for an unterminated `{{` or an
    /// unbalanced block.
    pub fn parse(name: &str, source: &str) -> Result<Self, TokenError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(name, source)
            .map_err(|e| render_error(name, &e))?;
        Ok(Self {
            name: name.to_string(),
            registry,
        })
    }

    /// Template name as given to [`Template::parse`].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::TemplateRender`] if the template names a
    /// placeholder the context does not provide.
    pub fn render(&self, context: &TemplateContext) -> Result<String, TokenError> {
        self.registry
            .render(&self.name, context)
            .map_err(|e| render_error(&self.name, &e))
    }
}

fn render_error(template: &str, e: &impl std::fmt::Display) -> TokenError {
    TokenError::TemplateRender {
        template: template.to_string(),
        message: e.to_string(),
    }
}
