//! Typed filter predicates that narrow the tokens a file receives.
//!
//! A filter is a conjunction of constraints. Each constraint compares one
//! token field against a string:
//!
//! ```toml
//! filter = [
//!     { field = "attributes.category", value = "color" },
//!     { field = "name", op = "ne", value = "colorBrandLegacy" },
//! ]
//! ```
use serde::Deserialize;

use crate::tokens::Token;

/// Comparison operator of a [`Constraint`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// Field equals the value.
    #[default]
    Eq,
    /// Field is absent or differs from the value.
    Ne,
}

/// Token field a [`Constraint`] reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Field {
    /// First path segment.
    Category,
    /// Output name after name transforms.
    Name,
    /// Dotted path.
    Path,
    /// `attributes.<key>`, filled by attribute transforms.
    Attribute(String),
    /// Any other key of the source token object (`type`, `comment`, ...).
    Property(String),
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        match s.as_str() {
            "category" => Self::Category,
            "name" => Self::Name,
            "path" => Self::Path,
            _ => s.strip_prefix("attributes.").map_or_else(
                || Self::Property(s.clone()),
                |key| Self::Attribute(key.to_string()),
            ),
        }
    }
}

impl Field {
    fn read(&self, token: &Token) -> Option<String> {
        match self {
            Self::Category => Some(token.category.clone()),
            Self::Name => Some(token.name.clone()),
            Self::Path => Some(token.dotted_path()),
            Self::Attribute(key) => token.attributes.get(key).cloned(),
            Self::Property(key) => token.property(key),
        }
    }
}

/// One `field op value` comparison.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Constraint {
    /// Field to read.
    pub field: Field,
    /// Comparison, `eq` when omitted.
    #[serde(default)]
    pub op: Op,
    /// Expected value.
    pub value: String,
}

impl Constraint {
    /// Whether `token` satisfies this constraint.
    #[must_use]
    pub fn holds(&self, token: &Token) -> bool {
        let actual = self.field.read(token);
        match self.op {
            Op::Eq => actual.as_deref() == Some(self.value.as_str()),
            Op::Ne => actual.as_deref() != Some(self.value.as_str()),
        }
    }
}

/// Conjunction of constraints; the empty filter passes every token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    /// Constraints that must all hold.
    pub constraints: Vec<Constraint>,
}

impl Filter {
    /// Whether `token` satisfies every constraint.
    #[must_use]
    pub fn matches(&self, token: &Token) -> bool {
        self.constraints.iter().all(|c| c.holds(token))
    }

    /// Tokens that pass, in their original order.
    #[must_use]
    pub fn apply(&self, tokens: &[Token]) -> Vec<Token> {
        tokens.iter().filter(|t| self.matches(t)).cloned().collect()
    }

    /// Whether the filter has no constraints.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::tokens::{TokenDef, TokenValue};
    use std::path::PathBuf;

    fn token(path: &str, props: &[(&str, &str)]) -> Token {
        let mut properties = serde_json::Map::new();
        for (k, v) in props {
            properties.insert((*k).to_string(), (*v).into());
        }
        let def = TokenDef {
            value: TokenValue::from("x"),
            properties,
            source: PathBuf::from("t.json"),
        };
        let mut t = Token::from_def(path.split('.').map(String::from).collect(), &def);
        t.attributes
            .insert("category".to_string(), t.category.clone());
        t
    }

    fn filter(toml_src: &str) -> Filter {
        #[derive(Deserialize)]
        struct Wrapper {
            filter: Filter,
        }
        toml::from_str::<Wrapper>(toml_src).unwrap().filter
    }

    #[test]
    fn field_names_parse() {
        assert_eq!(Field::from("category".to_string()), Field::Category);
        assert_eq!(
            Field::from("attributes.type".to_string()),
            Field::Attribute("type".to_string())
        );
        assert_eq!(
            Field::from("comment".to_string()),
            Field::Property("comment".to_string())
        );
    }

    #[test]
    fn empty_filter_passes_everything() {
        let tokens = vec![token("color.a", &[]), token("size.b", &[])];
        assert_eq!(Filter::default().apply(&tokens).len(), 2);
    }

    #[test]
    fn filter_keeps_only_matching_tokens() {
        let f = filter(r#"filter = [{ field = "attributes.category", value = "color" }]"#);
        let tokens = vec![
            token("color.a", &[]),
            token("size.b", &[]),
            token("color.c", &[]),
        ];
        let kept = f.apply(&tokens);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|t| f.matches(t)));
        assert!(tokens.iter().filter(|t| !f.matches(t)).all(|t| t.category == "size"));
    }

    #[test]
    fn constraints_are_conjunctive() {
        let f = filter(
            r#"filter = [
                { field = "category", value = "color" },
                { field = "path", op = "ne", value = "color.legacy" },
            ]"#,
        );
        assert!(f.matches(&token("color.brand", &[])));
        assert!(!f.matches(&token("color.legacy", &[])));
        assert!(!f.matches(&token("size.small", &[])));
    }

    #[test]
    fn missing_property_fails_eq_and_passes_ne() {
        let eq = filter(r#"filter = [{ field = "type", value = "shadow" }]"#);
        let ne = filter(r#"filter = [{ field = "type", op = "ne", value = "shadow" }]"#);
        let plain = token("color.a", &[]);
        let typed = token("color.b", &[("type", "shadow")]);
        assert!(!eq.matches(&plain));
        assert!(eq.matches(&typed));
        assert!(ne.matches(&plain));
        assert!(!ne.matches(&typed));
    }
}
