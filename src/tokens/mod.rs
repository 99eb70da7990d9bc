//! Token model: values, the merged source tree, and resolved tokens.
pub mod loader;
pub mod reference;
pub mod resolver;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::TokenError;

/// A raw or resolved token value.
///
/// Numbers keep their source spelling so that `4` never becomes `4.0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    /// A string value, possibly containing alias references before resolution.
    Text(String),
    /// A numeric value.
    Number(serde_json::Number),
}

impl TokenValue {
    /// Convert a JSON scalar into a token value.
    ///
    /// Returns `None` for anything other than a string or number.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => Some(Self::Number(n.clone())),
            _ => None,
        }
    }

    /// Whether the value is a bare number (a JSON number or a numeric string).
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Number(_) => true,
            Self::Text(s) => parse_number(s).is_some(),
        }
    }

    /// The value as a float, if it is numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => parse_number(s),
        }
    }

    /// The value as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Parse a numeric string as a finite float.
///
/// `inf`, `nan` and spellings that overflow to infinity are not numbers.
#[must_use]
pub fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A token as declared in a source document.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDef {
    /// Raw value (may contain alias references).
    pub value: TokenValue,
    /// Any other keys of the token object (`comment`, `type`, ...).
    pub properties: Map<String, Value>,
    /// Document the token came from.
    pub source: PathBuf,
}

impl TokenDef {
    fn same_content(&self, other: &Self) -> bool {
        self.value == other.value && self.properties == other.properties
    }
}

/// A node of the token tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A nested group of tokens.
    Group(TokenTree),
    /// A leaf token.
    Token(TokenDef),
}

/// Ordered mapping from path segments to groups or tokens.
///
/// Insertion order follows the source documents, which keeps output
/// ordering stable across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTree {
    entries: Vec<(String, Node)>,
}

impl TokenTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Whether the tree has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a direct child by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, n)| n)
    }

    /// Append a child. Callers are expected to go through [`TokenTree::merge`]
    /// when the key may already exist.
    pub fn push(&mut self, key: impl Into<String>, node: Node) {
        self.entries.push((key.into(), node));
    }

    /// Merge `other` into `self`.
    ///
    /// Groups merge recursively. Re-declaring an identical token is
    /// accepted; any other redefinition is a conflict.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::DuplicateToken`] when both trees define the same
    /// path with different content, or a group and a token share a path.
    pub fn merge(&mut self, other: Self) -> Result<(), TokenError> {
        self.merge_at(other, &mut Vec::new())
    }

    fn merge_at(&mut self, other: Self, prefix: &mut Vec<String>) -> Result<(), TokenError> {
        for (key, node) in other.entries {
            let Some(existing) = self.get_mut(&key) else {
                self.push(key, node);
                continue;
            };
            prefix.push(key);
            match (existing, node) {
                (Node::Group(existing), Node::Group(incoming)) => {
                    existing.merge_at(incoming, prefix)?;
                }
                (Node::Token(existing), Node::Token(incoming)) => {
                    if !existing.same_content(&incoming) {
                        return Err(TokenError::DuplicateToken {
                            path: prefix.join("."),
                            first: existing.source.clone(),
                            second: incoming.source,
                        });
                    }
                }
                (existing, incoming) => {
                    return Err(TokenError::DuplicateToken {
                        path: prefix.join("."),
                        first: first_source(existing).to_path_buf(),
                        second: first_source(&incoming).to_path_buf(),
                    });
                }
            }
            prefix.pop();
        }
        Ok(())
    }

    /// Flatten the tree into `(path, definition)` pairs in source order.
    #[must_use]
    pub fn flatten(&self) -> Vec<(Vec<String>, &TokenDef)> {
        let mut out = Vec::new();
        self.collect(&mut Vec::new(), &mut out);
        out
    }

    fn collect<'a>(
        &'a self,
        prefix: &mut Vec<String>,
        out: &mut Vec<(Vec<String>, &'a TokenDef)>,
    ) {
        for (key, node) in &self.entries {
            prefix.push(key.clone());
            match node {
                Node::Group(group) => group.collect(prefix, out),
                Node::Token(def) => out.push((prefix.clone(), def)),
            }
            prefix.pop();
        }
    }
}

fn first_source(node: &Node) -> &Path {
    match node {
        Node::Token(def) => &def.source,
        Node::Group(group) => group
            .entries
            .first()
            .map_or_else(|| Path::new(""), |(_, n)| first_source(n)),
    }
}

/// A resolved token flowing through transforms and formats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    /// Output identifier; defaults to the dotted path until a name transform runs.
    pub name: String,
    /// Path segments from the tree root.
    pub path: Vec<String>,
    /// First path segment.
    pub category: String,
    /// Current value (resolved, then transformed).
    pub value: TokenValue,
    /// Value as written in the source document.
    pub original: TokenValue,
    /// Derived attributes (`category`, `type`, `item`, ...).
    pub attributes: BTreeMap<String, String>,
    /// Extra keys from the source token object.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Token {
    /// Build a token from its path and definition, before resolution.
    #[must_use]
    pub fn from_def(path: Vec<String>, def: &TokenDef) -> Self {
        Self {
            name: path.join("."),
            category: path.first().cloned().unwrap_or_default(),
            path,
            value: def.value.clone(),
            original: def.value.clone(),
            attributes: BTreeMap::new(),
            properties: def.properties.clone(),
        }
    }

    /// Dotted path, e.g. `color.brand.primary`.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    /// The `comment` property, if present and a string.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.properties.get("comment").and_then(Value::as_str)
    }

    /// A free-form property rendered as a string.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
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

    fn def(value: &str, source: &str) -> TokenDef {
        TokenDef {
            value: value.into(),
            properties: Map::new(),
            source: PathBuf::from(source),
        }
    }

    fn tree(path: &[&str], def: TokenDef) -> TokenTree {
        let mut node = Node::Token(def);
        for key in path.iter().skip(1).rev() {
            let mut group = TokenTree::new();
            group.push(*key, node);
            node = Node::Group(group);
        }
        let mut root = TokenTree::new();
        root.push(path[0], node);
        root
    }

    #[test]
    fn merge_combines_disjoint_groups() {
        let mut a = tree(&["color", "brand"], def("#336699", "a.json"));
        let b = tree(&["color", "accent"], def("#ff0000", "b.json"));
        a.merge(b).unwrap();
        let flat = a.flatten();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].0, vec!["color", "brand"]);
        assert_eq!(flat[1].0, vec!["color", "accent"]);
    }

    #[test]
    fn merge_accepts_identical_redefinition() {
        let mut a = tree(&["color", "brand"], def("#336699", "a.json"));
        let b = tree(&["color", "brand"], def("#336699", "b.json"));
        a.merge(b).unwrap();
        assert_eq!(a.flatten().len(), 1);
    }

    #[test]
    fn merge_rejects_conflicting_redefinition() {
        let mut a = tree(&["color", "brand"], def("#336699", "a.json"));
        let b = tree(&["color", "brand"], def("#000000", "b.json"));
        let err = a.merge(b).unwrap_err();
        match err {
            TokenError::DuplicateToken {
                path,
                first,
                second,
            } => {
                assert_eq!(path, "color.brand");
                assert_eq!(first, PathBuf::from("a.json"));
                assert_eq!(second, PathBuf::from("b.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn merge_rejects_group_token_clash() {
        let mut a = tree(&["color", "brand"], def("#336699", "a.json"));
        let b = tree(&["color"], def("red", "b.json"));
        assert!(matches!(
            a.merge(b),
            Err(TokenError::DuplicateToken { .. })
        ));
    }

    #[test]
    fn numeric_detection() {
        assert!(TokenValue::Text("4".into()).is_numeric());
        assert!(TokenValue::Text("0.5".into()).is_numeric());
        assert!(!TokenValue::Text("4px".into()).is_numeric());
        assert!(!TokenValue::Text(String::new()).is_numeric());
        assert!(TokenValue::Number(4.into()).is_numeric());
    }

    #[test]
    fn infinity_and_nan_spellings_are_text() {
        for s in ["inf", "-inf", "infinity", "NaN", "1e400"] {
            assert!(!TokenValue::Text(s.into()).is_numeric(), "{s} is numeric");
            assert_eq!(TokenValue::Text(s.into()).as_f64(), None);
        }
        assert_eq!(parse_number("1e3"), Some(1000.0));
    }

    #[test]
    fn number_display_keeps_source_spelling() {
        assert_eq!(TokenValue::Number(4.into()).to_string(), "4");
    }

    #[test]
    fn token_from_def_defaults_name_and_category() {
        let token = Token::from_def(
            vec!["spacing".into(), "small".into()],
            &def("4px", "a.json"),
        );
        assert_eq!(token.name, "spacing.small");
        assert_eq!(token.category, "spacing");
        assert_eq!(token.original, token.value);
    }
}
