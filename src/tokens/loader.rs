//! Source document loading: glob expansion, JSON parsing and tree merging.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{Node, TokenDef, TokenTree, TokenValue};
use crate::error::TokenError;

/// Keys every resolved token already carries, so a token object cannot
/// declare them as free-form properties.
const RESERVED_PROPERTIES: &[&str] = &["name", "path", "category", "original", "attributes"];

/// Expand `patterns` relative to `root` into document paths.
///
/// Each pattern's matches are sorted; patterns keep their declared order and a
/// document matched by several patterns is listed once.
///
/// # Errors
///
/// Returns [`TokenError::Pattern`] if a pattern is not valid glob syntax and
/// [`TokenError::Io`] if a matched entry cannot be read.
pub fn expand(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, TokenError> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let full = format!("{escaped_root}/{pattern}");
        let entries = glob::glob(&full).map_err(|e| TokenError::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        let mut matched = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                TokenError::io(path, e.into_error())
            })?;
            if path.is_file() {
                matched.push(path);
            }
        }
        matched.sort();

        if matched.is_empty() {
            tracing::debug!("source pattern matched nothing: {pattern}");
        }
        for path in matched {
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

/// Load and merge every document matched by `patterns`.
///
/// # Errors
///
/// Returns an error if a pattern is invalid, a document cannot be read or
/// parsed, or two documents define the same token differently.
pub fn load(root: &Path, patterns: &[String]) -> Result<TokenTree, TokenError> {
    let mut tree = TokenTree::new();
    for path in expand(root, patterns)? {
        let content =
            std::fs::read_to_string(&path).map_err(|e| TokenError::io(path.clone(), e))?;
        let partial = parse_document(&path, &content)?;
        tracing::debug!("loaded {}", path.display());
        tree.merge(partial)?;
    }
    Ok(tree)
}

/// Parse one JSON document into a partial tree.
///
/// # Errors
///
/// Returns [`TokenError::Parse`] on malformed JSON, a non-object root, a
/// token value that is neither a string nor a number, or a token property
/// named like a field of the resolved token (`name`, `path`, `category`,
/// `original`, `attributes`).
pub fn parse_document(path: &Path, content: &str) -> Result<TokenTree, TokenError> {
    let parse_error = |message: String| TokenError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(parse_error("document root must be an object".to_string()));
    };
    parse_group(path, map, &mut Vec::new()).map_err(parse_error)
}

fn parse_group(
    source: &Path,
    map: Map<String, Value>,
    prefix: &mut Vec<String>,
) -> Result<TokenTree, String> {
    let mut tree = TokenTree::new();
    for (key, value) in map {
        prefix.push(key.clone());
        let node = parse_node(source, value, prefix)?;
        tree.push(key, node);
        prefix.pop();
    }
    Ok(tree)
}

fn parse_node(source: &Path, value: Value, prefix: &mut Vec<String>) -> Result<Node, String> {
    match value {
        Value::Object(mut map) => match map.remove("value") {
            Some(raw) => {
                if let Some(key) = map.keys().find(|k| RESERVED_PROPERTIES.contains(&k.as_str())) {
                    return Err(format!(
                        "token '{}' uses reserved property '{key}'",
                        prefix.join(".")
                    ));
                }
                let value = TokenValue::from_json(&raw).ok_or_else(|| {
                    format!(
                        "token '{}' must have a string or number value",
                        prefix.join(".")
                    )
                })?;
                Ok(Node::Token(TokenDef {
                    value,
                    properties: map,
                    source: source.to_path_buf(),
                }))
            }
            None => parse_group(source, map, prefix).map(Node::Group),
        },
        scalar @ (Value::String(_) | Value::Number(_)) => {
            let value = TokenValue::from_json(&scalar)
                .ok_or_else(|| format!("unsupported value at '{}'", prefix.join(".")))?;
            Ok(Node::Token(TokenDef {
                value,
                properties: Map::new(),
                source: source.to_path_buf(),
            }))
        }
        other => Err(format!(
            "unsupported {} at '{}'",
            json_kind(&other),
            prefix.join(".")
        )),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
