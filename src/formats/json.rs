//! `json/flat`: every token as a JSON object in one array.
use crate::error::TokenError;
use crate::tokens::Token;

/// Serialize `tokens` as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`TokenError::Transform`] if serialization fails, which only
/// happens for non-string map keys and cannot occur for [`Token`].
pub fn flat(tokens: &[Token]) -> Result<String, TokenError> {
    let mut out = serde_json::to_string_pretty(tokens).map_err(|e| TokenError::Transform {
        transform: "json/flat".to_string(),
        token: String::new(),
        message: e.to_string(),
    })?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::tokens::loader::parse_document;
    use crate::tokens::resolver::resolve;
    use serde_json::Value;
    use std::collections::BTreeSet;
    use std::path::Path;

    #[test]
    fn flat_json_round_trips_paths_and_values() {
        let tree = parse_document(
            Path::new("t.json"),
            r##"{
                "color": { "base": { "value": "#336699", "comment": "brand" }, "alias": "{color.base}" },
                "spacing": { "small": { "value": 4 } }
            }"##,
        )
        .unwrap();
        let tokens = resolve(&tree).unwrap();
        let rendered = flat(&tokens).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&rendered).unwrap();
        let reparsed: BTreeSet<(String, String)> = parsed
            .iter()
            .map(|t| {
                let path = t["path"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|s| s.as_str().unwrap())
                    .collect::<Vec<_>>()
                    .join(".");
                let value = match &t["value"] {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (path, value)
            })
            .collect();
        let expected: BTreeSet<(String, String)> = tokens
            .iter()
            .map(|t| (t.dotted_path(), t.value.to_string()))
            .collect();
        assert_eq!(reparsed, expected);
    }

    #[test]
    fn properties_never_shadow_token_fields() {
        let err = parse_document(
            Path::new("t.json"),
            r##"{ "color": { "brand": { "value": "#336699", "path": "legacy/brand" } } }"##,
        )
        .unwrap_err();
        assert!(matches!(err, TokenError::Parse { .. }));

        let tree = parse_document(
            Path::new("t.json"),
            r##"{ "color": { "brand": { "value": "#336699", "legacy": "legacy/brand" } } }"##,
        )
        .unwrap();
        let rendered = flat(&resolve(&tree).unwrap()).unwrap();
        assert_eq!(rendered.matches("\"path\"").count(), 1);
        let parsed: Vec<Value> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["path"], serde_json::json!(["color", "brand"]));
        assert_eq!(parsed[0]["legacy"], "legacy/brand");
    }

    #[test]
    fn flat_json_keeps_properties_and_original() {
        let tree = parse_document(
            Path::new("t.json"),
            r#"{ "a": { "value": "1px", "comment": "tiny" }, "b": "{a}" }"#,
        )
        .unwrap();
        let rendered = flat(&resolve(&tree).unwrap()).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["comment"], "tiny");
        assert_eq!(parsed[1]["original"], "{a}");
        assert_eq!(parsed[1]["value"], "1px");
        assert!(rendered.ends_with("]\n"));
    }
}
