//! JavaScript formats: ES6 constants and nested CommonJS/global objects.
use serde_json::{Map, Value};

use crate::tokens::Token;

pub(super) const HEADER: &str = "/**\n * Do not edit directly, this file was auto-generated.\n */\n\n";

/// `export const NAME = value;` per token.
#[must_use]
pub fn es6(tokens: &[Token]) -> String {
    let mut out = String::from(HEADER);
    for token in tokens {
        let value = token.value.to_json();
        out.push_str(&format!("export const {} = {value};", token.name));
        if let Some(comment) = token.comment() {
            out.push_str(&format!(" // {comment}"));
        }
        out.push('\n');
    }
    out
}

/// `module.exports = { ... };` with tokens nested by path.
#[must_use]
pub fn module(tokens: &[Token]) -> String {
    format!("{HEADER}module.exports = {};\n", nested_json(tokens))
}

/// `var <name> = { ... };` with tokens nested by path.
#[must_use]
pub fn object(tokens: &[Token], var_name: &str) -> String {
    format!("{HEADER}var {var_name} = {};\n", nested_json(tokens))
}

fn nested_json(tokens: &[Token]) -> String {
    let mut root = Map::new();
    for token in tokens {
        insert(&mut root, &token.path, token.value.to_json());
    }
    serde_json::to_string_pretty(&Value::Object(root)).unwrap_or_else(|_| "{}".to_string())
}

fn insert(map: &mut Map<String, Value>, path: &[String], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            map.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let child = map
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child) = child {
                insert(child, rest, value);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tokens::loader::parse_document;
    use crate::tokens::resolver::resolve;
    use crate::transforms::{Transform, apply_all};
    use std::path::Path;

    fn tokens(json: &str) -> Vec<Token> {
        let tree = parse_document(Path::new("t.json"), json).unwrap();
        apply_all(&[Transform::NameConstant], resolve(&tree).unwrap(), Some("token")).unwrap()
    }

    #[test]
    fn es6_exports_constants() {
        let out = es6(&tokens(
            r##"{ "color": { "brand": { "value": "#336699", "comment": "primary" } }, "opacity": { "value": 0.5 } }"##,
        ));
        insta::assert_snapshot!(out, @r##"
        /**
         * Do not edit directly, this file was auto-generated.
         */

        export const TOKEN_COLOR_BRAND = "#336699"; // primary
        export const TOKEN_OPACITY = 0.5;
        "##);
    }

    #[test]
    fn module_nests_by_path() {
        let out = module(&tokens(r#"{ "size": { "small": "4px", "large": "16px" } }"#));
        assert!(out.contains("module.exports = {\n  \"size\": {\n    \"small\": \"4px\",\n    \"large\": \"16px\"\n  }\n};\n"));
    }

    #[test]
    fn object_uses_given_variable_name() {
        let out = object(&tokens(r#"{ "a": "1" }"#), "_tokens");
        assert!(out.contains("var _tokens = {\n  \"a\": \"1\"\n};"));
    }
}
