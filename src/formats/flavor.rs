//! Per-format token rows for template formats.
//!
//! Each template format sees the same [`TokenFields`] row shape; what differs
//! is escaping and how `kind` and `literal` are derived.
use crate::tokens::{Token, TokenValue, parse_number};
use crate::transforms::SIZE_CATEGORIES;

use super::template::TokenFields;

/// How to derive template rows for a target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Apple property list.
    Plist,
    /// Android resource XML.
    AndroidXml,
    /// Dart source.
    Dart,
}

impl Flavor {
    /// Build the template row for `token`.
    #[must_use]
    pub fn fields(self, token: &Token) -> TokenFields {
        let value = token.value.to_string();
        let (kind, literal, escape): (String, String, fn(&str) -> String) = match self {
            Self::Plist => (plist_kind(&token.value).to_string(), value.clone(), escape_xml),
            Self::AndroidXml => (android_kind(token).to_string(), value.clone(), escape_xml),
            Self::Dart => {
                let (kind, literal) = dart_literal(&value);
                (kind.to_string(), literal, str::to_string)
            }
        };

        TokenFields {
            name: escape(&token.name),
            value: escape(&value),
            literal: if self == Self::Dart {
                literal
            } else {
                escape(&literal)
            },
            kind,
            path: escape(&token.dotted_path()),
            category: escape(&token.category),
            r#type: escape(token.path.get(1).map_or("", String::as_str)),
            item: escape(token.path.get(2).map_or("", String::as_str)),
            comment: escape(token.comment().unwrap_or_default()),
        }
    }
}

const fn plist_kind(value: &TokenValue) -> &'static str {
    match value {
        TokenValue::Number(_) => "real",
        TokenValue::Text(_) => "string",
    }
}

fn android_kind(token: &Token) -> &'static str {
    let value = token.value.to_string();
    if token.category == "color" {
        "color"
    } else if SIZE_CATEGORIES.contains(&token.category.as_str())
        && ["dp", "sp", "px", "pt"].iter().any(|unit| {
            value
                .strip_suffix(unit)
                .and_then(parse_number)
                .is_some()
        })
    {
        "dimen"
    } else {
        "string"
    }
}

/// Dart type and literal for a value.
fn dart_literal(value: &str) -> (&'static str, String) {
    if value.starts_with("Color(") {
        return ("Color", value.to_string());
    }
    if parse_number(value).is_some() {
        let literal = if value.contains('.') || value.contains('e') {
            value.to_string()
        } else {
            format!("{value}.0")
        };
        return ("double", literal);
    }
    let escaped = value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('$', "\\$");
    ("String", format!("'{escaped}'"))
}

/// Escape the five XML special characters.
#[must_use]
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tokens::TokenDef;
    use std::path::PathBuf;

    fn token(path: &str, value: TokenValue) -> Token {
        let def = TokenDef {
            value,
            properties: serde_json::Map::new(),
            source: PathBuf::from("t.json"),
        };
        let mut t = Token::from_def(path.split('.').map(String::from).collect(), &def);
        t.name = t.path.join("_");
        t
    }

    #[test]
    fn android_kinds() {
        let color = token("color.brand", "#336699".into());
        let dimen = token("spacing.small", "4dp".into());
        let other = token("font.family", "Inter".into());
        assert_eq!(Flavor::AndroidXml.fields(&color).kind, "color");
        assert_eq!(Flavor::AndroidXml.fields(&dimen).kind, "dimen");
        assert_eq!(Flavor::AndroidXml.fields(&other).kind, "string");

        let infinite = token("spacing.huge", "infdp".into());
        assert_eq!(Flavor::AndroidXml.fields(&infinite).kind, "string");
    }

    #[test]
    fn xml_flavors_escape() {
        let t = token("font.family", "\"Inter\" & <Sans>".into());
        let fields = Flavor::Plist.fields(&t);
        assert_eq!(fields.value, "&quot;Inter&quot; &amp; &lt;Sans&gt;");
        assert_eq!(fields.literal, fields.value);
    }

    #[test]
    fn plist_numbers_are_real() {
        let t = token("opacity.half", TokenValue::Number(serde_json::Number::from(1)));
        assert_eq!(Flavor::Plist.fields(&t).kind, "real");
    }

    #[test]
    fn dart_literals() {
        assert_eq!(dart_literal("Color(0xFF336699)"), ("Color", "Color(0xFF336699)".into()));
        assert_eq!(dart_literal("4"), ("double", "4.0".into()));
        assert_eq!(dart_literal("1.5"), ("double", "1.5".into()));
        assert_eq!(dart_literal("it's $5"), ("String", "'it\\'s \\$5'".into()));
        assert_eq!(dart_literal("inf"), ("String", "'inf'".into()));
        assert_eq!(dart_literal("NaN"), ("String", "'NaN'".into()));
    }

    #[test]
    fn dart_fields_are_not_xml_escaped() {
        let t = token("font.family", "A&B".into());
        let fields = Flavor::Dart.fields(&t);
        assert_eq!(fields.value, "A&B");
        assert_eq!(fields.literal, "'A&B'");
        assert_eq!(fields.kind, "String");
    }

    #[test]
    fn cti_fields_come_from_path() {
        let t = token("color.background.primary", "#fff".into());
        let fields = Flavor::Plist.fields(&t);
        assert_eq!(fields.category, "color");
        assert_eq!(fields.r#type, "background");
        assert_eq!(fields.item, "primary");
    }
}
