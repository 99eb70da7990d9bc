//! Alias reference syntax: `{path.to.token}`.
use std::sync::LazyLock;

use regex::Regex;

/// `{path}` with an optional trailing `.value` kept out of the path.
#[allow(clippy::expect_used)]
static ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^{}\s]+?)(?:\.value)?\}").expect("alias pattern is valid")
});

/// A reference found inside a value string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    /// Byte offset of the opening brace.
    pub start: usize,
    /// Byte offset one past the closing brace.
    pub end: usize,
    /// Referenced path with any trailing `.value` removed.
    pub path: &'a str,
}

/// Find every `{path}` reference in `s`, left to right.
///
/// A reference body is a non-empty run of characters other than braces and
/// whitespace. Anything else between braces is literal text.
#[must_use]
pub fn find(s: &str) -> Vec<Reference<'_>> {
    ALIAS
        .captures_iter(s)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Reference {
                start: whole.start(),
                end: whole.end(),
                path: caps.get(1)?.as_str(),
            })
        })
        .collect()
}

/// Whether `s` contains any reference.
#[must_use]
pub fn contains(s: &str) -> bool {
    ALIAS.is_match(s)
}

/// If the whole of `s` is a single reference, return its path.
#[must_use]
pub fn whole(s: &str) -> Option<&str> {
    match find(s).as_slice() {
        [only] if only.start == 0 && only.end == s.len() => Some(only.path),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn finds_whole_value_reference() {
        assert_eq!(whole("{color.brand}"), Some("color.brand"));
    }

    #[test]
    fn strips_value_suffix() {
        assert_eq!(whole("{color.brand.value}"), Some("color.brand"));
    }

    #[test]
    fn finds_embedded_references() {
        let refs = find("1px solid {color.border} / {size.gap}");
        let paths: Vec<&str> = refs.iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["color.border", "size.gap"]);
        assert_eq!(whole("1px solid {color.border}"), None);
    }

    #[test]
    fn ignores_empty_and_spaced_braces() {
        assert!(find("{}").is_empty());
        assert!(find("{ not a ref }").is_empty());
        assert!(find("no braces").is_empty());
        assert!(find("{unterminated").is_empty());
    }

    #[test]
    fn nested_open_brace_restarts_scan() {
        let refs = find("{{a.b}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].path, "a.b");
        assert_eq!(refs[0].start, 1);
    }

    #[test]
    fn value_suffix_alone_is_a_path() {
        assert_eq!(whole("{.value}"), Some(".value"));
        assert_eq!(whole("{a.value.value}"), Some("a.value"));
    }

    #[test]
    fn contains_detects_any_reference() {
        assert!(contains("x {a} y"));
        assert!(!contains("#336699"));
    }
}
