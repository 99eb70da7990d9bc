//! Identifier case conversion for name transforms.

/// Split `s` into words.
///
/// Boundaries are non-alphanumeric characters, a lowercase letter followed by
/// an uppercase one, the last capital of an acronym followed by a lowercase
/// letter (`XMLHttp` → `XML`, `Http`), and letter/digit transitions.
#[must_use]
pub fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut words);
            continue;
        }
        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p))
            && prev.is_alphanumeric()
        {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_alphabetic() && c.is_numeric())
                || (prev.is_numeric() && c.is_alphabetic())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(char::is_lowercase));
            if boundary {
                flush(&mut current, &mut words);
            }
        }
        current.push(c);
    }
    flush(&mut current, &mut words);
    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// `border-width-small`
#[must_use]
pub fn kebab(parts: &[&str]) -> String {
    join_lower(parts, "-")
}

/// `border_width_small`
#[must_use]
pub fn snake(parts: &[&str]) -> String {
    join_lower(parts, "_")
}

/// `BORDER_WIDTH_SMALL`
#[must_use]
pub fn constant(parts: &[&str]) -> String {
    all_words(parts)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `borderWidthSmall`
#[must_use]
pub fn camel(parts: &[&str]) -> String {
    all_words(parts)
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
        .collect()
}

fn join_lower(parts: &[&str], sep: &str) -> String {
    all_words(parts)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

fn all_words(parts: &[&str]) -> Vec<String> {
    parts.iter().flat_map(|p| words(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_camel_case_and_separators() {
        assert_eq!(words("borderWidth"), vec!["border", "Width"]);
        assert_eq!(words("font_size-large"), vec!["font", "size", "large"]);
        assert_eq!(words("XMLHttp"), vec!["XML", "Http"]);
    }

    #[test]
    fn splits_digits() {
        assert_eq!(words("h1"), vec!["h", "1"]);
        assert_eq!(words("size2xl"), vec!["size", "2", "xl"]);
    }

    #[test]
    fn kebab_case() {
        assert_eq!(kebab(&["token", "color", "brand"]), "token-color-brand");
        assert_eq!(kebab(&["borderWidth", "small"]), "border-width-small");
    }

    #[test]
    fn camel_case() {
        assert_eq!(camel(&["token", "borderWidth", "small"]), "tokenBorderWidthSmall");
        assert_eq!(camel(&["Color", "BRAND"]), "colorBrand");
        assert_eq!(camel(&["spacing", "2"]), "spacing2");
    }

    #[test]
    fn constant_case() {
        assert_eq!(constant(&["token", "color", "brand"]), "TOKEN_COLOR_BRAND");
        assert_eq!(constant(&["radii", "xLarge"]), "RADII_X_LARGE");
    }

    #[test]
    fn snake_case() {
        assert_eq!(snake(&["fontSize", "body"]), "font_size_body");
    }

    #[test]
    fn empty_input_yields_empty_name() {
        assert_eq!(kebab(&[]), "");
        assert_eq!(camel(&["--"]), "");
    }
}
