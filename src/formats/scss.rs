//! `scss/variables`: one `$name: value;` declaration per token.
use crate::tokens::Token;

const HEADER: &str = "// Do not edit directly, this file was auto-generated.\n\n";

/// Render SCSS variable declarations.
#[must_use]
pub fn variables(tokens: &[Token]) -> String {
    let mut out = String::from(HEADER);
    for token in tokens {
        out.push_str(&format!("${}: {};", token.name, token.value));
        if let Some(comment) = token.comment() {
            out.push_str(&format!(" // {comment}"));
        }
        out.push('\n');
    }
    out
}
