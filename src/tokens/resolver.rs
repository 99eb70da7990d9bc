//! Alias resolution.
//!
//! Resolution walks every token with an explicit work stack instead of
//! recursion, so arbitrarily deep reference chains cannot overflow the call
//! stack. Resolved values are memoized by index; a reference to a path that
//! is still on the work stack is a cycle.
use std::collections::HashMap;

use super::reference;
use super::{Token, TokenTree, TokenValue};
use crate::error::TokenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Pending,
    InProgress,
    Done,
}

/// Flatten `tree` and resolve every alias reference.
///
/// Tokens keep source order. Each token's `original` field retains the raw
/// value.
///
/// # Errors
///
/// Returns [`TokenError::UnresolvedReference`] if a reference names no token,
/// [`TokenError::CyclicReference`] if references form a cycle and
/// [`TokenError::ResidualReference`] if substitution spells a new reference.
pub fn resolve(tree: &TokenTree) -> Result<Vec<Token>, TokenError> {
    let mut tokens: Vec<Token> = tree
        .flatten()
        .into_iter()
        .map(|(path, def)| Token::from_def(path, def))
        .collect();

    let index: HashMap<String, usize> = tokens
        .iter()
        .enumerate()
        .map(|(i, t)| (t.dotted_path(), i))
        .collect();

    let mut states = vec![State::Pending; tokens.len()];
    for start in 0..tokens.len() {
        resolve_one(start, &mut tokens, &index, &mut states)?;
    }
    Ok(tokens)
}

fn resolve_one(
    start: usize,
    tokens: &mut [Token],
    index: &HashMap<String, usize>,
    states: &mut [State],
) -> Result<(), TokenError> {
    if states.get(start) == Some(&State::Done) {
        return Ok(());
    }

    let mut stack = vec![start];
    set_state(states, start, State::InProgress);

    while let Some(&current) = stack.last() {
        let Some(token) = tokens.get(current) else {
            break;
        };

        // Find the first dependency that still needs work.
        let mut next = None;
        if let TokenValue::Text(raw) = &token.value {
            for r in reference::find(raw) {
                let dep = *index.get(r.path).ok_or_else(|| TokenError::UnresolvedReference {
                    token: token.dotted_path(),
                    reference: r.path.to_string(),
                })?;
                match states.get(dep).copied() {
                    Some(State::Done) => {}
                    Some(State::InProgress) => {
                        return Err(cycle(&stack, dep, tokens));
                    }
                    _ => {
                        next = Some(dep);
                        break;
                    }
                }
            }
        }

        if let Some(dep) = next {
            set_state(states, dep, State::InProgress);
            stack.push(dep);
            continue;
        }

        let resolved = substitute(token, tokens, index)?;
        if let Some(token) = tokens.get_mut(current) {
            token.value = resolved;
        }
        set_state(states, current, State::Done);
        stack.pop();
    }
    Ok(())
}

fn set_state(states: &mut [State], i: usize, state: State) {
    if let Some(slot) = states.get_mut(i) {
        *slot = state;
    }
}

/// Replace every reference in `token`'s value with its (already resolved)
/// target.
///
/// A value that is exactly one reference takes the target's value as-is,
/// preserving numbers. Embedded substitution is a single pass, so a result
/// that spells a new reference (`{{a}}` with `a = "b"` gives `{b}`) is an
/// error rather than a value with residual alias syntax.
fn substitute(
    token: &Token,
    tokens: &[Token],
    index: &HashMap<String, usize>,
) -> Result<TokenValue, TokenError> {
    let TokenValue::Text(raw) = &token.value else {
        return Ok(token.value.clone());
    };
    let lookup = |path: &str| index.get(path).and_then(|&i| tokens.get(i));

    if let Some(path) = reference::whole(raw)
        && let Some(target) = lookup(path)
    {
        return Ok(target.value.clone());
    }

    let mut out = String::with_capacity(raw.len());
    let mut last = 0;
    for r in reference::find(raw) {
        out.push_str(raw.get(last..r.start).unwrap_or_default());
        if let Some(target) = lookup(r.path) {
            out.push_str(&target.value.to_string());
        }
        last = r.end;
    }
    out.push_str(raw.get(last..).unwrap_or_default());

    if reference::contains(&out) {
        return Err(TokenError::ResidualReference {
            token: token.dotted_path(),
            value: out,
        });
    }
    Ok(TokenValue::Text(out))
}

fn cycle(stack: &[usize], repeated: usize, tokens: &[Token]) -> TokenError {
    let from = stack.iter().position(|&i| i == repeated).unwrap_or(0);
    let mut chain: Vec<String> = stack
        .iter()
        .skip(from)
        .filter_map(|&i| tokens.get(i).map(Token::dotted_path))
        .collect();
    if let Some(t) = tokens.get(repeated) {
        chain.push(t.dotted_path());
    }
    TokenError::CyclicReference { chain }
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
    use crate::tokens::loader::parse_document;
    use std::path::Path;

    fn resolve_json(json: &str) -> Result<Vec<Token>, TokenError> {
        let tree = parse_document(Path::new("test.json"), json).unwrap();
        resolve(&tree)
    }

    fn value_of<'a>(tokens: &'a [Token], path: &str) -> &'a TokenValue {
        &tokens
            .iter()
            .find(|t| t.dotted_path() == path)
            .unwrap()
            .value
    }

    #[test]
    fn resolves_whole_value_alias() {
        let tokens = resolve_json(
            r##"{ "color": { "base": { "value": "#336699" }, "brand": { "value": "{color.base}" } } }"##,
        )
        .unwrap();
        assert_eq!(value_of(&tokens, "color.brand"), &TokenValue::from("#336699"));
        assert_eq!(tokens[1].original, TokenValue::from("{color.base}"));
    }

    #[test]
    fn alias_to_number_keeps_number() {
        let tokens = resolve_json(r#"{ "a": { "value": 4 }, "b": { "value": "{a.value}" } }"#)
            .unwrap();
        assert_eq!(value_of(&tokens, "b"), &TokenValue::Number(4.into()));
    }

    #[test]
    fn resolves_embedded_references() {
        let tokens = resolve_json(
            r##"{
                "color": { "border": { "value": "#000" } },
                "width": { "value": 1 },
                "border": { "value": "{width}px solid {color.border}" }
            }"##,
        )
        .unwrap();
        assert_eq!(value_of(&tokens, "border"), &TokenValue::from("1px solid #000"));
    }

    #[test]
    fn resolves_forward_and_chained_references() {
        let tokens = resolve_json(
            r#"{ "a": "{b}", "b": "{c}", "c": { "value": "8px" } }"#,
        )
        .unwrap();
        assert_eq!(value_of(&tokens, "a"), &TokenValue::from("8px"));
        assert_eq!(value_of(&tokens, "b"), &TokenValue::from("8px"));
    }

    #[test]
    fn deep_chains_terminate_without_residual_references() {
        // t0 -> t1 -> ... -> t4999, so resolving t0 walks the whole chain.
        let mut json = String::from("{");
        for i in 0..4999 {
            json.push_str(&format!("\"t{i}\": \"{{t{}}}\", ", i + 1));
        }
        json.push_str("\"t4999\": { \"value\": \"1px\" } }");

        let tokens = resolve_json(&json).unwrap();
        assert_eq!(tokens.len(), 5000);
        for token in &tokens {
            let TokenValue::Text(s) = &token.value else {
                panic!("expected text value");
            };
            assert!(!reference::contains(s), "residual reference in {s}");
            assert_eq!(s, "1px");
        }
    }

    #[test]
    fn substitution_that_spells_a_reference_is_rejected() {
        let err = resolve_json(
            r#"{ "a": { "value": "b" }, "b": { "value": "x" }, "c": { "value": "{{a}}" } }"#,
        )
        .unwrap_err();
        match err {
            TokenError::ResidualReference { token, value } => {
                assert_eq!(token, "c");
                assert_eq!(value, "{b}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn literal_braces_around_references_survive() {
        let tokens = resolve_json(
            r#"{ "a": { "value": "b c" }, "c": { "value": "{{a}}" }, "d": { "value": "{ {a} }" } }"#,
        )
        .unwrap();
        assert_eq!(value_of(&tokens, "c"), &TokenValue::from("{b c}"));
        assert_eq!(value_of(&tokens, "d"), &TokenValue::from("{ b c }"));
        for token in &tokens {
            if let TokenValue::Text(s) = &token.value {
                assert!(!reference::contains(s), "residual reference in {s}");
            }
        }
    }

    #[test]
    fn unresolved_reference_is_reported() {
        let err = resolve_json(r#"{ "a": "{missing.path}" }"#).unwrap_err();
        match err {
            TokenError::UnresolvedReference { token, reference } => {
                assert_eq!(token, "a");
                assert_eq!(reference, "missing.path");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn direct_cycle_is_reported() {
        let err = resolve_json(r#"{ "a": "{b}", "b": "{a}" }"#).unwrap_err();
        match err {
            TokenError::CyclicReference { chain } => {
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let err = resolve_json(r#"{ "a": "{a}" }"#).unwrap_err();
        assert!(matches!(err, TokenError::CyclicReference { .. }));
    }

    #[test]
    fn cycle_reached_through_acyclic_prefix_reports_only_the_loop() {
        let err = resolve_json(r#"{ "start": "{x}", "x": "{y}", "y": "{x}" }"#).unwrap_err();
        match err {
            TokenError::CyclicReference { chain } => assert_eq!(chain, vec!["x", "y", "x"]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
