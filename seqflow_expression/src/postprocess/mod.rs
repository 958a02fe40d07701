//! Leaf resolution
//!
//! After linking, the tree's remaining `ARG{n}` leaves are resolved against
//! the argument cache: numeric and boolean literals become values, quoted
//! strings become values with the quotes stripped, and everything else is a
//! variable reference, optionally checked against the caller's scope.

use crate::ast::{ExpressionElement, ExpressionNode};
use crate::parser::error::{ParseError, ParseResult};
use crate::preprocess::ArgumentCache;
use crate::scope::VariableScope;
use once_cell::sync::Lazy;
use regex::Regex;

/// Plain, hexadecimal, or scientific numeric literal
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d+)?|0[xX][0-9a-fA-F]+|\d+(?:\.\d+)?[Ee][+-]?\d+)?$")
        .expect("numeric pattern compiles")
});

/// Boolean literal
static BOOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[Tt]rue|[Ff]alse)$").expect("bool pattern compiles"));

/// Quoted string literal; the branches capture the unquoted content
static STRING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(.*)"$|^'(.*)'$"#).expect("string pattern compiles"));

/// Resolve every remaining placeholder leaf in place
pub(crate) fn resolve_leaves(
    node: &mut ExpressionNode,
    cache: &ArgumentCache,
    scope: Option<&dyn VariableScope>,
    expression: &str,
) -> ParseResult<()> {
    for element in node.arguments.iter_mut() {
        match element {
            ExpressionElement::Expression { node } => {
                resolve_leaves(node, cache, scope, expression)?;
            }
            ExpressionElement::Unresolved { placeholder } => {
                let raw = cache
                    .get(placeholder)
                    .expect("placeholder missing from argument cache");
                *element = classify(raw, scope, expression)?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Classify a literal operand: numeric or boolean text keeps its raw form,
/// quoted strings lose their quotes. `None` when the text is not a literal.
pub(crate) fn classify_literal(raw: &str) -> Option<ExpressionElement> {
    if NUMERIC_RE.is_match(raw) || BOOL_RE.is_match(raw) {
        return Some(ExpressionElement::value(raw));
    }
    if let Some(captures) = STRING_RE.captures(raw) {
        let inner = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map_or("", |m| m.as_str());
        return Some(ExpressionElement::value(inner));
    }
    None
}

fn classify(
    raw: &str,
    scope: Option<&dyn VariableScope>,
    expression: &str,
) -> ParseResult<ExpressionElement> {
    if let Some(literal) = classify_literal(raw) {
        return Ok(literal);
    }
    if let Some(scope) = scope {
        if !scope.contains_variable(raw) {
            return Err(ParseError::unknown_variable(raw, expression));
        }
    }
    Ok(ExpressionElement::variable(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    fn resolve(raw: &str, scope: Option<&dyn VariableScope>) -> ParseResult<ExpressionElement> {
        classify(raw, scope, "test")
    }

    #[test]
    fn test_numeric_literals_become_values() {
        for raw in ["1", "42", "3.25", "-7", "+10", "0x1F", "1E-10", "2.5e+3"] {
            assert_eq!(
                resolve(raw, None).expect("resolves"),
                ExpressionElement::value(raw),
                "raw {}",
                raw
            );
        }
    }

    #[test]
    fn test_boolean_literals_become_values() {
        for raw in ["true", "True", "false", "False"] {
            assert_eq!(
                resolve(raw, None).expect("resolves"),
                ExpressionElement::value(raw)
            );
        }
    }

    #[test]
    fn test_strings_lose_their_quotes() {
        assert_eq!(
            resolve("\"1+2\"", None).expect("resolves"),
            ExpressionElement::value("1+2")
        );
        assert_eq!(
            resolve("'hello world'", None).expect("resolves"),
            ExpressionElement::value("hello world")
        );
        assert_eq!(
            resolve("''", None).expect("resolves"),
            ExpressionElement::value("")
        );
    }

    #[test]
    fn test_mismatched_quotes_stay_variables() {
        assert_eq!(
            resolve("\"a'", None).expect("resolves"),
            ExpressionElement::variable("\"a'")
        );
    }

    #[test]
    fn test_unchecked_variables_pass_without_scope() {
        assert_eq!(
            resolve("speed", None).expect("resolves"),
            ExpressionElement::variable("speed")
        );
    }

    #[test]
    fn test_scope_accepts_known_variable() {
        let mut scope = HashSet::new();
        scope.insert("speed".to_string());
        assert_eq!(
            resolve("speed", Some(&scope)).expect("resolves"),
            ExpressionElement::variable("speed")
        );
    }

    #[test]
    fn test_scope_rejects_unknown_variable() {
        let scope: HashSet<String> = HashSet::new();
        let result = resolve("speed", Some(&scope));
        assert_matches!(
            result,
            Err(ParseError::UnknownVariable { ref variable, .. }) if variable == "speed"
        );
    }

    #[test]
    fn test_nested_tree_resolution() {
        let mut cache = ArgumentCache::new();
        let one = cache.store("1".to_string());
        let name = cache.store("speed".to_string());
        let text = cache.store("'m/s'".to_string());

        let mut tree = ExpressionNode::with_arguments(
            "add",
            vec![
                ExpressionElement::unresolved(&one),
                ExpressionElement::expression(ExpressionNode::with_arguments(
                    "multiply",
                    vec![
                        ExpressionElement::unresolved(&name),
                        ExpressionElement::unresolved(&text),
                    ],
                )),
            ],
        );

        resolve_leaves(&mut tree, &cache, None, "test").expect("resolves");
        assert!(tree.is_fully_resolved());
        assert_eq!(tree.arguments[0], ExpressionElement::value("1"));
        match &tree.arguments[1] {
            ExpressionElement::Expression { node } => {
                assert_eq!(node.arguments[0], ExpressionElement::variable("speed"));
                assert_eq!(node.arguments[1], ExpressionElement::value("m/s"));
            }
            other => panic!("expected nested expression, got {}", other),
        }
    }
}
