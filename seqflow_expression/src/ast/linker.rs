//! Sub-expression linking
//!
//! While the state machine runs, finalized operators live in a cache keyed by
//! `EXP{n}` names and parents reference them by name. After a candidate fully
//! parses, this pass moves every cached sub-expression into its parent so the
//! returned tree holds no dangling names, leaving only `ARG{n}` leaves for
//! leaf resolution.

use super::nodes::{ExpressionElement, ExpressionNode};
use crate::log_debug;
use crate::placeholder::EXP_PREFIX;
use std::collections::HashMap;

/// Take the root out of the cache and recursively inline every
/// sub-expression reference. Returns `None` when a referenced name is not in
/// the cache, which fails the candidate.
pub(crate) fn link_expression(
    root: &str,
    cache: &mut HashMap<String, ExpressionNode>,
) -> Option<ExpressionNode> {
    let mut node = match cache.remove(root) {
        Some(node) => node,
        None => {
            log_debug!("Sub-expression cache has no entry for the parse root",
                "root" => root
            );
            return None;
        }
    };
    if !link_children(&mut node, cache) {
        return None;
    }
    Some(node)
}

fn link_children(node: &mut ExpressionNode, cache: &mut HashMap<String, ExpressionNode>) -> bool {
    for element in node.arguments.iter_mut() {
        let placeholder = match element {
            ExpressionElement::Unresolved { placeholder }
                if placeholder.starts_with(EXP_PREFIX) =>
            {
                placeholder.clone()
            }
            _ => continue,
        };
        let child = match link_expression(&placeholder, cache) {
            Some(child) => child,
            None => return false,
        };
        *element = ExpressionElement::expression(child);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(operation: &str, arguments: Vec<ExpressionElement>) -> ExpressionNode {
        ExpressionNode::with_arguments(operation, arguments)
    }

    #[test]
    fn test_links_nested_expressions() {
        let mut cache = HashMap::new();
        cache.insert(
            "EXP0".to_string(),
            node(
                "multiply",
                vec![
                    ExpressionElement::unresolved("ARG1"),
                    ExpressionElement::unresolved("ARG2"),
                ],
            ),
        );
        cache.insert(
            "EXP1".to_string(),
            node(
                "add",
                vec![
                    ExpressionElement::unresolved("ARG0"),
                    ExpressionElement::unresolved("EXP0"),
                ],
            ),
        );

        let tree = link_expression("EXP1", &mut cache).expect("links");
        assert!(cache.is_empty());
        assert_eq!(tree.operation, "add");
        match &tree.arguments[1] {
            ExpressionElement::Expression { node } => {
                assert_eq!(node.operation, "multiply");
                assert_eq!(
                    node.arguments[0],
                    ExpressionElement::unresolved("ARG1")
                );
            }
            other => panic!("expected nested expression, got {}", other),
        }
    }

    #[test]
    fn test_missing_root_fails() {
        let mut cache = HashMap::new();
        assert!(link_expression("EXP0", &mut cache).is_none());
    }

    #[test]
    fn test_missing_child_fails() {
        let mut cache = HashMap::new();
        cache.insert(
            "EXP0".to_string(),
            node("add", vec![ExpressionElement::unresolved("EXP7")]),
        );
        assert!(link_expression("EXP0", &mut cache).is_none());
    }
}
