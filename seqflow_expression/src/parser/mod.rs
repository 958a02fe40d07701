//! Expression parser facade
//!
//! Owns the per-call scratch state and drives the pipeline: preprocess the
//! raw text, enumerate split candidates, feed each through the state machine,
//! and resolve the winning tree's leaves. A parser instance is cheap,
//! disposable, and not meant for concurrent sharing; the catalog behind it is
//! immutable and shared freely.

pub mod error;

pub use error::{ParseError, ParseResult};

use crate::arrange::SplitCandidates;
use crate::ast::ExpressionElement;
use crate::catalog::OperatorCatalog;
use crate::config::constants::compile_time::preprocess::MAX_EXPRESSION_LENGTH;
use crate::config::runtime::ParserPreferences;
use crate::machine::{CandidateOutcome, ParserStateMachine, SearchBudget};
use crate::placeholder::ARG_PREFIX;
use crate::postprocess::{classify_literal, resolve_leaves};
use crate::preprocess::{preprocess, ArgumentCache};
use crate::scope::VariableScope;
use crate::{log_debug, log_error, log_success};
use crate::logging::codes;
use std::sync::Arc;

/// Compiles expression text into operator trees against one shared catalog
pub struct ExpressionParser {
    catalog: Arc<OperatorCatalog>,
    arguments: ArgumentCache,
    preferences: ParserPreferences,
}

impl ExpressionParser {
    pub fn new(catalog: Arc<OperatorCatalog>) -> Self {
        Self::with_preferences(catalog, ParserPreferences::default())
    }

    pub fn with_preferences(catalog: Arc<OperatorCatalog>, preferences: ParserPreferences) -> Self {
        Self {
            catalog,
            arguments: ArgumentCache::new(),
            preferences,
        }
    }

    pub fn catalog(&self) -> &OperatorCatalog {
        &self.catalog
    }

    /// Context-free parse: variable leaves are accepted unchecked
    pub fn parse(&mut self, text: &str) -> ParseResult<ExpressionElement> {
        self.parse_with(text, None)
    }

    /// Scope-checked parse: every variable leaf must exist in `scope`
    pub fn parse_in_scope(
        &mut self,
        text: &str,
        scope: &dyn VariableScope,
    ) -> ParseResult<ExpressionElement> {
        self.parse_with(text, Some(scope))
    }

    /// Whether any character of `text` belongs to the catalog's operator
    /// character set; callers use this to decide if a parameter value should
    /// be compiled as an expression at all.
    pub fn is_expression(&self, text: &str) -> bool {
        self.catalog.has_expression_characters(text)
    }

    /// Rename variable occurrences in raw expression text.
    ///
    /// Purely textual: an occurrence of `old_name` is replaced when its
    /// nearest non-space neighbour on each side is an operator character or
    /// the string boundary. The heuristic can misfire on occurrences inside
    /// string literals; callers rename before literals are a concern.
    pub fn rename_variable(
        &self,
        expression: &str,
        old_name: &str,
        new_name: &str,
    ) -> (String, bool) {
        if old_name.is_empty() || !expression.contains(old_name) {
            return (expression.to_string(), false);
        }
        let original: Vec<char> = expression.chars().collect();
        let target: Vec<char> = old_name.chars().collect();
        let mut buffer = original.clone();
        let mut changed = false;

        let mut search_end = original.len();
        while let Some(start) = find_last_occurrence(&original, &target, search_end) {
            let left_ok = nearest_non_space(original[..start].iter().rev())
                .map_or(true, |ch| self.catalog.contains_operator_char(ch));
            let right_ok = nearest_non_space(original[start + target.len()..].iter())
                .map_or(true, |ch| self.catalog.contains_operator_char(ch));
            if left_ok && right_ok {
                buffer.splice(start..start + target.len(), new_name.chars());
                changed = true;
            }
            search_end = start;
        }
        (buffer.iter().collect(), changed)
    }

    fn parse_with(
        &mut self,
        text: &str,
        scope: Option<&dyn VariableScope>,
    ) -> ParseResult<ExpressionElement> {
        self.arguments.clear();
        let result = self.parse_guarded(text, scope);
        self.arguments.clear();
        if let Err(error) = &result {
            log_error!(error.error_code(), "Expression parse failed",
                "expression" => text
            );
        }
        result
    }

    fn parse_guarded(
        &mut self,
        text: &str,
        scope: Option<&dyn VariableScope>,
    ) -> ParseResult<ExpressionElement> {
        let length = text.chars().count();
        if length > MAX_EXPRESSION_LENGTH {
            return Err(ParseError::ExpressionTooLong {
                length,
                limit: MAX_EXPRESSION_LENGTH,
            });
        }

        let compacted = preprocess(text, &self.catalog, &mut self.arguments)?;

        // Degenerate case: the whole text reduced to one operand. A literal
        // (quoted string, scientific numeric) passes through as a value
        // leaf; anything else is not an expression.
        if compacted.starts_with(ARG_PREFIX) && self.arguments.contains(&compacted) {
            let raw = self
                .arguments
                .get(&compacted)
                .expect("single operand cached");
            return classify_literal(raw).ok_or_else(|| ParseError::invalid(text));
        }

        let mut candidates = SplitCandidates::build(&compacted, text, &self.catalog)?;
        let mut machine = ParserStateMachine::new(self.catalog.as_ref());
        let mut budget = SearchBudget::new(self.preferences.max_search_steps);
        let mut tried = 0usize;

        while let Some(elements) = candidates.next_candidate() {
            tried += 1;
            match machine.run(&elements, &mut budget) {
                CandidateOutcome::Parsed(mut tree) => {
                    resolve_leaves(&mut tree, &self.arguments, scope, text)?;
                    debug_assert!(tree.is_fully_resolved());
                    if self.preferences.log_parse_metrics {
                        log_success!(codes::success::PARSE_COMPLETE, "Expression parsed",
                            "expression" => text,
                            "candidates_tried" => tried,
                            "steps" => budget.consumed()
                        );
                    }
                    return Ok(ExpressionElement::expression(tree));
                }
                CandidateOutcome::Failed => {
                    if self.preferences.log_rejected_candidates {
                        log_debug!("Split candidate rejected",
                            "expression" => text,
                            "candidate" => tried
                        );
                    }
                }
                CandidateOutcome::OutOfBudget => {
                    return Err(ParseError::SearchBudgetExceeded {
                        expression: text.to_string(),
                        budget: budget.limit(),
                    });
                }
            }
        }
        Err(ParseError::invalid(text))
    }
}

/// Rightmost occurrence of `needle` that ends at or before `end`
fn find_last_occurrence(haystack: &[char], needle: &[char], end: usize) -> Option<usize> {
    if needle.is_empty() || end < needle.len() {
        return None;
    }
    (0..=end - needle.len())
        .rev()
        .find(|&start| haystack[start..start + needle.len()] == *needle)
}

/// First non-space character in the iteration direction
fn nearest_non_space<'a, I: Iterator<Item = &'a char>>(chars: I) -> Option<char> {
    chars.copied().find(|&ch| ch != ' ')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExpressionNode;
    use crate::config::operators::{OperatorEntry, OperatorSet};
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    fn parser_for(entries: &[(&str, &str, i32, usize)]) -> ExpressionParser {
        let entries: Vec<OperatorEntry> = entries
            .iter()
            .map(|(name, format, priority, arguments)| {
                OperatorEntry::new(name, format, *priority, *arguments)
            })
            .collect();
        let catalog = Arc::new(OperatorCatalog::build(&entries).expect("catalog builds"));
        ExpressionParser::new(catalog)
    }

    fn arithmetic_parser() -> ExpressionParser {
        parser_for(&[
            ("add", "{0}+{1}", 1, 2),
            ("multiply", "{0}*{1}", 2, 2),
        ])
    }

    fn standard_parser() -> ExpressionParser {
        let catalog =
            Arc::new(OperatorCatalog::from_operator_set(&OperatorSet::standard()).unwrap());
        ExpressionParser::new(catalog)
    }

    fn root_node(element: ExpressionElement) -> ExpressionNode {
        match element {
            ExpressionElement::Expression { node } => *node,
            other => panic!("expected an operator tree, got {}", other),
        }
    }

    #[test]
    fn test_precedence_example() {
        let mut parser = arithmetic_parser();
        let tree = root_node(parser.parse("1+2*3").expect("parses"));
        assert_eq!(tree.operation, "add");
        assert_eq!(tree.arguments[0], ExpressionElement::value("1"));
        match &tree.arguments[1] {
            ExpressionElement::Expression { node } => {
                assert_eq!(node.operation, "multiply");
                assert_eq!(node.arguments[0], ExpressionElement::value("2"));
                assert_eq!(node.arguments[1], ExpressionElement::value("3"));
            }
            other => panic!("expected nested multiply, got {}", other),
        }
    }

    #[test]
    fn test_prefix_and_index_interaction() {
        let mut parser = parser_for(&[
            ("negate", "-{0}", 1, 1),
            ("index", "{0}[{1}]", 2, 2),
        ]);
        let tree = root_node(parser.parse("-a[10]").expect("parses"));
        assert_eq!(tree.operation, "negate");
        match &tree.arguments[0] {
            ExpressionElement::Expression { node } => {
                assert_eq!(node.operation, "index");
                assert_eq!(node.arguments[0], ExpressionElement::variable("a"));
                assert_eq!(node.arguments[1], ExpressionElement::value("10"));
            }
            other => panic!("expected nested index, got {}", other),
        }
    }

    #[test]
    fn test_ambiguous_leading_token_backtracks() {
        // Both operators open with '#'; the high-priority ternary form needs
        // a second '#', so only the lower-priority reading can finish.
        let mut parser = parser_for(&[
            ("fence", "{0}#{1}#{2}", 9, 3),
            ("weak_hash", "{0}#{1}", 1, 2),
        ]);
        let tree = root_node(parser.parse("a#b").expect("parses"));
        assert_eq!(tree.operation, "weak_hash");
        assert_eq!(tree.arguments[0], ExpressionElement::variable("a"));
        assert_eq!(tree.arguments[1], ExpressionElement::variable("b"));
    }

    #[test]
    fn test_overlapping_tokens_backtrack_across_splits() {
        // ">=" decomposes as [">="] or [">", "="]. The only operator using
        // the ">=" token is a two-token form that cannot close on this
        // input, so the first arrangement dies in the state machine and the
        // odometer must advance to the [">", "="] reading.
        let mut parser = parser_for(&[
            ("between", "{0}>={1}>={2}", 9, 3),
            ("greater", "{0}>{1}", 3, 2),
            ("assert_eq_prefix", "={0}", 2, 1),
        ]);
        let tree = root_node(parser.parse("a>=b").expect("parses"));
        assert_eq!(tree.operation, "greater");
        assert_eq!(tree.arguments[0], ExpressionElement::variable("a"));
        match &tree.arguments[1] {
            ExpressionElement::Expression { node } => {
                assert_eq!(node.operation, "assert_eq_prefix");
                assert_eq!(node.arguments[0], ExpressionElement::variable("b"));
            }
            other => panic!("expected nested prefix operator, got {}", other),
        }
    }

    #[test]
    fn test_string_literal_isolation() {
        let mut parser = arithmetic_parser();
        let tree = root_node(parser.parse("a + \"1+2\"").expect("parses"));
        assert_eq!(tree.operation, "add");
        assert_eq!(tree.arguments[0], ExpressionElement::variable("a"));
        assert_eq!(tree.arguments[1], ExpressionElement::value("1+2"));
    }

    #[test]
    fn test_scientific_numeric_is_single_value_leaf() {
        let mut parser = standard_parser();
        let leaf = parser.parse("1E-10").expect("parses");
        assert_eq!(leaf, ExpressionElement::value("1E-10"));
    }

    #[test]
    fn test_lone_quoted_string_is_value_leaf() {
        let mut parser = standard_parser();
        let leaf = parser.parse("'a+b'").expect("parses");
        assert_eq!(leaf, ExpressionElement::value("a+b"));
    }

    #[test]
    fn test_adjacent_operands_fail() {
        let mut parser = arithmetic_parser();
        let result = parser.parse("a b");
        assert_matches!(result, Err(ref error) if error.is_syntax_error());
    }

    #[test]
    fn test_is_expression_filter() {
        let parser = arithmetic_parser();
        assert!(!parser.is_expression("abc"));
        assert!(parser.is_expression("a+b"));
    }

    #[test]
    fn test_rename_variable_bounded_occurrences() {
        let parser = arithmetic_parser();
        let (renamed, changed) = parser.rename_variable("a+b*a", "a", "x");
        assert_eq!(renamed, "x+b*x");
        assert!(changed);
    }

    #[test]
    fn test_rename_variable_ignores_substrings() {
        let parser = arithmetic_parser();
        let (renamed, changed) = parser.rename_variable("abc+1", "a", "x");
        assert_eq!(renamed, "abc+1");
        assert!(!changed);
    }

    #[test]
    fn test_rename_variable_respects_spaces() {
        let parser = arithmetic_parser();
        let (renamed, changed) = parser.rename_variable("count + 1", "count", "total");
        assert_eq!(renamed, "total + 1");
        assert!(changed);
    }

    #[test]
    fn test_rename_variable_longer_replacement() {
        let parser = arithmetic_parser();
        let (renamed, changed) = parser.rename_variable("a+a+a", "a", "long_name");
        assert_eq!(renamed, "long_name+long_name+long_name");
        assert!(changed);
    }

    #[test]
    fn test_scope_checked_parse() {
        let mut parser = arithmetic_parser();
        let mut scope = HashSet::new();
        scope.insert("a".to_string());

        let tree = root_node(parser.parse_in_scope("a+1", &scope).expect("parses"));
        assert_eq!(tree.arguments[0], ExpressionElement::variable("a"));

        let result = parser.parse_in_scope("b+1", &scope);
        assert_matches!(
            result,
            Err(ParseError::UnknownVariable { ref variable, .. }) if variable == "b"
        );
    }

    #[test]
    fn test_determinism() {
        let mut parser = standard_parser();
        let first = parser.parse("1+2*speed>=10").expect("parses");
        let second = parser.parse("1+2*speed>=10").expect("parses");
        assert_eq!(first, second);
    }

    #[test]
    fn test_unary_binds_before_infix() {
        let mut parser = standard_parser();
        let tree = root_node(parser.parse("-5*2").expect("parses"));
        assert_eq!(tree.operation, "multiply");
        match &tree.arguments[0] {
            ExpressionElement::Expression { node } => {
                assert_eq!(node.operation, "negate");
                assert_eq!(node.arguments[0], ExpressionElement::value("5"));
            }
            other => panic!("expected nested negate, got {}", other),
        }
        assert_eq!(tree.arguments[1], ExpressionElement::value("2"));
    }

    #[test]
    fn test_search_budget_is_enforced() {
        let catalog = Arc::new(
            OperatorCatalog::build(&[OperatorEntry::new("add", "{0}+{1}", 1, 2)]).unwrap(),
        );
        let preferences = ParserPreferences {
            max_search_steps: 1,
            log_parse_metrics: false,
            log_rejected_candidates: false,
        };
        let mut parser = ExpressionParser::with_preferences(catalog, preferences);
        let result = parser.parse("1+2");
        assert_matches!(result, Err(ParseError::SearchBudgetExceeded { budget: 1, .. }));
    }

    #[test]
    fn test_oversized_expression_is_rejected() {
        let mut parser = arithmetic_parser();
        let huge = "a+".repeat(MAX_EXPRESSION_LENGTH);
        let result = parser.parse(&huge);
        assert_matches!(result, Err(ParseError::ExpressionTooLong { .. }));
    }

    #[test]
    fn test_scratch_state_resets_between_calls() {
        let mut parser = arithmetic_parser();
        assert!(parser.parse("1+").is_err());
        let tree = root_node(parser.parse("1+2").expect("parses"));
        assert_eq!(tree.arguments[0], ExpressionElement::value("1"));
        assert_eq!(tree.arguments[1], ExpressionElement::value("2"));
    }
}
