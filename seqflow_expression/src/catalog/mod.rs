//! Operator catalog
//!
//! The immutable, shared index over all configured operators. Built once per
//! configuration load and handed to any number of parser instances behind an
//! `Arc`; never mutated after construction.

pub mod definition;
pub mod error;

pub use definition::OperatorDefinition;
pub use error::{CatalogError, CatalogResult};

use crate::config::constants::compile_time::arrange::MAX_TOKEN_RUN_LENGTH;
use crate::config::operators::{OperatorEntry, OperatorSet};
use crate::log_warning;
use regex::Regex;
use std::collections::HashSet;

/// Immutable operator catalog: definitions sorted by descending priority
/// (stable on ties by registration order), the union of all tokens and token
/// characters, and the compiled residual-element split pattern.
#[derive(Debug)]
pub struct OperatorCatalog {
    definitions: Vec<OperatorDefinition>,
    token_set: HashSet<String>,
    token_chars: HashSet<char>,
    max_token_length: usize,
    max_token_run: usize,
    split_regex: Regex,
}

impl OperatorCatalog {
    /// Build a catalog from ordered operator entries.
    ///
    /// Fails if the set is empty, a name repeats, or any entry violates the
    /// arity rule its format pattern implies.
    pub fn build(entries: &[OperatorEntry]) -> CatalogResult<Self> {
        if entries.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let mut seen_names: HashSet<&str> = HashSet::with_capacity(entries.len());
        let mut definitions = Vec::with_capacity(entries.len());
        for entry in entries {
            if !seen_names.insert(entry.name.as_str()) {
                return Err(CatalogError::DuplicateOperator {
                    operator: entry.name.clone(),
                });
            }
            definitions.push(OperatorDefinition::from_entry(entry)?);
        }

        // Stable sort keeps registration order on priority ties
        definitions.sort_by(|a, b| b.priority().cmp(&a.priority()));
        for (index, definition) in definitions.iter_mut().enumerate() {
            definition.set_index(index);
        }

        let mut token_set = HashSet::new();
        let mut token_chars = HashSet::new();
        let mut max_token_length = 0;
        for definition in &definitions {
            for token in definition.token_group() {
                let length = token.chars().count();
                if length > MAX_TOKEN_RUN_LENGTH {
                    log_warning!("Operator token longer than the supported run length",
                        "operator" => definition.name(),
                        "token" => token,
                        "limit" => MAX_TOKEN_RUN_LENGTH
                    );
                }
                max_token_length = max_token_length.max(length);
                token_set.insert(token.clone());
                token_chars.extend(token.chars());
            }
        }

        let split_regex = build_split_regex(&token_set);

        Ok(Self {
            definitions,
            token_set,
            token_chars,
            max_token_length,
            max_token_run: MAX_TOKEN_RUN_LENGTH,
            split_regex,
        })
    }

    /// Build a catalog from a loaded operator set
    pub fn from_operator_set(set: &OperatorSet) -> CatalogResult<Self> {
        Self::build(&set.operators)
    }

    /// All definitions, highest priority first
    pub fn definitions(&self) -> &[OperatorDefinition] {
        &self.definitions
    }

    /// Look up a definition by operator name
    pub fn definition(&self, name: &str) -> Option<&OperatorDefinition> {
        self.definitions.iter().find(|def| def.name() == name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Whether `token` is the literal token of any operator
    pub fn contains_token(&self, token: &str) -> bool {
        self.token_set.contains(token)
    }

    /// Whether `ch` appears in any operator token
    pub fn contains_operator_char(&self, ch: char) -> bool {
        self.token_chars.contains(&ch)
    }

    /// Whether any character of `text` belongs to the operator character set.
    /// The cheap filter callers use to decide if a parameter value should be
    /// compiled as an expression at all.
    pub fn has_expression_characters(&self, text: &str) -> bool {
        text.chars().any(|ch| self.contains_operator_char(ch))
    }

    /// Length in characters of the longest configured token
    pub fn max_token_length(&self) -> usize {
        self.max_token_length
    }

    /// Longest supported run of operator characters between operands
    pub fn max_token_run(&self) -> usize {
        self.max_token_run
    }

    /// Compiled alternation over all tokens, longest first, used to isolate
    /// operand substrings during preprocessing
    pub(crate) fn split_regex(&self) -> &Regex {
        &self.split_regex
    }

    /// Operators whose leading token is `token` and whose left-operand flag
    /// matches `has_left`, in priority order
    pub(crate) fn leading_candidates(
        &self,
        token: &str,
        has_left: bool,
    ) -> Vec<&OperatorDefinition> {
        self.definitions
            .iter()
            .filter(|def| def.leading_token() == token && def.has_left_element() == has_left)
            .collect()
    }
}

/// Alternation over all distinct tokens, longest token first so overlapping
/// tokens resolve deterministically (`>=` wins over `>` at the same position)
fn build_split_regex(token_set: &HashSet<String>) -> Regex {
    let mut tokens: Vec<&String> = token_set.iter().collect();
    tokens.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    let pattern = tokens
        .iter()
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&pattern).expect("token alternation compiles")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn catalog(entries: &[(&str, &str, i32, usize)]) -> OperatorCatalog {
        let entries: Vec<OperatorEntry> = entries
            .iter()
            .map(|(name, format, priority, arguments)| {
                OperatorEntry::new(name, format, *priority, *arguments)
            })
            .collect();
        OperatorCatalog::build(&entries).expect("catalog builds")
    }

    #[test]
    fn test_priority_descending_order() {
        let catalog = catalog(&[
            ("add", "{0}+{1}", 1, 2),
            ("multiply", "{0}*{1}", 2, 2),
            ("index", "{0}[{1}]", 3, 2),
        ]);
        let names: Vec<&str> = catalog.definitions().iter().map(|d| d.name()).collect();
        assert_eq!(names, ["index", "multiply", "add"]);
        assert_eq!(catalog.definitions()[0].index(), 0);
        assert_eq!(catalog.definitions()[2].index(), 2);
    }

    #[test]
    fn test_stable_order_on_priority_ties() {
        let catalog = catalog(&[
            ("multiply", "{0}*{1}", 5, 2),
            ("divide", "{0}/{1}", 5, 2),
            ("modulo", "{0}%{1}", 5, 2),
        ]);
        let names: Vec<&str> = catalog.definitions().iter().map(|d| d.name()).collect();
        assert_eq!(names, ["multiply", "divide", "modulo"]);
    }

    #[test]
    fn test_token_and_char_sets() {
        let catalog = catalog(&[
            ("greater_or_equal", "{0}>={1}", 2, 2),
            ("greater_than", "{0}>{1}", 1, 2),
        ]);
        assert!(catalog.contains_token(">="));
        assert!(catalog.contains_token(">"));
        assert!(!catalog.contains_token("<"));
        assert!(catalog.contains_operator_char('>'));
        assert!(catalog.contains_operator_char('='));
        assert_eq!(catalog.max_token_length(), 2);
    }

    #[test]
    fn test_expression_character_filter() {
        let catalog = catalog(&[("add", "{0}+{1}", 1, 2)]);
        assert!(catalog.has_expression_characters("a+b"));
        assert!(!catalog.has_expression_characters("abc"));
    }

    #[test]
    fn test_leading_candidates_respect_left_flag() {
        let catalog = catalog(&[
            ("subtract", "{0}-{1}", 2, 2),
            ("negate", "-{0}", 1, 1),
        ]);
        let with_left = catalog.leading_candidates("-", true);
        assert_eq!(with_left.len(), 1);
        assert_eq!(with_left[0].name(), "subtract");

        let without_left = catalog.leading_candidates("-", false);
        assert_eq!(without_left.len(), 1);
        assert_eq!(without_left[0].name(), "negate");
    }

    #[test]
    fn test_leading_candidates_priority_order() {
        let catalog = catalog(&[
            ("weak_dash", "{0}-{1}", 1, 2),
            ("strong_dash", "{0}-{1}-{2}", 9, 3),
        ]);
        let candidates = catalog.leading_candidates("-", true);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name(), "strong_dash");
        assert_eq!(candidates[1].name(), "weak_dash");
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let entries = vec![
            OperatorEntry::new("add", "{0}+{1}", 1, 2),
            OperatorEntry::new("add", "{0}-{1}", 1, 2),
        ];
        assert_matches!(
            OperatorCatalog::build(&entries),
            Err(CatalogError::DuplicateOperator { .. })
        );
    }

    #[test]
    fn test_empty_set_is_rejected() {
        assert_matches!(OperatorCatalog::build(&[]), Err(CatalogError::EmptyCatalog));
    }

    #[test]
    fn test_invalid_arity_names_operator() {
        let entries = vec![OperatorEntry::new("select", "{0}?{1}:{2}", 1, 2)];
        let error = OperatorCatalog::build(&entries).unwrap_err();
        assert!(error.to_string().contains("select"));
    }

    #[test]
    fn test_split_regex_prefers_longest_token() {
        let catalog = catalog(&[
            ("greater_than", "{0}>{1}", 1, 2),
            ("greater_or_equal", "{0}>={1}", 1, 2),
        ]);
        let matched = catalog.split_regex().find("a>=b").expect("match");
        assert_eq!(matched.as_str(), ">=");
    }

    #[test]
    fn test_standard_set_builds() {
        let set = OperatorSet::standard();
        let catalog = OperatorCatalog::from_operator_set(&set).expect("standard set builds");
        assert_eq!(catalog.len(), set.operators.len());
    }
}
