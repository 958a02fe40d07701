//! Operator definitions derived from configured format patterns

use super::error::CatalogError;
use crate::config::operators::OperatorEntry;
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches one positional operand slot in a format pattern, e.g. `{0}`
static OPERAND_SLOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\d+\}").expect("operand slot pattern compiles"));

/// A format pattern whose first element is an operand: the operator takes a
/// left-hand operand
static LEFT_OPERAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{\d+\}.+").expect("left operand pattern compiles"));

/// A format pattern whose last element is an operand: the operator takes a
/// right-hand operand
static RIGHT_OPERAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".+\{\d+\}$").expect("right operand pattern compiles"));

/// One operator as the parser sees it: the literal token group split out of
/// the configured format pattern, operand flags, priority, and arity.
///
/// `"{0}+{1}"` yields token group `["+"]` with operands on both sides;
/// `"!{0}"` yields `["!"]` with only a right-hand operand; `"{0}[{1}]"`
/// yields `["[", "]"]` with a left-hand operand and an inner one.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorDefinition {
    name: String,
    pattern: String,
    token_group: Vec<String>,
    priority: i32,
    has_left_element: bool,
    has_right_element: bool,
    argument_count: usize,
    index: usize,
}

impl OperatorDefinition {
    /// Derive a definition from a configured entry, validating that the
    /// declared argument count matches what the format pattern implies.
    pub(crate) fn from_entry(entry: &OperatorEntry) -> Result<Self, CatalogError> {
        let token_group: Vec<String> = OPERAND_SLOT_RE
            .split(&entry.format)
            .filter(|part| !part.trim().is_empty())
            .map(|part| part.to_string())
            .collect();

        if token_group.is_empty() {
            return Err(CatalogError::EmptyTokenGroup {
                operator: entry.name.clone(),
            });
        }

        let has_left_element = LEFT_OPERAND_RE.is_match(&entry.format);
        let has_right_element = RIGHT_OPERAND_RE.is_match(&entry.format);

        let expected = token_group.len() - 1
            + usize::from(has_left_element)
            + usize::from(has_right_element);
        if expected != entry.arguments {
            return Err(CatalogError::InvalidOperatorFormat {
                operator: entry.name.clone(),
                declared: entry.arguments,
                expected,
            });
        }

        Ok(Self {
            name: entry.name.clone(),
            pattern: entry.format.clone(),
            token_group,
            priority: entry.priority,
            has_left_element,
            has_right_element,
            argument_count: entry.arguments,
            index: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn token_group(&self) -> &[String] {
        &self.token_group
    }

    /// The token that opens this operator
    pub fn leading_token(&self) -> &str {
        &self.token_group[0]
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn has_left_element(&self) -> bool {
        self.has_left_element
    }

    pub fn has_right_element(&self) -> bool {
        self.has_right_element
    }

    pub fn argument_count(&self) -> usize {
        self.argument_count
    }

    /// Position in the catalog's priority-descending ordering
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}
