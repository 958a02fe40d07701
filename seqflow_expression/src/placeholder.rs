//! Placeholder names used during parsing
//!
//! Extracted operands are replaced in the working buffer by `ARG{n}` names;
//! finalized sub-expressions are cached under `EXP{n}` names. The two prefixes
//! are how the later stages tell literal leaves from sub-expression references.

use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) const ARG_PREFIX: &str = "ARG";
pub(crate) const EXP_PREFIX: &str = "EXP";

/// Matches a placeholder name anywhere in a string
pub(crate) static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:ARG|EXP)\d+").expect("placeholder pattern compiles"));

/// Matches an operand placeholder occurrence
pub(crate) static ARG_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ARG\d+").expect("operand placeholder pattern compiles"));

pub(crate) fn arg_name(index: usize) -> String {
    format!("{}{}", ARG_PREFIX, index)
}

pub(crate) fn exp_name(index: usize) -> String {
    format!("{}{}", EXP_PREFIX, index)
}
