//! Expression preprocessing
//!
//! Isolates string literals, scientific-notation numerics, and residual
//! operand substrings from the raw text, replacing each with an `ARG{n}`
//! placeholder and caching the raw text. What remains in the working buffer
//! is placeholders and operator characters only.

use crate::catalog::OperatorCatalog;
use crate::config::constants::compile_time::preprocess::ARGUMENT_CACHE_CAPACITY;
use crate::parser::error::{ParseError, ParseResult};
use crate::placeholder::{arg_name, PLACEHOLDER_RE};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Scientific-notation numeric, e.g. `1.5E+3`. Handled before operator
/// splitting so the embedded sign is never read as an operator.
static SCI_NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?[Ee][+-]?\d+").expect("sci-numeric pattern compiles"));

/// Placeholder-name to raw-text mapping, scoped to one parse call
#[derive(Debug)]
pub(crate) struct ArgumentCache {
    values: HashMap<String, String>,
    next_index: usize,
}

impl ArgumentCache {
    pub fn new() -> Self {
        Self {
            values: HashMap::with_capacity(ARGUMENT_CACHE_CAPACITY),
            next_index: 0,
        }
    }

    /// Cache a raw value under the next free placeholder name
    pub fn store(&mut self, value: String) -> String {
        let name = arg_name(self.next_index);
        self.next_index += 1;
        self.values.insert(name.clone(), value);
        name
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.next_index = 0;
    }
}

/// Run all preprocessing passes over `text`, filling `cache` and returning
/// the compacted text.
pub(crate) fn preprocess(
    text: &str,
    catalog: &OperatorCatalog,
    cache: &mut ArgumentCache,
) -> ParseResult<String> {
    let mut buffer: Vec<char> = text.chars().collect();
    cache_strings_and_strip_spaces(&mut buffer, cache, text)?;
    cache_scientific_numerics(&mut buffer, cache);
    cache_residual_operands(&mut buffer, catalog, cache, text)?;
    Ok(buffer.iter().collect())
}

/// Right-to-left scan: cache quoted runs (quotes kept in the cached value)
/// and delete spaces outside them.
fn cache_strings_and_strip_spaces(
    buffer: &mut Vec<char>,
    cache: &mut ArgumentCache,
    text: &str,
) -> ParseResult<()> {
    let mut open_quote: Option<(usize, char)> = None;
    let mut i = buffer.len();
    while i > 0 {
        i -= 1;
        let ch = buffer[i];
        match open_quote {
            None if ch == '"' || ch == '\'' => {
                open_quote = Some((i, ch));
            }
            Some((closing, quote)) if ch == quote => {
                replace_span(buffer, cache, i, closing, text)?;
                open_quote = None;
            }
            None if ch == ' ' => {
                buffer.remove(i);
            }
            _ => {}
        }
    }
    if open_quote.is_some() {
        return Err(ParseError::unterminated_literal(text));
    }
    Ok(())
}

/// Cache every scientific-notation numeric, replacing right-to-left so
/// earlier match positions stay valid.
fn cache_scientific_numerics(buffer: &mut Vec<char>, cache: &mut ArgumentCache) {
    let snapshot: String = buffer.iter().collect();
    let matches: Vec<(usize, usize)> = SCI_NUMERIC_RE
        .find_iter(&snapshot)
        .map(|found| (found.start(), found.end()))
        .collect();
    for (byte_start, byte_end) in matches.into_iter().rev() {
        let start = snapshot[..byte_start].chars().count();
        let length = snapshot[byte_start..byte_end].chars().count();
        let value: String = buffer[start..start + length].iter().collect();
        let name = cache.store(value);
        buffer.splice(start..start + length, name.chars());
    }
}

/// Split the buffer on catalog tokens; every non-blank gap that is not an
/// already-cached placeholder is an operand. A gap that still contains a
/// placeholder name means two operands had no operator between them.
fn cache_residual_operands(
    buffer: &mut Vec<char>,
    catalog: &OperatorCatalog,
    cache: &mut ArgumentCache,
    text: &str,
) -> ParseResult<()> {
    let snapshot: String = buffer.iter().collect();
    let mut gaps: Vec<(usize, usize)> = Vec::new();
    let mut previous_end = 0;
    for found in catalog.split_regex().find_iter(&snapshot) {
        gaps.push((previous_end, found.start()));
        previous_end = found.end();
    }
    gaps.push((previous_end, snapshot.len()));

    for (byte_start, byte_end) in gaps.into_iter().rev() {
        let segment = &snapshot[byte_start..byte_end];
        if segment.trim().is_empty() {
            continue;
        }
        if cache.contains(segment) {
            continue;
        }
        if PLACEHOLDER_RE.is_match(segment) {
            return Err(ParseError::adjacent_operands(text));
        }
        let start = snapshot[..byte_start].chars().count();
        let length = segment.chars().count();
        let name = cache.store(segment.to_string());
        buffer.splice(start..start + length, name.chars());
    }
    Ok(())
}

/// Cache the trimmed text of `buffer[start..=end]` and replace the whole
/// span with the new placeholder name.
fn replace_span(
    buffer: &mut Vec<char>,
    cache: &mut ArgumentCache,
    start: usize,
    end: usize,
    text: &str,
) -> ParseResult<()> {
    let mut value_start = start;
    let mut value_end = end;
    while value_start <= value_end && buffer[value_start] == ' ' {
        value_start += 1;
    }
    while value_end > value_start && buffer[value_end] == ' ' {
        value_end -= 1;
    }
    if value_start > value_end {
        return Err(ParseError::empty_operand(text));
    }
    let value: String = buffer[value_start..=value_end].iter().collect();
    let name = cache.store(value);
    buffer.splice(start..=end, name.chars());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::operators::OperatorEntry;
    use assert_matches::assert_matches;

    fn arithmetic_catalog() -> OperatorCatalog {
        OperatorCatalog::build(&[
            OperatorEntry::new("add", "{0}+{1}", 110, 2),
            OperatorEntry::new("subtract", "{0}-{1}", 110, 2),
            OperatorEntry::new("multiply", "{0}*{1}", 120, 2),
        ])
        .expect("catalog builds")
    }

    fn run(text: &str) -> (String, ArgumentCache) {
        let catalog = arithmetic_catalog();
        let mut cache = ArgumentCache::new();
        let compacted = preprocess(text, &catalog, &mut cache).expect("preprocess");
        (compacted, cache)
    }

    #[test]
    fn test_operands_become_placeholders() {
        let (compacted, cache) = run("a+b");
        assert_eq!(compacted, "ARG1+ARG0");
        assert_eq!(cache.get("ARG1"), Some("a"));
        assert_eq!(cache.get("ARG0"), Some("b"));
    }

    #[test]
    fn test_spaces_removed_outside_strings() {
        let (compacted, _) = run(" a  + b ");
        assert_eq!(compacted, "ARG1+ARG0");
    }

    #[test]
    fn test_string_literal_is_isolated() {
        let (compacted, cache) = run("a + \"1+2\"");
        assert_eq!(compacted, "ARG1+ARG0");
        assert_eq!(cache.get("ARG0"), Some("\"1+2\""));
        assert_eq!(cache.get("ARG1"), Some("a"));
    }

    #[test]
    fn test_string_keeps_inner_spaces() {
        let (_, cache) = run("a+' x y '");
        assert_eq!(cache.get("ARG0"), Some("' x y '"));
    }

    #[test]
    fn test_multiple_string_literals() {
        let (compacted, cache) = run("'a'+'b'");
        assert_eq!(compacted, "ARG1+ARG0");
        assert_eq!(cache.get("ARG0"), Some("'b'"));
        assert_eq!(cache.get("ARG1"), Some("'a'"));
    }

    #[test]
    fn test_unterminated_string_fails() {
        let catalog = arithmetic_catalog();
        let mut cache = ArgumentCache::new();
        let result = preprocess("a+'b", &catalog, &mut cache);
        assert_matches!(result, Err(ParseError::UnterminatedLiteral { .. }));
    }

    #[test]
    fn test_scientific_numeric_is_single_operand() {
        let (compacted, cache) = run("1E-10");
        assert_eq!(compacted, "ARG0");
        assert_eq!(cache.get("ARG0"), Some("1E-10"));
    }

    #[test]
    fn test_scientific_numeric_in_context() {
        let (compacted, cache) = run("a*1.5e+3");
        assert_eq!(compacted, "ARG1*ARG0");
        assert_eq!(cache.get("ARG0"), Some("1.5e+3"));
    }

    #[test]
    fn test_adjacent_placeholders_fail() {
        let catalog = arithmetic_catalog();
        let mut cache = ArgumentCache::new();
        let result = preprocess("'a''b'", &catalog, &mut cache);
        assert_matches!(result, Err(ParseError::AdjacentOperands { .. }));
    }

    #[test]
    fn test_string_adjacent_to_operand_fails() {
        let catalog = arithmetic_catalog();
        let mut cache = ArgumentCache::new();
        let result = preprocess("'a'5+1", &catalog, &mut cache);
        assert_matches!(result, Err(ParseError::AdjacentOperands { .. }));
    }

    #[test]
    fn test_space_separated_operands_merge() {
        // Space removal happens before operand isolation, so "a b" is the
        // single operand "ab"; the parse stage rejects it later for having
        // no operator.
        let (compacted, cache) = run("a b");
        assert_eq!(compacted, "ARG0");
        assert_eq!(cache.get("ARG0"), Some("ab"));
    }

    #[test]
    fn test_cache_clear_resets_indices() {
        let mut cache = ArgumentCache::new();
        cache.store("x".to_string());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.store("y".to_string()), "ARG0");
    }
}
