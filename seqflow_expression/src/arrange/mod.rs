//! Split arrangements
//!
//! Between operand placeholders the compacted text holds maximal runs of
//! operator characters. Each run must decompose into a sequence of catalog
//! tokens, and a run can decompose several ways when tokens overlap. This
//! module enumerates every run's valid decompositions and walks the lazy
//! Cartesian product of those choices, one fully-split token array at a time.

use crate::catalog::OperatorCatalog;
use crate::config::constants::compile_time::arrange::MAX_TOKEN_RUN_LENGTH;
use crate::parser::error::{ParseError, ParseResult};
use crate::placeholder::ARG_NAME_RE;
use once_cell::sync::Lazy;

/// Compositions (ordered integer partitions) of every length up to the run
/// limit, generated first-part-largest so fewer, longer tokens come first.
/// Computed once per process.
static COMPOSITIONS: Lazy<Vec<Vec<Vec<usize>>>> = Lazy::new(|| {
    let mut levels: Vec<Vec<Vec<usize>>> = Vec::with_capacity(MAX_TOKEN_RUN_LENGTH);
    for length in 1..=MAX_TOKEN_RUN_LENGTH {
        let mut level: Vec<Vec<usize>> = Vec::new();
        for first in (1..=length).rev() {
            if first == length {
                level.push(vec![length]);
            } else {
                for tail in &levels[length - first - 1] {
                    let mut composition = Vec::with_capacity(tail.len() + 1);
                    composition.push(first);
                    composition.extend_from_slice(tail);
                    level.push(composition);
                }
            }
        }
        levels.push(level);
    }
    levels
});

/// Compositions of `length`, or `None` beyond the supported run limit
pub(crate) fn compositions(length: usize) -> Option<&'static [Vec<usize>]> {
    if length == 0 {
        return None;
    }
    COMPOSITIONS.get(length - 1).map(Vec::as_slice)
}

#[derive(Debug)]
enum Part {
    Operand(String),
    Run(usize),
}

/// Lazy enumeration of fully-split token arrays for one compacted expression
#[derive(Debug)]
pub(crate) struct SplitCandidates {
    parts: Vec<Part>,
    group_splits: Vec<Vec<Vec<String>>>,
    counters: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl SplitCandidates {
    /// Locate placeholders, validate every operator run, and prepare the
    /// odometer. Fails up front when any run is oversized or has no valid
    /// decomposition.
    pub fn build(
        compacted: &str,
        expression: &str,
        catalog: &OperatorCatalog,
    ) -> ParseResult<Self> {
        let mut parts = Vec::new();
        let mut group_splits: Vec<Vec<Vec<String>>> = Vec::new();
        let mut previous_end = 0;

        let mut push_run = |parts: &mut Vec<Part>,
                            group_splits: &mut Vec<Vec<Vec<String>>>,
                            run: &str|
         -> ParseResult<()> {
            group_splits.push(valid_splits(run, expression, catalog)?);
            parts.push(Part::Run(group_splits.len() - 1));
            Ok(())
        };

        for found in ARG_NAME_RE.find_iter(compacted) {
            if found.start() > previous_end {
                push_run(
                    &mut parts,
                    &mut group_splits,
                    &compacted[previous_end..found.start()],
                )?;
            }
            parts.push(Part::Operand(found.as_str().to_string()));
            previous_end = found.end();
        }
        if previous_end < compacted.len() {
            push_run(&mut parts, &mut group_splits, &compacted[previous_end..])?;
        }

        let counters = vec![0; group_splits.len()];
        Ok(Self {
            parts,
            group_splits,
            counters,
            started: false,
            exhausted: false,
        })
    }

    /// The next fully-split token array, or `None` once every combination of
    /// run decompositions has been handed out.
    pub fn next_candidate(&mut self) -> Option<Vec<String>> {
        if self.exhausted {
            return None;
        }
        if self.started && !self.advance() {
            self.exhausted = true;
            return None;
        }
        self.started = true;
        Some(self.assemble())
    }

    /// Total number of combinations, for diagnostics
    pub fn candidate_count(&self) -> usize {
        self.group_splits
            .iter()
            .map(|splits| splits.len())
            .product()
    }

    /// Advance the last group with an unused alternative and restart every
    /// later group from its first decomposition.
    fn advance(&mut self) -> bool {
        for index in (0..self.counters.len()).rev() {
            if self.counters[index] + 1 < self.group_splits[index].len() {
                self.counters[index] += 1;
                for later in self.counters[index + 1..].iter_mut() {
                    *later = 0;
                }
                return true;
            }
        }
        false
    }

    fn assemble(&self) -> Vec<String> {
        let mut elements = Vec::new();
        for part in &self.parts {
            match part {
                Part::Operand(name) => elements.push(name.clone()),
                Part::Run(group) => elements
                    .extend_from_slice(&self.group_splits[*group][self.counters[*group]]),
            }
        }
        elements
    }
}

/// Every decomposition of `run` whose slices are all catalog tokens
fn valid_splits(
    run: &str,
    expression: &str,
    catalog: &OperatorCatalog,
) -> ParseResult<Vec<Vec<String>>> {
    let chars: Vec<char> = run.chars().collect();
    let length = chars.len();
    if length > catalog.max_token_run() {
        return Err(ParseError::TokenRunTooLong {
            run: run.to_string(),
            expression: expression.to_string(),
            limit: catalog.max_token_run(),
        });
    }
    let compositions = compositions(length).expect("run length within composition table");

    let mut splits = Vec::new();
    'composition: for composition in compositions {
        let mut tokens = Vec::with_capacity(composition.len());
        let mut start = 0;
        for &part_length in composition {
            let token: String = chars[start..start + part_length].iter().collect();
            if !catalog.contains_token(&token) {
                continue 'composition;
            }
            tokens.push(token);
            start += part_length;
        }
        splits.push(tokens);
    }

    if splits.is_empty() {
        return Err(ParseError::UnsplittableTokenRun {
            run: run.to_string(),
            expression: expression.to_string(),
        });
    }
    Ok(splits)
}
