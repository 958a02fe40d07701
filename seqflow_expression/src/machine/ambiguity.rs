//! Ambiguity snapshots for the backtracking search

use super::operator_instance::OperatorInstance;
use crate::catalog::OperatorDefinition;
use std::collections::VecDeque;

/// A saved decision point: the parser state right before committing to one of
/// several operator candidates, plus the candidates not yet tried. Consumed
/// LIFO; a point is dropped once its candidate list empties.
#[derive(Debug)]
pub(crate) struct AmbiguityPoint<'c> {
    pub element_index: usize,
    pub operator_stack_depth: usize,
    pub expression_index: usize,
    pub current: Option<OperatorInstance<'c>>,
    pub left_argument: Option<String>,
    pub candidates: VecDeque<&'c OperatorDefinition>,
}

impl<'c> AmbiguityPoint<'c> {
    pub fn new(
        element_index: usize,
        operator_stack_depth: usize,
        expression_index: usize,
        current: Option<OperatorInstance<'c>>,
        left_argument: Option<String>,
        candidates: Vec<&'c OperatorDefinition>,
    ) -> Self {
        debug_assert!(
            !candidates.is_empty(),
            "ambiguity point created without candidates"
        );
        Self {
            element_index,
            operator_stack_depth,
            expression_index,
            current,
            left_argument,
            candidates: candidates.into(),
        }
    }

    /// Hand out the next untried candidate
    pub fn take_candidate(&mut self) -> &'c OperatorDefinition {
        self.candidates
            .pop_front()
            .expect("ambiguity point with no remaining candidates")
    }

    pub fn is_exhausted(&self) -> bool {
        self.candidates.is_empty()
    }
}
