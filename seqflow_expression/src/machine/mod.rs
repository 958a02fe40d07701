//! Parse state machine
//!
//! Consumes one fully-split token array and attempts to build an operator
//! tree via a bounded backtracking search. The walk keys off four pieces of
//! state: the operator being matched ("current"), a stashed operand awaiting
//! its consumer ("left argument"), suspended outer operators (operator
//! stack), and saved decision points (ambiguity stack). A failed branch is a
//! value-level outcome, never an unwinding error: the driver restores the
//! newest ambiguity point and resumes with its next candidate, and a restore
//! with no points left simply fails the candidate.

pub mod ambiguity;
pub mod operator_instance;

use crate::ast::linker::link_expression;
use crate::ast::ExpressionNode;
use crate::catalog::{OperatorCatalog, OperatorDefinition};
use crate::config::constants::compile_time::parse::{
    EXPRESSION_CACHE_CAPACITY, STACK_CAPACITY,
};
use crate::placeholder::{exp_name, ARG_PREFIX, EXP_PREFIX};
use ambiguity::AmbiguityPoint;
use operator_instance::OperatorInstance;
use std::collections::HashMap;

/// Result of feeding one split candidate through the machine
#[derive(Debug)]
pub(crate) enum CandidateOutcome {
    /// The candidate parsed; the tree still holds `ARG{n}` leaves
    Parsed(ExpressionNode),
    /// The candidate has no legal interpretation
    Failed,
    /// The shared step budget ran out; the whole parse call must stop
    OutOfBudget,
}

/// Step budget shared across all candidates of one parse call
#[derive(Debug)]
pub(crate) struct SearchBudget {
    remaining: usize,
    limit: usize,
}

impl SearchBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            remaining: limit,
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn consumed(&self) -> usize {
        self.limit - self.remaining
    }

    fn consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

enum StepOutcome {
    /// Move on to the next element
    Advance,
    /// An ambiguity point was restored; the element index is already set
    Backtracked,
    /// The walk reached a legal end state
    Finished,
    /// Backtrack was required but no ambiguity point remains
    Dead,
}

pub(crate) struct ParserStateMachine<'c> {
    catalog: &'c OperatorCatalog,
    operator_stack: Vec<OperatorInstance<'c>>,
    ambiguity_stack: Vec<AmbiguityPoint<'c>>,
    expressions: HashMap<String, ExpressionNode>,
    expression_index: usize,
    element_index: usize,
    current: Option<OperatorInstance<'c>>,
    left_argument: Option<String>,
    /// Candidate handed back by the last restore; consumed by the next
    /// token lookup in place of a catalog query
    resumed_candidate: Option<&'c OperatorDefinition>,
}

impl<'c> ParserStateMachine<'c> {
    pub fn new(catalog: &'c OperatorCatalog) -> Self {
        Self {
            catalog,
            operator_stack: Vec::with_capacity(STACK_CAPACITY),
            ambiguity_stack: Vec::with_capacity(STACK_CAPACITY),
            expressions: HashMap::with_capacity(EXPRESSION_CACHE_CAPACITY),
            expression_index: 0,
            element_index: 0,
            current: None,
            left_argument: None,
            resumed_candidate: None,
        }
    }

    /// Try to parse one fully-split candidate. All scratch state is reset on
    /// every exit path.
    pub fn run(&mut self, elements: &[String], budget: &mut SearchBudget) -> CandidateOutcome {
        self.reset();
        let outcome = self.drive(elements, budget);
        self.reset();
        outcome
    }

    fn drive(&mut self, elements: &[String], budget: &mut SearchBudget) -> CandidateOutcome {
        loop {
            if !budget.consume() {
                return CandidateOutcome::OutOfBudget;
            }
            let outcome = if self.element_index < elements.len() {
                let element = elements[self.element_index].clone();
                if element.starts_with(ARG_PREFIX) {
                    self.on_argument(&element)
                } else {
                    self.on_token(&element)
                }
            } else {
                self.on_end()
            };
            match outcome {
                StepOutcome::Advance => self.element_index += 1,
                StepOutcome::Backtracked => {}
                StepOutcome::Finished => break,
                StepOutcome::Dead => return CandidateOutcome::Failed,
            }
        }

        // Only a finalized operator tree counts as a result; a bare operand
        // placeholder means no operator was consumed at all.
        let root = match self.left_argument.take() {
            Some(name) if name.starts_with(EXP_PREFIX) => name,
            _ => return CandidateOutcome::Failed,
        };
        match link_expression(&root, &mut self.expressions) {
            Some(tree) => CandidateOutcome::Parsed(tree),
            None => CandidateOutcome::Failed,
        }
    }

    fn reset(&mut self) {
        self.operator_stack.clear();
        self.ambiguity_stack.clear();
        self.expressions.clear();
        self.expression_index = 0;
        self.element_index = 0;
        self.current = None;
        self.left_argument = None;
        self.resumed_candidate = None;
    }

    // ------------------------------------------------------------------
    // Element class: operand placeholder
    // ------------------------------------------------------------------

    fn on_argument(&mut self, name: &str) -> StepOutcome {
        if self.current.is_none() && self.left_argument.is_none() {
            if let Some(resumed) = self.operator_stack.pop() {
                self.current = Some(resumed);
                return self.on_argument(name);
            }
        }
        match (self.current.is_some(), self.left_argument.is_some()) {
            (false, false) => {
                self.left_argument = Some(name.to_string());
                StepOutcome::Advance
            }
            (true, false) => {
                let wants_operand = self
                    .current
                    .as_ref()
                    .expect("current operator present")
                    .needs_right_element();
                if wants_operand {
                    self.left_argument = Some(name.to_string());
                    StepOutcome::Advance
                } else {
                    self.backtrack()
                }
            }
            // An operand with one already pending never has a legal
            // continuation here
            (_, true) => self.backtrack(),
        }
    }

    // ------------------------------------------------------------------
    // Element class: operator token
    // ------------------------------------------------------------------

    fn on_token(&mut self, token: &str) -> StepOutcome {
        if self.current.is_none() {
            if let Some(resumed) = self.operator_stack.pop() {
                self.current = Some(resumed);
                return self.on_token(token);
            }
        }
        match (self.current.is_some(), self.left_argument.is_some()) {
            (false, false) => self.open_operator(token, false),
            (false, true) => self.open_operator(token, true),
            (true, false) => self.suspend_and_open(token),
            (true, true) => self.on_token_with_operand(token),
        }
    }

    /// No operator in flight: open one whose left-operand flag matches the
    /// pending-operand state, consuming that operand if present.
    fn open_operator(&mut self, token: &str, has_left: bool) -> StepOutcome {
        let mut candidates = self.available(token, has_left);
        if candidates.is_empty() {
            return self.backtrack();
        }
        let first = candidates.remove(0);
        if !candidates.is_empty() {
            self.push_ambiguity(candidates);
        }
        let mut opened = OperatorInstance::new(first, self.element_index);
        if has_left {
            let operand = self.left_argument.take().expect("pending operand present");
            opened.push_argument(operand);
        }
        self.current = Some(opened);
        if has_left {
            self.finalize_if_complete();
        }
        StepOutcome::Advance
    }

    /// Operator in flight but no pending operand: a new operand-free opener
    /// (e.g. a prefix) starts inside it; the outer operator is suspended.
    fn suspend_and_open(&mut self, token: &str) -> StepOutcome {
        let mut candidates = self.available(token, false);
        if candidates.is_empty() {
            return self.backtrack();
        }
        let first = candidates.remove(0);
        if !candidates.is_empty() {
            self.push_ambiguity(candidates);
        }
        let suspended = self.current.take().expect("current operator present");
        self.operator_stack.push(suspended);
        self.current = Some(OperatorInstance::new(first, self.element_index));
        self.left_argument = None;
        StepOutcome::Advance
    }

    /// Operator in flight and an operand pending: continuation tokens,
    /// precedence reduction, and suspension all meet here.
    fn on_token_with_operand(&mut self, token: &str) -> StepOutcome {
        let mut right_candidates = self.available(token, true);
        let (fits_continuation, awaiting_final_argument, current_priority) = {
            let current = self.current.as_ref().expect("current operator present");
            (
                current.accepts_continuation(token),
                current.needs_right_element() && current.tokens_exhausted(),
                current.priority(),
            )
        };

        if awaiting_final_argument {
            if right_candidates.is_empty() {
                return self.reduce_into_suspended(token);
            }
            let first = right_candidates.remove(0);
            if !right_candidates.is_empty() {
                self.push_ambiguity(right_candidates);
            }
            if current_priority >= first.priority() {
                // Precedence reduction: the open operator binds at least as
                // tightly, so it closes over the pending operand and its
                // result becomes the new operator's first argument.
                let mut closing = self.current.take().expect("current operator present");
                let operand = self.left_argument.take().expect("pending operand present");
                closing.push_argument(operand);
                let closed_name = self.finalize(closing);
                let mut opened = OperatorInstance::new(first, self.element_index);
                opened.push_argument(closed_name);
                self.current = Some(opened);
            } else {
                // The new operator binds tighter: suspend the open one and
                // give the pending operand to the newcomer.
                let suspended = self.current.take().expect("current operator present");
                self.operator_stack.push(suspended);
                let operand = self.left_argument.take().expect("pending operand present");
                let mut opened = OperatorInstance::new(first, self.element_index);
                opened.push_argument(operand);
                self.current = Some(opened);
            }
            self.finalize_if_complete();
            return StepOutcome::Advance;
        }

        if fits_continuation {
            let operand = self.left_argument.take().expect("pending operand present");
            let current = self.current.as_mut().expect("current operator present");
            current.push_argument(operand);
            current.advance_token();
            self.finalize_if_complete();
            return StepOutcome::Advance;
        }

        if right_candidates.is_empty() {
            return self.backtrack();
        }
        let first = right_candidates.remove(0);
        if !right_candidates.is_empty() {
            self.push_ambiguity(right_candidates);
        }
        let suspended = self.current.take().expect("current operator present");
        self.operator_stack.push(suspended);
        let operand = self.left_argument.take().expect("pending operand present");
        let mut opened = OperatorInstance::new(first, self.element_index);
        opened.push_argument(operand);
        self.current = Some(opened);
        self.finalize_if_complete();
        StepOutcome::Advance
    }

    /// The current operator awaits its final argument but the token opens
    /// nothing. If a suspended operator can consume the closed result (the
    /// token continues it, or it too awaits only a final argument), close
    /// the current operator and resume the suspended one on this same
    /// element; otherwise backtrack.
    fn reduce_into_suspended(&mut self, token: &str) -> StepOutcome {
        let resumable = match self.operator_stack.last() {
            Some(top) => {
                (top.accepts_continuation(token) && top.needs_right_element())
                    || (top.needs_right_element() && top.tokens_exhausted())
            }
            None => false,
        };
        if !resumable {
            return self.backtrack();
        }
        let mut closing = self.current.take().expect("current operator present");
        let operand = self.left_argument.take().expect("pending operand present");
        closing.push_argument(operand);
        let closed_name = self.finalize(closing);
        self.left_argument = Some(closed_name);
        self.current = self.operator_stack.pop();
        self.on_token(token)
    }

    // ------------------------------------------------------------------
    // Element class: end of input
    // ------------------------------------------------------------------

    fn on_end(&mut self) -> StepOutcome {
        if self.current.is_none() {
            if let Some(resumed) = self.operator_stack.pop() {
                self.current = Some(resumed);
                return self.on_end();
            }
        }
        match (self.current.is_some(), self.left_argument.is_some()) {
            (false, _) => StepOutcome::Finished,
            (true, false) => {
                let complete = self
                    .current
                    .as_ref()
                    .expect("current operator present")
                    .is_complete();
                if !complete {
                    return self.backtrack();
                }
                let closing = self.current.take().expect("current operator present");
                let closed_name = self.finalize(closing);
                self.left_argument = Some(closed_name);
                match self.operator_stack.pop() {
                    Some(resumed) => {
                        self.current = Some(resumed);
                        self.on_end()
                    }
                    None => StepOutcome::Finished,
                }
            }
            (true, true) => {
                let needs_right = self
                    .current
                    .as_ref()
                    .expect("current operator present")
                    .needs_right_element();
                if needs_right {
                    let operand = self.left_argument.take().expect("pending operand present");
                    let current = self.current.as_mut().expect("current operator present");
                    current.push_argument(operand);
                    if current.is_complete() {
                        let closing = self.current.take().expect("current operator present");
                        let closed_name = self.finalize(closing);
                        self.left_argument = Some(closed_name);
                        return match self.operator_stack.pop() {
                            Some(resumed) => {
                                self.current = Some(resumed);
                                self.on_end()
                            }
                            None => StepOutcome::Finished,
                        };
                    }
                }
                self.backtrack()
            }
        }
    }

    // ------------------------------------------------------------------
    // Shared actions
    // ------------------------------------------------------------------

    /// Catalog operators opening with `token` whose left-operand flag
    /// matches, in priority order; after a restore, the restored candidate
    /// alone.
    fn available(&mut self, token: &str, has_left: bool) -> Vec<&'c OperatorDefinition> {
        if let Some(resumed) = self.resumed_candidate.take() {
            return vec![resumed];
        }
        self.catalog.leading_candidates(token, has_left)
    }

    /// Snapshot the pre-commit state together with the not-yet-tried
    /// candidates for this element.
    fn push_ambiguity(&mut self, candidates: Vec<&'c OperatorDefinition>) {
        self.ambiguity_stack.push(AmbiguityPoint::new(
            self.element_index,
            self.operator_stack.len(),
            self.expression_index,
            self.current.clone(),
            self.left_argument.clone(),
            candidates,
        ));
    }

    /// Restore the newest ambiguity point and arrange for its next candidate
    /// to be the sole lookup result at the restored element.
    fn backtrack(&mut self) -> StepOutcome {
        let Some(point) = self.ambiguity_stack.last_mut() else {
            return StepOutcome::Dead;
        };
        let element_index = point.element_index;
        let stack_depth = point.operator_stack_depth;
        let expression_index = point.expression_index;
        let current = point.current.clone();
        let left_argument = point.left_argument.clone();
        let next_candidate = point.take_candidate();
        let exhausted = point.is_exhausted();
        if exhausted {
            self.ambiguity_stack.pop();
        }

        self.element_index = element_index;
        self.operator_stack.truncate(stack_depth);
        self.current = current;
        self.left_argument = left_argument;
        // Drop sub-expressions finalized after the snapshot and rewind the
        // counter; the restored state only references earlier names.
        for stale in expression_index..self.expression_index {
            self.expressions.remove(&exp_name(stale));
        }
        self.expression_index = expression_index;
        self.resumed_candidate = Some(next_candidate);
        StepOutcome::Backtracked
    }

    /// Cache a closed operator under the next `EXP{n}` name
    fn finalize(&mut self, instance: OperatorInstance<'c>) -> String {
        let node = instance.create_node();
        let name = exp_name(self.expression_index);
        self.expression_index += 1;
        crate::log_debug!("Operator closed",
            "operation" => node.operation,
            "cached_as" => name,
            "opened_at" => instance.start_index()
        );
        self.expressions.insert(name.clone(), node);
        name
    }

    /// If the current operator just completed, close it, stash its name as
    /// the pending operand, and resume any suspended operator.
    fn finalize_if_complete(&mut self) {
        let complete = self
            .current
            .as_ref()
            .is_some_and(|current| current.is_complete());
        if !complete {
            return;
        }
        let closing = self.current.take().expect("current operator present");
        let closed_name = self.finalize(closing);
        self.left_argument = Some(closed_name);
        self.current = self.operator_stack.pop();
    }
}
