//! Per-operator traversal state

use crate::ast::{ExpressionElement, ExpressionNode};
use crate::catalog::OperatorDefinition;

/// One operator being matched: how far through its token group the scan has
/// come and which arguments it has collected so far. Cloned wholesale into
/// ambiguity snapshots.
#[derive(Debug, Clone)]
pub(crate) struct OperatorInstance<'c> {
    definition: &'c OperatorDefinition,
    start_index: usize,
    token_cursor: usize,
    arguments: Vec<String>,
}

impl<'c> OperatorInstance<'c> {
    pub fn new(definition: &'c OperatorDefinition, start_index: usize) -> Self {
        Self {
            definition,
            start_index,
            token_cursor: 0,
            arguments: Vec::with_capacity(definition.argument_count()),
        }
    }

    pub fn definition(&self) -> &'c OperatorDefinition {
        self.definition
    }

    pub fn priority(&self) -> i32 {
        self.definition.priority()
    }

    /// Index of the element that opened this operator
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Whether `token` is this operator's next expected continuation token
    pub fn accepts_continuation(&self, token: &str) -> bool {
        let group = self.definition.token_group();
        self.token_cursor + 1 < group.len() && group[self.token_cursor + 1] == token
    }

    pub fn advance_token(&mut self) {
        self.token_cursor += 1;
    }

    /// Whether every token of the group has been matched
    pub fn tokens_exhausted(&self) -> bool {
        self.token_cursor + 1 >= self.definition.token_group().len()
    }

    /// Whether the operator is complete: all tokens matched and all
    /// arguments collected
    pub fn is_complete(&self) -> bool {
        self.tokens_exhausted() && self.arguments.len() == self.definition.argument_count()
    }

    /// Whether the operator expects an operand at the current scan position.
    /// Arguments owed so far: the left operand, one per crossed inter-token
    /// slot, plus either the pending inter-token slot (more tokens to come)
    /// or the trailing operand flag (all tokens matched).
    pub fn needs_right_element(&self) -> bool {
        let pending = if self.tokens_exhausted() {
            usize::from(self.definition.has_right_element())
        } else {
            1
        };
        let expected =
            usize::from(self.definition.has_left_element()) + self.token_cursor + pending;
        expected > self.arguments.len()
    }

    pub fn push_argument(&mut self, argument: String) {
        self.arguments.push(argument);
    }

    /// Turn the completed instance into a tree node with unresolved
    /// placeholder arguments
    pub fn create_node(&self) -> ExpressionNode {
        ExpressionNode::with_arguments(
            self.definition.name(),
            self.arguments
                .iter()
                .map(|argument| ExpressionElement::unresolved(argument))
                .collect(),
        )
    }
}
