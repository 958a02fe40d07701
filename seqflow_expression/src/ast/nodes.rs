//! Expression tree nodes
//!
//! The output consumed by the execution engine and by parameter
//! serialization: an operation name plus an ordered argument list. During
//! tree construction arguments may transiently be `Unresolved` placeholder
//! references; a successful parse never returns one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One compiled operator application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionNode {
    pub operation: String,
    pub arguments: Vec<ExpressionElement>,
}

impl ExpressionNode {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments(operation: &str, arguments: Vec<ExpressionElement>) -> Self {
        Self {
            operation: operation.to_string(),
            arguments,
        }
    }

    /// True once no `Unresolved` element remains anywhere in the tree
    pub fn is_fully_resolved(&self) -> bool {
        self.arguments.iter().all(|argument| match argument {
            ExpressionElement::Unresolved { .. } => false,
            ExpressionElement::Expression { node } => node.is_fully_resolved(),
            _ => true,
        })
    }

    /// Total number of leaves and nested nodes, for diagnostics
    pub fn element_count(&self) -> usize {
        self.arguments
            .iter()
            .map(|argument| match argument {
                ExpressionElement::Expression { node } => 1 + node.element_count(),
                _ => 1,
            })
            .sum()
    }
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operation)?;
        for (index, argument) in self.arguments.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", argument)?;
        }
        write!(f, ")")
    }
}

/// One argument of an operator application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ExpressionElement {
    /// Literal value, kept as its raw text
    Value { text: String },
    /// Reference to a variable in the enclosing scope
    Variable { name: String },
    /// Nested operator application
    Expression { node: Box<ExpressionNode> },
    /// Placeholder reference, only alive while the tree is being built
    Unresolved { placeholder: String },
}

impl ExpressionElement {
    pub fn value(text: &str) -> Self {
        Self::Value {
            text: text.to_string(),
        }
    }

    pub fn variable(name: &str) -> Self {
        Self::Variable {
            name: name.to_string(),
        }
    }

    pub fn expression(node: ExpressionNode) -> Self {
        Self::Expression {
            node: Box::new(node),
        }
    }

    pub(crate) fn unresolved(placeholder: &str) -> Self {
        Self::Unresolved {
            placeholder: placeholder.to_string(),
        }
    }
}

impl fmt::Display for ExpressionElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value { text } => write!(f, "Value({})", text),
            Self::Variable { name } => write!(f, "Variable({})", name),
            Self::Expression { node } => write!(f, "{}", node),
            Self::Unresolved { placeholder } => write!(f, "Unresolved({})", placeholder),
        }
    }
}
