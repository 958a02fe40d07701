//! Error types for expression parsing

use crate::logging::{codes, Code};

pub type ParseResult<T> = Result<T, ParseError>;

/// Errors surfaced by a parse call, each carrying the offending expression
/// text for diagnostics. All of these are recoverable by the caller: they
/// describe bad input, not a broken parser.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("expression '{expression}' has no valid operator interpretation")]
    InvalidExpression { expression: String },

    #[error("adjacent operands with no operator between them in '{expression}'")]
    AdjacentOperands { expression: String },

    #[error("unterminated string literal in '{expression}'")]
    UnterminatedLiteral { expression: String },

    #[error("empty operand in '{expression}'")]
    EmptyOperand { expression: String },

    #[error("expression length {length} exceeds the supported maximum {limit}")]
    ExpressionTooLong { length: usize, limit: usize },

    #[error("operator run '{run}' in '{expression}' is longer than the supported {limit} characters")]
    TokenRunTooLong {
        run: String,
        expression: String,
        limit: usize,
    },

    #[error("operator run '{run}' in '{expression}' has no decomposition into known tokens")]
    UnsplittableTokenRun { run: String, expression: String },

    #[error("variable '{variable}' does not exist in the enclosing scope (in '{expression}')")]
    UnknownVariable {
        variable: String,
        expression: String,
    },

    #[error("parsing '{expression}' exceeded the search budget of {budget} steps")]
    SearchBudgetExceeded { expression: String, budget: usize },
}

impl ParseError {
    pub fn invalid(expression: &str) -> Self {
        Self::InvalidExpression {
            expression: expression.to_string(),
        }
    }

    pub fn adjacent_operands(expression: &str) -> Self {
        Self::AdjacentOperands {
            expression: expression.to_string(),
        }
    }

    pub fn unterminated_literal(expression: &str) -> Self {
        Self::UnterminatedLiteral {
            expression: expression.to_string(),
        }
    }

    pub fn empty_operand(expression: &str) -> Self {
        Self::EmptyOperand {
            expression: expression.to_string(),
        }
    }

    pub fn unknown_variable(variable: &str, expression: &str) -> Self {
        Self::UnknownVariable {
            variable: variable.to_string(),
            expression: expression.to_string(),
        }
    }

    /// The expression that failed, when the error kind records it
    pub fn expression(&self) -> Option<&str> {
        match self {
            Self::InvalidExpression { expression }
            | Self::AdjacentOperands { expression }
            | Self::UnterminatedLiteral { expression }
            | Self::EmptyOperand { expression }
            | Self::TokenRunTooLong { expression, .. }
            | Self::UnsplittableTokenRun { expression, .. }
            | Self::UnknownVariable { expression, .. }
            | Self::SearchBudgetExceeded { expression, .. } => Some(expression),
            Self::ExpressionTooLong { .. } => None,
        }
    }

    /// Whether this is a syntax-family failure, as opposed to a scope failure
    pub fn is_syntax_error(&self) -> bool {
        !matches!(self, Self::UnknownVariable { .. })
    }

    /// Get error code for the global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidExpression { .. } => codes::parse::NO_VALID_INTERPRETATION,
            Self::AdjacentOperands { .. } => codes::preprocess::ADJACENT_OPERANDS,
            Self::UnterminatedLiteral { .. } => codes::preprocess::UNTERMINATED_LITERAL,
            Self::EmptyOperand { .. } => codes::preprocess::EMPTY_OPERAND,
            Self::ExpressionTooLong { .. } => codes::preprocess::EXPRESSION_TOO_LONG,
            Self::TokenRunTooLong { .. } => codes::arrange::TOKEN_RUN_TOO_LONG,
            Self::UnsplittableTokenRun { .. } => codes::arrange::UNSPLITTABLE_TOKEN_RUN,
            Self::UnknownVariable { .. } => codes::resolve::UNKNOWN_VARIABLE,
            Self::SearchBudgetExceeded { .. } => codes::parse::SEARCH_BUDGET_EXCEEDED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(ParseError::invalid("1+").error_code().as_str(), "E160");
        assert_eq!(
            ParseError::adjacent_operands("a b").error_code().as_str(),
            "E121"
        );
        assert_eq!(
            ParseError::unknown_variable("x", "x+1").error_code().as_str(),
            "E180"
        );
    }

    #[test]
    fn test_errors_carry_expression_text() {
        let error = ParseError::invalid("a+*b");
        assert_eq!(error.expression(), Some("a+*b"));
        assert!(error.to_string().contains("a+*b"));
    }

    #[test]
    fn test_syntax_family() {
        assert!(ParseError::invalid("1+").is_syntax_error());
        assert!(ParseError::adjacent_operands("a b").is_syntax_error());
        assert!(!ParseError::unknown_variable("x", "x+1").is_syntax_error());
    }
}
