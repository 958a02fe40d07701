//! Consolidated error codes and classification system
//!
//! Single source of truth for all error and success codes emitted by the
//! expression compiler, together with their behavioral metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Operator catalog error codes
pub mod catalog {
    use super::Code;

    pub const INVALID_OPERATOR_FORMAT: Code = Code::new("E101");
    pub const EMPTY_TOKEN_GROUP: Code = Code::new("E102");
    pub const DUPLICATE_OPERATOR: Code = Code::new("E103");
    pub const EMPTY_CATALOG: Code = Code::new("E104");
    pub const OPERATOR_FILE_READ: Code = Code::new("E105");
    pub const OPERATOR_FILE_PARSE: Code = Code::new("E106");
    pub const OVERSIZED_TOKEN: Code = Code::new("E107");
}

/// Preprocessing error codes
pub mod preprocess {
    use super::Code;

    pub const UNTERMINATED_LITERAL: Code = Code::new("E120");
    pub const ADJACENT_OPERANDS: Code = Code::new("E121");
    pub const EXPRESSION_TOO_LONG: Code = Code::new("E122");
    pub const EMPTY_OPERAND: Code = Code::new("E123");
}

/// Tokenization / split-arrangement error codes
pub mod arrange {
    use super::Code;

    pub const TOKEN_RUN_TOO_LONG: Code = Code::new("E140");
    pub const UNSPLITTABLE_TOKEN_RUN: Code = Code::new("E141");
}

/// Parse error codes
pub mod parse {
    use super::Code;

    pub const NO_VALID_INTERPRETATION: Code = Code::new("E160");
    pub const SEARCH_BUDGET_EXCEEDED: Code = Code::new("E161");
}

/// Leaf resolution error codes
pub mod resolve {
    use super::Code;

    pub const UNKNOWN_VARIABLE: Code = Code::new("E180");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const CATALOG_BUILD_COMPLETE: Code = Code::new("I101");
    pub const OPERATOR_FILE_LOADED: Code = Code::new("I105");
    pub const PARSE_COMPLETE: Code = Code::new("I160");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();

        // System errors
        registry.insert(
            "ERR001",
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal system error",
                "File a bug report with the offending expression",
            ),
        );
        registry.insert(
            "ERR002",
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "System initialization failure",
                "Check configuration and environment variables",
            ),
        );

        // Catalog errors
        registry.insert(
            "E101",
            ErrorMetadata::new(
                "E101",
                "Catalog",
                Severity::High,
                false,
                true,
                "Operator argument count does not match its format pattern",
                "Fix the operator definition in the operator set",
            ),
        );
        registry.insert(
            "E102",
            ErrorMetadata::new(
                "E102",
                "Catalog",
                Severity::High,
                false,
                true,
                "Operator format pattern contains no literal token text",
                "Add at least one literal token to the format pattern",
            ),
        );
        registry.insert(
            "E103",
            ErrorMetadata::new(
                "E103",
                "Catalog",
                Severity::High,
                false,
                true,
                "Two operators share the same name",
                "Rename one of the conflicting operators",
            ),
        );
        registry.insert(
            "E104",
            ErrorMetadata::new(
                "E104",
                "Catalog",
                Severity::High,
                false,
                true,
                "Operator set contains no operators",
                "Provide at least one operator definition",
            ),
        );
        registry.insert(
            "E105",
            ErrorMetadata::new(
                "E105",
                "Catalog",
                Severity::Medium,
                false,
                true,
                "Operator set file could not be read",
                "Check the file path and permissions",
            ),
        );
        registry.insert(
            "E106",
            ErrorMetadata::new(
                "E106",
                "Catalog",
                Severity::Medium,
                false,
                true,
                "Operator set file is not valid TOML",
                "Fix the TOML syntax in the operator set file",
            ),
        );
        registry.insert(
            "E107",
            ErrorMetadata::new(
                "E107",
                "Catalog",
                Severity::Low,
                true,
                false,
                "Operator token is longer than the supported token-run length",
                "Shorten the token or raise the token-run limit",
            ),
        );

        // Preprocessing errors
        registry.insert(
            "E120",
            ErrorMetadata::new(
                "E120",
                "Preprocess",
                Severity::Medium,
                true,
                false,
                "String literal is not terminated",
                "Close the quoted literal",
            ),
        );
        registry.insert(
            "E121",
            ErrorMetadata::new(
                "E121",
                "Preprocess",
                Severity::Medium,
                true,
                false,
                "Two operands are adjacent with no operator between them",
                "Insert an operator between the operands",
            ),
        );
        registry.insert(
            "E122",
            ErrorMetadata::new(
                "E122",
                "Preprocess",
                Severity::Medium,
                true,
                false,
                "Expression exceeds the maximum supported length",
                "Shorten the expression",
            ),
        );
        registry.insert(
            "E123",
            ErrorMetadata::new(
                "E123",
                "Preprocess",
                Severity::Medium,
                true,
                false,
                "An operand span is empty after trimming",
                "Remove the empty operand from the expression",
            ),
        );

        // Tokenization errors
        registry.insert(
            "E140",
            ErrorMetadata::new(
                "E140",
                "Arrange",
                Severity::Medium,
                true,
                false,
                "A run of operator characters exceeds the supported length",
                "Break the operator run apart or raise the run limit",
            ),
        );
        registry.insert(
            "E141",
            ErrorMetadata::new(
                "E141",
                "Arrange",
                Severity::Medium,
                true,
                false,
                "A run of operator characters has no decomposition into known tokens",
                "Fix the operator spelling in the expression",
            ),
        );

        // Parse errors
        registry.insert(
            "E160",
            ErrorMetadata::new(
                "E160",
                "Parse",
                Severity::Medium,
                true,
                false,
                "No tokenization of the expression parses to a complete tree",
                "Fix the expression or the operator set",
            ),
        );
        registry.insert(
            "E161",
            ErrorMetadata::new(
                "E161",
                "Parse",
                Severity::Medium,
                true,
                false,
                "The backtracking search exceeded its step budget",
                "Simplify the expression or raise the search budget",
            ),
        );

        // Resolution errors
        registry.insert(
            "E180",
            ErrorMetadata::new(
                "E180",
                "Resolve",
                Severity::Medium,
                true,
                false,
                "Expression references a variable missing from the enclosing scope",
                "Declare the variable or fix its spelling",
            ),
        );

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for an error code
pub fn get_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity (defaults to Medium for unknown codes)
pub fn get_severity(code: &str) -> Severity {
    get_metadata(code).map_or(Severity::Medium, |m| m.severity)
}

/// Get error category
pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map_or("Unknown", |m| m.category)
}

/// Get error description
pub fn get_description(code: &str) -> &'static str {
    get_metadata(code).map_or("Unknown error", |m| m.description)
}

/// Get recommended action
pub fn get_action(code: &str) -> &'static str {
    get_metadata(code).map_or("No specific action available", |m| m.recommended_action)
}

/// Check if an error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).is_some_and(|m| m.recoverable)
}

/// Check if an error requires halting
pub fn requires_halt(code: &str) -> bool {
    get_metadata(code).is_some_and(|m| m.requires_halt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_all_error_constants() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            catalog::INVALID_OPERATOR_FORMAT,
            catalog::EMPTY_TOKEN_GROUP,
            catalog::DUPLICATE_OPERATOR,
            catalog::EMPTY_CATALOG,
            catalog::OPERATOR_FILE_READ,
            catalog::OPERATOR_FILE_PARSE,
            catalog::OVERSIZED_TOKEN,
            preprocess::UNTERMINATED_LITERAL,
            preprocess::ADJACENT_OPERANDS,
            preprocess::EXPRESSION_TOO_LONG,
            preprocess::EMPTY_OPERAND,
            arrange::TOKEN_RUN_TOO_LONG,
            arrange::UNSPLITTABLE_TOKEN_RUN,
            parse::NO_VALID_INTERPRETATION,
            parse::SEARCH_BUDGET_EXCEEDED,
            resolve::UNKNOWN_VARIABLE,
        ];
        for code in codes {
            assert!(
                get_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("ERR001"));
        assert!(!is_recoverable("ERR001"));

        assert_eq!(get_category("E160"), "Parse");
        assert!(is_recoverable("E160"));
        assert!(!requires_halt("E160"));
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert_eq!(get_severity("E999"), Severity::Medium);
    }
}
