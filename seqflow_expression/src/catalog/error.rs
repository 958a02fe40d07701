//! Error types for operator catalog construction

use crate::logging::{codes, Code};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog construction and operator-set loading errors
///
/// All of these are fatal to the catalog: the configuration must be fixed
/// before any parsing can occur.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(
        "operator '{operator}' declares {declared} arguments but its format pattern implies {expected}"
    )]
    InvalidOperatorFormat {
        operator: String,
        declared: usize,
        expected: usize,
    },

    #[error("operator '{operator}' has a format pattern with no literal token text")]
    EmptyTokenGroup { operator: String },

    #[error("operator '{operator}' is defined more than once")]
    DuplicateOperator { operator: String },

    #[error("operator set contains no operators")]
    EmptyCatalog,

    #[error("failed to read operator set file '{path}'")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("operator set file '{path}' is not valid TOML")]
    FileParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("operator set text is not valid TOML")]
    InlineParse {
        #[source]
        source: toml::de::Error,
    },
}

impl CatalogError {
    /// Get error code for the global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidOperatorFormat { .. } => codes::catalog::INVALID_OPERATOR_FORMAT,
            Self::EmptyTokenGroup { .. } => codes::catalog::EMPTY_TOKEN_GROUP,
            Self::DuplicateOperator { .. } => codes::catalog::DUPLICATE_OPERATOR,
            Self::EmptyCatalog => codes::catalog::EMPTY_CATALOG,
            Self::FileRead { .. } => codes::catalog::OPERATOR_FILE_READ,
            Self::FileParse { .. } | Self::InlineParse { .. } => codes::catalog::OPERATOR_FILE_PARSE,
        }
    }

    /// Catalog errors are never recoverable for the catalog being built
    pub fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let error = CatalogError::InvalidOperatorFormat {
            operator: "add".to_string(),
            declared: 3,
            expected: 2,
        };
        assert_eq!(error.error_code().as_str(), "E101");

        let error = CatalogError::EmptyCatalog;
        assert_eq!(error.error_code().as_str(), "E104");
    }

    #[test]
    fn test_error_messages_name_the_operator() {
        let error = CatalogError::DuplicateOperator {
            operator: "add".to_string(),
        };
        assert!(error.to_string().contains("add"));
    }
}
