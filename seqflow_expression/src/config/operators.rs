//! Operator set files
//!
//! The operator grammar is runtime configuration: a TOML file with an ordered
//! `[[operators]]` array. Registration order is the array order, which the
//! catalog uses to break priority ties.

use crate::catalog::CatalogError;
use crate::log_success;
use crate::logging::codes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One configured operator: name, format pattern, priority, argument count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorEntry {
    pub name: String,
    pub format: String,
    pub priority: i32,
    pub arguments: usize,
}

impl OperatorEntry {
    pub fn new(name: &str, format: &str, priority: i32, arguments: usize) -> Self {
        Self {
            name: name.to_string(),
            format: format.to_string(),
            priority,
            arguments,
        }
    }
}

/// An ordered operator set, as loaded from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorSet {
    pub operators: Vec<OperatorEntry>,
}

impl OperatorSet {
    /// Load an operator set from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        let set = Self::from_toml_str(&raw).map_err(|error| match error {
            CatalogError::InlineParse { source } => CatalogError::FileParse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        log_success!(codes::success::OPERATOR_FILE_LOADED, "Operator set loaded",
            "path" => path.display(),
            "operators" => set.operators.len()
        );
        Ok(set)
    }

    /// Parse an operator set from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        toml::from_str(raw).map_err(|source| CatalogError::InlineParse { source })
    }

    /// Serialize the operator set back to TOML
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("operator set serializes to TOML")
    }

    /// The built-in operator set shipped with the platform: arithmetic,
    /// comparison, logic, string concatenation via `+`, indexing, and the
    /// unary prefixes.
    pub fn standard() -> Self {
        Self {
            operators: vec![
                OperatorEntry::new("index", "{0}[{1}]", 150, 2),
                OperatorEntry::new("not", "!{0}", 140, 1),
                OperatorEntry::new("negate", "-{0}", 130, 1),
                OperatorEntry::new("multiply", "{0}*{1}", 120, 2),
                OperatorEntry::new("divide", "{0}/{1}", 120, 2),
                OperatorEntry::new("modulo", "{0}%{1}", 120, 2),
                OperatorEntry::new("add", "{0}+{1}", 110, 2),
                OperatorEntry::new("subtract", "{0}-{1}", 110, 2),
                OperatorEntry::new("greater_than", "{0}>{1}", 90, 2),
                OperatorEntry::new("less_than", "{0}<{1}", 90, 2),
                OperatorEntry::new("greater_or_equal", "{0}>={1}", 90, 2),
                OperatorEntry::new("less_or_equal", "{0}<={1}", 90, 2),
                OperatorEntry::new("equal", "{0}=={1}", 80, 2),
                OperatorEntry::new("not_equal", "{0}!={1}", 80, 2),
                OperatorEntry::new("and", "{0}&&{1}", 70, 2),
                OperatorEntry::new("or", "{0}||{1}", 60, 2),
            ],
        }
    }
}
