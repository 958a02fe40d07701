// Internal modules
mod arrange;
pub mod ast;
pub mod catalog;
pub mod config;
#[macro_use]
pub mod logging;
mod machine;
pub mod parser;
mod placeholder;
mod postprocess;
mod preprocess;
pub mod scope;

// Re-export key types for library consumers
pub use ast::{ExpressionElement, ExpressionNode};
pub use catalog::{CatalogError, OperatorCatalog, OperatorDefinition};
pub use config::operators::{OperatorEntry, OperatorSet};
pub use parser::{ExpressionParser, ParseError};
pub use scope::{ScopeFn, VariableScope};
