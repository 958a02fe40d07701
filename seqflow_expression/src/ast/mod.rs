//! Expression tree types and post-parse linking

pub mod linker;
pub mod nodes;

pub use nodes::{ExpressionElement, ExpressionNode};
