//! Configuration module for the expression compiler
//!
//! Compile-time limits, runtime user preferences, and operator set loading.

pub mod constants;
pub mod operators;
pub mod runtime;
