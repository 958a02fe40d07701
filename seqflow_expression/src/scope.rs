//! Variable existence oracle
//!
//! The surrounding sequence model owns variable declarations; the parser only
//! needs to ask whether a name exists in the lexical scope a parse runs in.

use std::collections::{BTreeSet, HashSet};

/// Single-method capability supplied by the caller for scope-checked parses
pub trait VariableScope {
    fn contains_variable(&self, name: &str) -> bool;
}

impl VariableScope for HashSet<String> {
    fn contains_variable(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl VariableScope for BTreeSet<String> {
    fn contains_variable(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl VariableScope for Vec<String> {
    fn contains_variable(&self, name: &str) -> bool {
        self.iter().any(|candidate| candidate == name)
    }
}

impl<T: VariableScope + ?Sized> VariableScope for &T {
    fn contains_variable(&self, name: &str) -> bool {
        (**self).contains_variable(name)
    }
}

/// Adapter for closure-backed scopes
pub struct ScopeFn<F>(pub F);

impl<F: Fn(&str) -> bool> VariableScope for ScopeFn<F> {
    fn contains_variable(&self, name: &str) -> bool {
        (self.0)(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_set_scope() {
        let mut scope = HashSet::new();
        scope.insert("speed".to_string());
        assert!(scope.contains_variable("speed"));
        assert!(!scope.contains_variable("distance"));
    }

    #[test]
    fn test_vec_scope() {
        let scope = vec!["a".to_string(), "b".to_string()];
        assert!(scope.contains_variable("a"));
        assert!(!scope.contains_variable("c"));
    }

    #[test]
    fn test_closure_scope() {
        let scope = ScopeFn(|name: &str| name.starts_with("var_"));
        assert!(scope.contains_variable("var_x"));
        assert!(!scope.contains_variable("x"));
    }
}
