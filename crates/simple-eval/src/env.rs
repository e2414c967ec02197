//! The global variable environment.

use crate::builtins;
use crate::value::{NativeFn, Value};
use std::collections::BTreeMap;

/// Single flat namespace for one evaluation run.
///
/// There are no nested scopes: every assignment anywhere in the program
/// writes into this one map, and native functions live alongside user
/// variables.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: BTreeMap<String, Value>,
}

impl Environment {
    /// Create an empty environment with no builtins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment pre-seeded with the builtin functions.
    pub fn with_builtins() -> Self {
        let mut env = Self::new();
        builtins::install(&mut env);
        env
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Bind `name` to `value`, creating the binding on first use.
    /// Returns the value it replaced, if any.
    pub fn assign(&mut self, name: &str, value: Value) -> Option<Value> {
        self.bindings.insert(name.to_string(), value)
    }

    /// Bind a host function under its own name.
    pub fn define_native(&mut self, native: NativeFn) {
        self.bindings
            .insert(native.name().to_string(), Value::Native(native));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// All bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_creates_then_overwrites() {
        let mut env = Environment::new();
        assert_eq!(env.assign("x", Value::Integer(1)), None);
        assert_eq!(env.assign("x", Value::String("s".into())), Some(Value::Integer(1)));
        assert_eq!(env.get("x"), Some(&Value::String("s".into())));
    }

    #[test]
    fn test_missing_binding() {
        let env = Environment::new();
        assert_eq!(env.get("nope"), None);
        assert!(!env.contains("nope"));
    }

    #[test]
    fn test_builtins_are_seeded() {
        let env = Environment::with_builtins();
        assert!(matches!(env.get("write"), Some(Value::Native(f)) if f.name() == "write"));
        assert!(!Environment::new().contains("write"));
    }

    #[test]
    fn test_builtins_can_be_rebound() {
        let mut env = Environment::with_builtins();
        env.assign("write", Value::Integer(3));
        assert_eq!(env.get("write"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_iter_is_name_ordered() {
        let mut env = Environment::new();
        env.assign("b", Value::Integer(2));
        env.assign("a", Value::Integer(1));
        let names: Vec<&str> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
