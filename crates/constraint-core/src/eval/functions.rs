//! Builtin function registry for constraint evaluation.
//!
//! Builtins receive the call's unevaluated argument nodes together with the
//! evaluator, so a builtin decides for itself whether an argument is a value
//! to evaluate, a field path to resolve, or a lambda to apply per element.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use constraint_parser::{Expr, Span, SpannedExpr};

use super::{EvalError, Evaluator};
use crate::value::Value;

/// A builtin implementation.
pub type BuiltinFn =
    Arc<dyn Fn(&mut Evaluator<'_>, &Call<'_>) -> Result<Value, EvalError> + Send + Sync>;

/// Number of arguments a builtin accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Between min and max arguments (inclusive).
    Range(usize, usize),
}

impl Arity {
    pub fn is_valid(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => count >= min && count <= max,
        }
    }

    /// Human-readable form used in arity error messages.
    pub fn description(&self) -> String {
        match *self {
            Arity::Exact(n) => n.to_string(),
            Arity::Range(min, max) => format!("{} to {}", min, max),
        }
    }
}

/// A builtin invocation as seen by its implementation.
#[derive(Debug, Clone, Copy)]
pub struct Call<'a> {
    pub name: &'a str,
    pub args: &'a [SpannedExpr],
    pub span: &'a Span,
}

impl<'a> Call<'a> {
    /// The argument node at `index`. Arity has been checked before dispatch,
    /// so out-of-range indices only come from optional arguments.
    pub fn arg(&self, index: usize) -> Option<&'a SpannedExpr> {
        self.args.get(index)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Destructure the argument at `index` as `param -> body`.
    pub fn lambda(&self, index: usize) -> Result<(&'a str, &'a SpannedExpr), EvalError> {
        let arg = self.required(index)?;
        match &arg.node {
            Expr::Lambda { param, body } => Ok((param.as_str(), body.as_ref())),
            _ => Err(EvalError::type_mismatch(
                &format!("lambda as argument {} of {}()", index + 1, self.name),
                "expression",
            )
            .at(arg.span.start)),
        }
    }

    /// Render the argument at `index` as a dotted field path (`a.b.0`).
    pub fn path(&self, index: usize) -> Result<String, EvalError> {
        let arg = self.required(index)?;
        arg.node.as_path().ok_or_else(|| {
            EvalError::type_mismatch(
                &format!("field path as argument {} of {}()", index + 1, self.name),
                "expression",
            )
            .at(arg.span.start)
        })
    }

    /// The argument at `index`, failing when an optional argument is absent.
    pub fn required(&self, index: usize) -> Result<&'a SpannedExpr, EvalError> {
        self.arg(index).ok_or_else(|| {
            EvalError::invalid_argument(format!(
                "{}() is missing argument {}",
                self.name,
                index + 1
            ))
            .at(self.span.start)
        })
    }
}

/// A registered builtin.
#[derive(Clone)]
pub struct Builtin {
    pub name: String,
    pub arity: Arity,
    pub implementation: BuiltinFn,
}

impl Builtin {
    pub fn new(name: impl Into<String>, arity: Arity, implementation: BuiltinFn) -> Self {
        Self {
            name: name.into(),
            arity,
            implementation,
        }
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Registry of all builtins available during evaluation.
///
/// Registration replaces any builtin of the same name, so hosts can override
/// a standard builtin by registering on top of [`FunctionRegistry::standard`].
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Builtin>,
}

impl FunctionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every standard builtin.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        crate::builtins::register_standard(&mut registry);
        registry
    }

    /// Register a builtin implementation under `name`.
    pub fn register<F>(&mut self, name: &str, arity: Arity, implementation: F)
    where
        F: Fn(&mut Evaluator<'_>, &Call<'_>) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.functions.insert(
            name.to_string(),
            Builtin::new(name, arity, Arc::new(implementation)),
        );
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_function<F>(mut self, name: &str, arity: Arity, implementation: F) -> Self
    where
        F: Fn(&mut Evaluator<'_>, &Call<'_>) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.register(name, arity, implementation);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Builtin)> {
        self.functions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_ranges() {
        assert!(Arity::Exact(2).is_valid(2));
        assert!(!Arity::Exact(2).is_valid(1));
        assert!(Arity::Range(1, 2).is_valid(1));
        assert!(Arity::Range(1, 2).is_valid(2));
        assert!(!Arity::Range(1, 2).is_valid(3));
        assert_eq!(Arity::Range(1, 2).description(), "1 to 2");
    }

    #[test]
    fn registration_replaces() {
        let registry = FunctionRegistry::new()
            .with_function("answer", Arity::Exact(0), |_, _| Ok(Value::from(1i64)))
            .with_function("answer", Arity::Exact(1), |_, _| Ok(Value::from(2i64)));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("answer").map(|b| b.arity), Some(Arity::Exact(1)));
    }

    #[test]
    fn standard_registry_is_populated() {
        let registry = FunctionRegistry::standard();
        for name in ["len", "every", "some", "has", "bigint_sum", "is_after", "now"] {
            assert!(registry.contains(name), "missing builtin {}", name);
        }
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
