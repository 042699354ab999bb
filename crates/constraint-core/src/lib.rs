//! Constraint-Core: evaluation and checking for the constraint expression language
//!
//! Constraints are boolean rules kept as data, such as
//! `bigint_gte(budget_micro, cost_micro)`, evaluated against JSON-shaped
//! context documents.
//!
//! # Quick Start
//!
//! ```
//! use constraint_core::{evaluate_constraint, EvalOptions, Value};
//! use serde_json::json;
//!
//! let context = Value::from(json!({
//!     "nonce": "c2f1b7f7c0a94d3e",
//!     "links": [{"delegatee": "B"}, {"delegator": "B", "delegatee": "C"}],
//! }));
//! let ok = evaluate_constraint(
//!     &context,
//!     "len(nonce) >= 16 && links_form_chain(links)",
//!     &EvalOptions::default(),
//! )
//! .unwrap();
//! assert!(ok);
//! ```
//!
//! # Modules
//!
//! - `eval`: evaluator, programs and the builtin registry
//! - `builtins`: the standard builtin library
//! - `catalog`: documentation and executable examples for every builtin
//! - `detailed`: evaluation folded into a serializable success/failure result
//! - `checker`: offline type checking of constraint files
//! - `reserved`: reserved names and the field collision scanner

pub mod builtins;
pub mod catalog;
pub mod checker;
pub mod detailed;
pub mod eval;
pub mod exact;
mod options;
pub mod reserved;
mod value;

pub use catalog::{builtin_spec, BuiltinSpec, EVALUATOR_BUILTIN_SPECS};
pub use checker::{type_check, ConstraintFile, SchemaRegistry, TypeCheckResult};
pub use detailed::{evaluate_detailed, EvaluationResult};
pub use eval::{EvalError, EvalErrorKind, FunctionRegistry, Program};
pub use options::EvalOptions;
pub use reserved::{find_reserved_collisions, ReservedCollision, RESERVED_EVALUATOR_NAMES};
pub use value::Value;

pub use constraint_parser::{validate, ExpressionVersion, ValidationResult, EXPRESSION_VERSION, MAX_EXPRESSION_DEPTH};

/// Parse and evaluate `expression` against `context`.
///
/// Uses the options' grammar version and, when set, their function registry
/// in place of the standard builtins.
pub fn evaluate(context: &Value, expression: &str, options: &EvalOptions) -> Result<Value, EvalError> {
    let mut program = Program::compile(expression, options.version()?)?;
    if let Some(functions) = options.functions() {
        program = program.with_functions(functions.clone());
    }
    program.evaluate(context, options)
}

/// Evaluate `expression` as a predicate, using truthiness for non-boolean results.
pub fn evaluate_constraint(context: &Value, expression: &str, options: &EvalOptions) -> Result<bool, EvalError> {
    evaluate(context, expression, options).map(|value| value.is_truthy())
}
