//! Constraint evaluation engine.
//!
//! - `Value` (in [`crate::value`]) represents runtime values
//! - `Program` wraps a parsed expression with its function registry
//! - `Evaluator` performs tree-walking evaluation over a context document
//! - `FunctionRegistry` holds the builtins the evaluator dispatches to
//!
//! # Example
//!
//! ```
//! use constraint_core::eval::Program;
//! use constraint_core::{EvalOptions, ExpressionVersion, Value};
//! use serde_json::json;
//!
//! let program = Program::compile("bigint_gte(budget, cost)", ExpressionVersion::default()).unwrap();
//! let context = Value::from(json!({"budget": "5000000", "cost": "1250000"}));
//! let result = program.evaluate(&context, &EvalOptions::default()).unwrap();
//! assert_eq!(result, Value::Bool(true));
//! ```

mod error;
mod evaluator;
mod functions;
mod program;
mod scope;

pub use error::{EvalError, EvalErrorKind};
pub use evaluator::Evaluator;
pub use functions::{Arity, Builtin, BuiltinFn, Call, FunctionRegistry};
pub use program::Program;
pub use scope::{Frame, ScopeStack};
