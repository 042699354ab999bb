//! Common test utilities for constraint-core integration tests.

use constraint_core::{evaluate, EvalError, EvalOptions, Value};

/// Options with a pinned clock so `now()` is reproducible.
#[allow(dead_code)]
pub fn pinned_options() -> EvalOptions {
    EvalOptions::new().with_evaluation_timestamp("2026-06-01T00:00:00Z")
}

/// Evaluate against a JSON context and assert it succeeds.
#[allow(dead_code)]
pub fn assert_evaluates(expression: &str, context: serde_json::Value) -> Value {
    match evaluate(&Value::from(context), expression, &pinned_options()) {
        Ok(value) => value,
        Err(err) => panic!("failed to evaluate '{}': {}", expression, err),
    }
}

/// Evaluate against a JSON context and assert the result is a boolean.
#[allow(dead_code)]
pub fn holds(expression: &str, context: serde_json::Value) -> bool {
    match assert_evaluates(expression, context) {
        Value::Bool(b) => b,
        other => panic!("expected boolean from '{}', got {}", expression, other),
    }
}

/// Evaluate against a JSON context and assert it fails.
#[allow(dead_code)]
pub fn assert_eval_error(expression: &str, context: serde_json::Value) -> EvalError {
    match evaluate(&Value::from(context), expression, &pinned_options()) {
        Ok(value) => panic!("expected error for '{}', but got: {}", expression, value),
        Err(err) => err,
    }
}
