//! Standard builtin library.
//!
//! Builtins are grouped by the kind of document they inspect:
//!
//! - [`numeric`]: exact-integer arithmetic and comparison over decimal strings
//! - [`collections`]: measurement, reflection, equality and the quantifiers
//! - [`history`]: comparisons against the `_previous` state snapshot
//! - [`temporal`]: RFC 3339 timestamp predicates and `now()`
//! - [`delegation`]: delegation chains, delegation trees and emergent capabilities
//! - [`saga`]: multi-step saga and multi-agent outcome checks
//! - [`governance`]: proposals, checkpoints, baskets, lifecycles and audit trails
//!
//! Domain predicates answer `false` for malformed documents instead of
//! failing, so a rule over a half-populated record evaluates cleanly.

pub mod collections;
pub mod delegation;
pub mod governance;
pub mod history;
pub mod numeric;
pub mod saga;
pub mod temporal;

use std::sync::{Arc, LazyLock};

use dashu::Integer;

use crate::eval::FunctionRegistry;
use crate::exact;
use crate::value::Value;

static STANDARD_FUNCTIONS: LazyLock<Arc<FunctionRegistry>> =
    LazyLock::new(|| Arc::new(FunctionRegistry::standard()));

/// The shared standard registry, built once.
pub fn standard_functions() -> Arc<FunctionRegistry> {
    Arc::clone(&STANDARD_FUNCTIONS)
}

/// Register every standard builtin into `registry`.
pub fn register_standard(registry: &mut FunctionRegistry) {
    numeric::register(registry);
    collections::register(registry);
    history::register(registry);
    temporal::register(registry);
    delegation::register(registry);
    saga::register(registry);
    governance::register(registry);
}

// ==================== Document helpers ====================

/// Array-valued field of an object.
pub(crate) fn array_field<'v>(value: &'v Value, field: &str) -> Option<&'v [Value]> {
    value.get(field)?.as_array()
}

/// String-valued field of an object.
pub(crate) fn str_field<'v>(value: &'v Value, field: &str) -> Option<&'v str> {
    value.get(field)?.as_str()
}

/// Number-valued field of an object.
pub(crate) fn number_field(value: &Value, field: &str) -> Option<f64> {
    value.get(field)?.as_f64()
}

/// Exact integer held in a field; `None` when missing or not coercible.
pub(crate) fn exact_field(value: &Value, field: &str) -> Option<Integer> {
    exact::coerce(value.get(field)?)
}

/// An array made only of strings.
pub(crate) fn string_list(value: &Value) -> Option<Vec<&str>> {
    value.as_array()?.iter().map(Value::as_str).collect()
}

/// Sum of weights within 0.001 of 1.0.
pub(crate) fn weights_normalized(weights: impl IntoIterator<Item = f64>) -> bool {
    let total: f64 = weights.into_iter().sum();
    (total - 1.0).abs() <= 0.001
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shared_registry_is_reused() {
        let a = standard_functions();
        let b = standard_functions();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn weight_tolerance() {
        assert!(weights_normalized([0.1, 0.2, 0.3, 0.4]));
        assert!(weights_normalized([0.333, 0.333, 0.334]));
        assert!(!weights_normalized([0.5, 0.6]));
    }

    #[test]
    fn string_lists() {
        let value = Value::from(json!(["a", "b"]));
        assert_eq!(string_list(&value), Some(vec!["a", "b"]));
        assert_eq!(string_list(&Value::from(json!(["a", 1]))), None);
    }
}
