//! Builtins comparing the current document with its `_previous` snapshot.
//!
//! Each takes a field path (`changed(order.status)`) rather than a value. The
//! current side is resolved like any identifier, so lambda parameters apply;
//! the previous side is looked up under the context's `_previous` key.

use dashu::Integer;

use crate::eval::{Arity, Call, EvalError, Evaluator, FunctionRegistry};
use crate::exact;
use crate::value::Value;

/// Context key holding the prior state.
pub const PREVIOUS_KEY: &str = "_previous";

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("changed", Arity::Exact(1), |ev, call| {
        let Some(previous) = previous_value(ev, call)? else {
            return Ok(Value::Bool(false));
        };
        let current = ev.try_resolve(call.required(0)?)?;
        Ok(Value::Bool(current != previous))
    });
    registry.register("previous", Arity::Exact(1), |ev, call| {
        Ok(previous_value(ev, call)?.flatten().unwrap_or(Value::Null))
    });
    registry.register("delta", Arity::Exact(1), delta);
}

/// `None` when the context has no `_previous`; otherwise the (possibly
/// missing) prior value at the argument's path.
fn previous_value(
    ev: &Evaluator<'_>,
    call: &Call<'_>,
) -> Result<Option<Option<Value>>, EvalError> {
    let path = call.path(0)?;
    let Some(snapshot) = ev.context().get(PREVIOUS_KEY) else {
        return Ok(None);
    };
    Ok(Some(snapshot.resolve_path(&path).cloned()))
}

/// Exact difference when both sides are integers, float difference when both
/// are numeric, zero otherwise.
fn delta(ev: &mut Evaluator<'_>, call: &Call<'_>) -> Result<Value, EvalError> {
    let Some(previous) = previous_value(ev, call)? else {
        return Ok(Value::BigInt(Integer::ZERO));
    };
    let previous = previous.unwrap_or(Value::Null);
    let current = ev.try_resolve(call.required(0)?)?.unwrap_or(Value::Null);

    let exact_side = |v: &Value| if v.is_null() { Some(Integer::ZERO) } else { exact::coerce(v) };
    if let (Some(now), Some(before)) = (exact_side(&current), exact_side(&previous)) {
        return Ok(Value::BigInt(now - before));
    }
    match (numeric(&current), numeric(&previous)) {
        (Some(now), Some(before)) => Ok(Value::Number(now - before)),
        _ => Ok(Value::BigInt(Integer::ZERO)),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Number(n) => Some(*n),
        Value::String(s) => s.parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{eval, holds, try_eval};
    use super::*;
    use crate::eval::EvalErrorKind;
    use serde_json::json;

    #[test]
    fn changed_compares_with_previous() {
        assert!(holds("changed(status)", json!({"status": "active", "_previous": {"status": "pending"}})));
        assert!(!holds("changed(status)", json!({"status": "active", "_previous": {"status": "active"}})));
        assert!(!holds("changed(status)", json!({"status": "active"})));
        assert!(holds("changed(a.b)", json!({"a": {"b": 1}, "_previous": {"a": {}}})));
    }

    #[test]
    fn previous_value_or_null() {
        let ctx = json!({"status": "active", "_previous": {"status": "pending"}});
        assert_eq!(eval("previous(status)", ctx), Value::from("pending"));
        assert!(holds("previous(status) == null", json!({"status": "active"})));
        assert!(holds("previous(gone) == null", json!({"_previous": {}})));
    }

    #[test]
    fn delta_exact_and_float() {
        let ctx = json!({"balance": "1000", "_previous": {"balance": "800"}});
        assert!(holds("bigint_eq(delta(balance), 200)", ctx));
        let ctx = json!({"rate": "1.5", "_previous": {"rate": "1.25"}});
        assert_eq!(eval("delta(rate)", ctx), Value::Number(0.25));
        let ctx = json!({"label": "x", "_previous": {"label": "y"}});
        assert!(holds("bigint_eq(delta(label), 0)", ctx));
        assert!(holds("bigint_eq(delta(balance), 0)", json!({"balance": "500"})));
    }

    #[test]
    fn path_argument_required() {
        let err = try_eval("changed(1 + 1)", json!({"_previous": {}})).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
        assert_eq!(err.position, Some(8));
    }
}
