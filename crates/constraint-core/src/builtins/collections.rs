//! Measurement, reflection, equality and quantifier builtins.
//!
//! - `len(x)` - array length, object key count or string length; otherwise 0
//! - `type_of(x)` - runtime type name, `"undefined"` for a missing path
//! - `eq(a, b)` - strict equality without coercion
//! - `unique_values(array, field)` - no duplicate `field` values
//! - `object_keys_subset(record, allowed)` - every key of `record` is allowed
//! - `every(xs, x -> p)` / `some(xs, x -> p)` - quantifiers
//! - `has(path)` - presence test that never fails on a missing path

use crate::eval::{Arity, Call, EvalError, Evaluator, FunctionRegistry};
use crate::value::Value;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("len", Arity::Exact(1), |ev, call| {
        let length = match ev.eval_arg(call, 0)? {
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            Value::String(s) => s.chars().count(),
            _ => 0,
        };
        Ok(Value::from(length))
    });
    registry.register("type_of", Arity::Exact(1), |ev, call| {
        let arg = call.required(0)?;
        let name = match ev.try_resolve(arg)? {
            Some(value) => value.type_name(),
            None => "undefined",
        };
        Ok(Value::from(name))
    });
    registry.register("eq", Arity::Exact(2), |ev, call| {
        let a = ev.eval_arg(call, 0)?;
        let b = ev.eval_arg(call, 1)?;
        Ok(Value::Bool(a == b))
    });
    registry.register("unique_values", Arity::Exact(2), unique_values);
    registry.register("object_keys_subset", Arity::Exact(2), object_keys_subset);
    registry.register("every", Arity::Exact(2), |ev, call| quantify(ev, call, false));
    registry.register("some", Arity::Exact(2), |ev, call| quantify(ev, call, true));
    registry.register("has", Arity::Exact(1), |ev, call| {
        let arg = call.required(0)?;
        Ok(Value::Bool(ev.try_resolve(arg)?.is_some()))
    });
}

/// `every` stops at the first falsy element, `some` at the first truthy one.
/// With no elements neither stops, so `every` is true and `some` is false.
fn quantify(ev: &mut Evaluator<'_>, call: &Call<'_>, stop_on: bool) -> Result<Value, EvalError> {
    let source_arg = call.required(0)?;
    let items = match ev.eval(source_arg)? {
        Value::Array(items) => items,
        other => {
            return Err(EvalError::type_mismatch(
                &format!("array as first argument of {}()", call.name),
                other.type_name(),
            )
            .at(source_arg.span.start))
        }
    };
    let (param, body) = call.lambda(1)?;

    for item in items.iter() {
        if ev.apply(param, body, item.clone())?.is_truthy() == stop_on {
            return Ok(Value::Bool(stop_on));
        }
    }
    Ok(Value::Bool(!stop_on))
}

fn unique_values(ev: &mut Evaluator<'_>, call: &Call<'_>) -> Result<Value, EvalError> {
    let source = ev.eval_arg(call, 0)?;
    let field = ev.eval_arg(call, 1)?;
    let (Some(items), Some(field)) = (source.as_array(), field.as_str()) else {
        return Ok(Value::Bool(false));
    };

    let mut seen: Vec<&Value> = Vec::with_capacity(items.len());
    for value in items.iter().filter_map(|item| item.get(field)) {
        if value.is_null() {
            continue;
        }
        if seen.contains(&value) {
            return Ok(Value::Bool(false));
        }
        seen.push(value);
    }
    Ok(Value::Bool(true))
}

fn object_keys_subset(ev: &mut Evaluator<'_>, call: &Call<'_>) -> Result<Value, EvalError> {
    let record = ev.eval_arg(call, 0)?;
    let allowed = ev.eval_arg(call, 1)?;
    let Some(allowed) = allowed.as_array() else {
        return Ok(Value::Bool(false));
    };
    let subset = match &record {
        Value::Null => true,
        Value::Object(map) => map
            .keys()
            .all(|key| allowed.iter().any(|a| a.as_str() == Some(key.as_str()))),
        _ => false,
    };
    Ok(Value::Bool(subset))
}
