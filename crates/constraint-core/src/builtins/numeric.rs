//! Exact-integer builtins.
//!
//! - `bigint_sum(values)` / `bigint_sum(array, field)` - exact sum, nulls skipped
//! - `bigint_gte(a, b)`, `bigint_gt(a, b)`, `bigint_eq(a, b)` - exact comparison
//! - `bigint_add(a, b)`, `bigint_sub(a, b)` - exact result as a decimal string
//! - `is_bigint_coercible(x)` - integer string or integral number
//!
//! Operands may be decimal integer strings, integral numbers or BigInts; null
//! counts as zero. Anything else is a type mismatch.

use std::cmp::Ordering;

use dashu::Integer;

use crate::eval::{Arity, Call, EvalError, Evaluator, FunctionRegistry};
use crate::exact;
use crate::value::Value;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("bigint_sum", Arity::Range(1, 2), bigint_sum);
    registry.register("bigint_gte", Arity::Exact(2), |ev, call| {
        compare(ev, call, |ord| ord != Ordering::Less)
    });
    registry.register("bigint_gt", Arity::Exact(2), |ev, call| {
        compare(ev, call, |ord| ord == Ordering::Greater)
    });
    registry.register("bigint_eq", Arity::Exact(2), |ev, call| {
        compare(ev, call, |ord| ord == Ordering::Equal)
    });
    registry.register("bigint_add", Arity::Exact(2), |ev, call| {
        let a = exact_arg(ev, call, 0)?;
        let b = exact_arg(ev, call, 1)?;
        Ok(Value::string(exact::render(&(a + b))))
    });
    registry.register("bigint_sub", Arity::Exact(2), |ev, call| {
        let a = exact_arg(ev, call, 0)?;
        let b = exact_arg(ev, call, 1)?;
        Ok(Value::string(exact::render(&(a - b))))
    });
    registry.register("is_bigint_coercible", Arity::Exact(1), |ev, call| {
        let value = ev.eval_arg(call, 0)?;
        Ok(Value::Bool(exact::coerce(&value).is_some()))
    });
}

/// Evaluate argument `index` as an exact operand, reporting its position.
fn exact_arg(ev: &mut Evaluator<'_>, call: &Call<'_>, index: usize) -> Result<Integer, EvalError> {
    let arg = call.required(index)?;
    let value = ev.eval(arg)?;
    exact::operand(&value, call.name).map_err(|err| err.at(arg.span.start))
}

fn compare(
    ev: &mut Evaluator<'_>,
    call: &Call<'_>,
    accept: fn(Ordering) -> bool,
) -> Result<Value, EvalError> {
    let a = exact_arg(ev, call, 0)?;
    let b = exact_arg(ev, call, 1)?;
    Ok(Value::Bool(accept(a.cmp(&b))))
}

fn bigint_sum(ev: &mut Evaluator<'_>, call: &Call<'_>) -> Result<Value, EvalError> {
    let source_arg = call.required(0)?;
    let source = ev.eval(source_arg)?;

    let field = match call.arg(1) {
        Some(arg) => match ev.eval(arg)? {
            Value::String(name) => Some(name),
            other => {
                return Err(EvalError::type_mismatch("field name string", other.type_name())
                    .at(arg.span.start))
            }
        },
        None => None,
    };

    let items = match &source {
        Value::Null => return Ok(Value::BigInt(Integer::ZERO)),
        Value::Array(items) => items,
        other => {
            return Err(EvalError::type_mismatch("array", other.type_name())
                .at(source_arg.span.start))
        }
    };

    let mut total = Integer::ZERO;
    for item in items.iter() {
        let value = match &field {
            Some(name) => item.get(name).unwrap_or(&Value::Null),
            None => item,
        };
        if value.is_null() {
            continue;
        }
        total += exact::operand(value, call.name)?;
    }
    Ok(Value::BigInt(total))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{eval, holds, try_eval};
    use super::*;
    use crate::eval::EvalErrorKind;
    use serde_json::json;

    #[test]
    fn sum_of_literal_list() {
        assert!(holds("bigint_sum([a, b]) == 300", json!({"a": "100", "b": "200"})));
        assert_eq!(eval("bigint_sum([])", json!({})), Value::BigInt(Integer::ZERO));
    }

    #[test]
    fn sum_of_field() {
        let ctx = json!({"items": [{"cost": "10"}, {"cost": null}, {"other": 1}, {"cost": 30}]});
        assert!(holds("bigint_sum(items, 'cost') == 40", ctx));
    }

    #[test]
    fn sum_stays_exact_beyond_f64() {
        let ctx = json!({"xs": ["9007199254740993", "9007199254740993"]});
        assert!(holds("bigint_eq(bigint_sum(xs), '18014398509481986')", ctx));
    }

    #[test]
    fn thirty_digit_amounts() {
        let ctx = json!({
            "a": "100000000000000000000000000000",
            "b": "999999999999999999999999999999",
        });
        assert!(holds("bigint_gte(b, a)", ctx.clone()));
        assert!(holds(
            "bigint_eq(bigint_sum([a, b]), '1099999999999999999999999999999')",
            ctx.clone()
        ));
        assert_eq!(
            eval("bigint_sub(a, b)", ctx),
            Value::from("-899999999999999999999999999999")
        );
        assert!(holds("bigint_gt(100000000000000000000000000000, 1)", json!({})));
    }

    #[test]
    fn sum_rejects_non_integers() {
        let err = try_eval("bigint_sum(['1.5'])", json!({})).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
        let err = try_eval("bigint_sum(5)", json!({})).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
        assert_eq!(err.position, Some(11));
    }

    #[test]
    fn comparisons() {
        let ctx = json!({"budget": "1000", "cost": "500", "same": 1000});
        assert!(holds("bigint_gte(budget, cost)", ctx.clone()));
        assert!(holds("bigint_gte(budget, same)", ctx.clone()));
        assert!(holds("bigint_gt(budget, cost)", ctx.clone()));
        assert!(!holds("bigint_gt(budget, same)", ctx.clone()));
        assert!(holds("bigint_eq(budget, same)", ctx.clone()));
        assert!(holds("bigint_eq(null, 0)", ctx));
    }

    #[test]
    fn add_and_sub_return_strings() {
        let ctx = json!({"total": "1000", "part": "1300"});
        assert_eq!(eval("bigint_add(total, part)", ctx.clone()), Value::from("2300"));
        assert_eq!(eval("bigint_sub(total, part)", ctx.clone()), Value::from("-300"));
        assert_eq!(eval("bigint_add(null, null)", ctx), Value::from("0"));
    }

    #[test]
    fn bad_operand_reports_argument_position() {
        let err = try_eval("bigint_gte(a, b)", json!({"a": "ten", "b": "1"})).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
        assert_eq!(err.position, Some(11));
    }

    #[test]
    fn coercibility() {
        for (value, expected) in [
            (json!("1000000"), true),
            (json!("-500"), true),
            (json!(42), true),
            (json!("1.50"), false),
            (json!("hello"), false),
            (json!(0.5), false),
            (json!(null), false),
        ] {
            assert_eq!(
                holds("is_bigint_coercible(v)", json!({ "v": value.clone() })),
                expected,
                "{}",
                value
            );
        }
    }
}
