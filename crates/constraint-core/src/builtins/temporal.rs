//! Timestamp builtins.
//!
//! Timestamps are RFC 3339 strings. Anything else (including formats a
//! lenient date parser would accept, such as `2026/06/01`) makes the
//! predicate false instead of raising an error.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::eval::{Arity, Call, EvalError, Evaluator, FunctionRegistry};
use crate::value::Value;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("is_after", Arity::Exact(2), |ev, call| {
        let (a, b) = (timestamp_arg(ev, call, 0)?, timestamp_arg(ev, call, 1)?);
        Ok(Value::Bool(matches!((a, b), (Some(a), Some(b)) if a > b)))
    });
    registry.register("is_before", Arity::Exact(2), |ev, call| {
        let (a, b) = (timestamp_arg(ev, call, 0)?, timestamp_arg(ev, call, 1)?);
        Ok(Value::Bool(matches!((a, b), (Some(a), Some(b)) if a < b)))
    });
    registry.register("is_between", Arity::Exact(3), |ev, call| {
        let t = timestamp_arg(ev, call, 0)?;
        let lo = timestamp_arg(ev, call, 1)?;
        let hi = timestamp_arg(ev, call, 2)?;
        Ok(Value::Bool(
            matches!((t, lo, hi), (Some(t), Some(lo), Some(hi)) if lo <= t && t <= hi),
        ))
    });
    registry.register("is_stale", Arity::Range(2, 3), |ev, call| {
        Ok(Value::Bool(
            age_check(ev, call)?.is_some_and(|(elapsed, max)| elapsed > max),
        ))
    });
    registry.register("is_within", Arity::Range(2, 3), |ev, call| {
        Ok(Value::Bool(
            age_check(ev, call)?.is_some_and(|(elapsed, max)| elapsed <= max),
        ))
    });
    registry.register("now", Arity::Exact(0), |ev, _| {
        Ok(Value::string(format_timestamp(&ev.options().now())))
    });
}

/// Parse an RFC 3339 timestamp value.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Render an instant the way `now()` reports it: UTC with milliseconds.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn timestamp_arg(
    ev: &mut Evaluator<'_>,
    call: &Call<'_>,
    index: usize,
) -> Result<Option<DateTime<Utc>>, EvalError> {
    Ok(parse_timestamp(&ev.eval_arg(call, index)?))
}

/// Elapsed seconds from `ts` to the reference instant (default: now), paired
/// with the maximum age. `None` when any input is unusable or the maximum is
/// negative.
fn age_check(ev: &mut Evaluator<'_>, call: &Call<'_>) -> Result<Option<(f64, f64)>, EvalError> {
    let ts = timestamp_arg(ev, call, 0)?;
    let max_age = match ev.eval_arg(call, 1)? {
        Value::Number(n) => Some(n),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };
    let reference = match call.arg(2) {
        Some(_) => timestamp_arg(ev, call, 2)?,
        None => Some(ev.options().now()),
    };

    let (Some(ts), Some(max_age), Some(reference)) = (ts, max_age, reference) else {
        return Ok(None);
    };
    if max_age < 0.0 || !max_age.is_finite() {
        return Ok(None);
    }
    let elapsed = (reference - ts).num_milliseconds() as f64 / 1000.0;
    Ok(Some((elapsed, max_age)))
}
