//! Exact integer arithmetic for currency-shaped values.
//!
//! Amounts travel as decimal integer strings ("1000000") and are never routed
//! through `f64`. They are held as arbitrary-precision `dashu::Integer`, so
//! sums and differences of any magnitude stay exact.

use std::str::FromStr;

use dashu::Integer;

use crate::eval::EvalError;
use crate::value::Value;

/// Integer literals above this magnitude no longer fit an f64 exactly.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Parse an optionally negative string of ASCII digits.
pub fn parse_integer(s: &str) -> Option<Integer> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Integer::from_str(s).ok()
}

/// Convert an integral, finite float.
pub fn from_integral_f64(n: f64) -> Option<Integer> {
    if !n.is_finite() || n.fract() != 0.0 {
        return None;
    }
    if n.abs() <= MAX_SAFE_INTEGER {
        return Some(Integer::from(n as i64));
    }
    // Integral floats print every digit at zero precision.
    parse_integer(&format!("{:.0}", n))
}

/// Exact view of a value, without the null-as-zero rule.
pub fn coerce(value: &Value) -> Option<Integer> {
    match value {
        Value::BigInt(d) => Some(d.clone()),
        Value::Number(n) => from_integral_f64(*n),
        Value::String(s) => parse_integer(s),
        _ => None,
    }
}

/// Exact operand for the bigint builtins: null counts as zero.
pub fn operand(value: &Value, function: &str) -> Result<Integer, EvalError> {
    if value.is_null() {
        return Ok(Integer::ZERO);
    }
    coerce(value).ok_or_else(|| {
        EvalError::type_mismatch(
            &format!("integer string or integral number for {}", function),
            &describe(value),
        )
    })
}

/// Decimal text of an exact integer.
pub fn render(d: &Integer) -> String {
    d.to_string()
}

/// Integer division truncating toward zero.
pub fn div(a: &Integer, b: &Integer) -> Result<Integer, EvalError> {
    if b.is_zero() {
        return Err(EvalError::division_by_zero());
    }
    Ok(a / b)
}

/// Remainder with the sign of the dividend.
pub fn rem(a: &Integer, b: &Integer) -> Result<Integer, EvalError> {
    if b.is_zero() {
        return Err(EvalError::division_by_zero());
    }
    Ok(a % b)
}

/// Whether a numeric literal needs exact representation.
pub fn literal(text: &str) -> Option<Value> {
    if text.contains('.') {
        return f64::from_str(text).ok().map(Value::Number);
    }
    let n = f64::from_str(text).ok()?;
    if n > MAX_SAFE_INTEGER {
        parse_integer(text).map(Value::BigInt)
    } else {
        Some(Value::Number(n))
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("string '{}'", s),
        Value::Number(n) => format!("number {}", n),
        other => other.type_name().to_string(),
    }
}
