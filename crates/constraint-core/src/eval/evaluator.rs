//! Tree-walking evaluator for constraint expressions.
//!
//! The evaluator performs depth-first traversal of the AST, evaluating
//! each node and returning a `Value`. It supports:
//!
//! - Arithmetic with an exact-integer path for currency values
//! - Short-circuit evaluation for `&&`, `||` and `=>`
//! - Builtin calls via the function registry
//! - Scoped lambda parameters for the `every`/`some` quantifiers
//!
//! Unlike a total evaluator, missing identifiers are hard errors: a rule that
//! mistypes a field name fails loudly instead of quietly comparing `undefined`.

use std::cmp::Ordering;
use std::sync::Arc;

use constraint_parser::{BinaryOp, Expr, Span, SpannedExpr, UnaryOp, MAX_EXPRESSION_DEPTH};
use tracing::trace;

use super::scope::{Frame, ScopeStack};
use super::{Call, EvalError, FunctionRegistry};
use crate::exact;
use crate::options::EvalOptions;
use crate::value::Value;

/// The constraint expression evaluator.
///
/// Evaluates an AST against a read-only context document and a function
/// registry. Lambda parameters live on an explicit scope stack that is
/// pushed per quantified element.
pub struct Evaluator<'a> {
    context: &'a Value,
    functions: &'a FunctionRegistry,
    options: &'a EvalOptions,
    scopes: ScopeStack,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    /// Create a new evaluator.
    pub fn new(
        context: &'a Value,
        functions: &'a FunctionRegistry,
        options: &'a EvalOptions,
    ) -> Self {
        Self {
            context,
            functions,
            options,
            scopes: ScopeStack::new(),
            depth: 0,
        }
    }

    /// The root context document.
    pub fn context(&self) -> &'a Value {
        self.context
    }

    pub fn options(&self) -> &'a EvalOptions {
        self.options
    }

    /// Evaluate an expression.
    ///
    /// Errors carry the position of the innermost node that failed.
    pub fn eval(&mut self, expr: &SpannedExpr) -> Result<Value, EvalError> {
        self.eval_expr(expr).map_err(|err| err.at(expr.span.start))
    }

    fn eval_expr(&mut self, expr: &SpannedExpr) -> Result<Value, EvalError> {
        match &expr.node {
            // Literals
            Expr::Null => Ok(Value::Null),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Number(text) => exact::literal(text).ok_or_else(|| {
                EvalError::invalid_argument(format!("invalid numeric literal: {}", text))
            }),
            Expr::String(s) => Ok(Value::string(s.as_str())),

            Expr::Ident(name) => self
                .lookup(name)
                .cloned()
                .ok_or_else(|| EvalError::unknown_identifier(name)),

            Expr::List(elements) => {
                let values = elements
                    .iter()
                    .map(|element| self.eval(element))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::from(values))
            }

            Expr::Unary { op, expr: operand } => self.eval_unary(*op, operand),
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),

            Expr::Member { expr: base, field } => {
                let value = self.eval(base)?;
                access_field(&value, field).ok_or_else(|| missing(expr, field))
            }
            Expr::Index { expr: base, index } => {
                let value = self.eval(base)?;
                let key = self.eval(index)?;
                if !matches!(value, Value::Array(_) | Value::Object(_)) {
                    return Err(EvalError::type_mismatch(
                        "array or object to index",
                        value.type_name(),
                    ));
                }
                access_index(&value, &key).ok_or_else(|| missing(expr, &key.to_string()))
            }

            Expr::Call { name, args } => self.eval_call(name, args, &expr.span),

            Expr::Lambda { .. } => Err(EvalError::type_mismatch(
                "value",
                "lambda outside a quantifier argument",
            )),
        }
    }

    /// Scope frames first, innermost wins; then the context root.
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes
            .resolve(name)
            .or_else(|| self.context.get(name))
    }

    /// Resolve a path expression without failing on missing steps.
    ///
    /// Non-path expressions are evaluated normally.
    pub fn try_resolve(&mut self, expr: &SpannedExpr) -> Result<Option<Value>, EvalError> {
        match &expr.node {
            Expr::Ident(name) => Ok(self.lookup(name).cloned()),
            Expr::Member { expr: base, field } => {
                Ok(self.try_resolve(base)?.and_then(|v| access_field(&v, field)))
            }
            Expr::Index { expr: base, index } => {
                let Some(value) = self.try_resolve(base)? else {
                    return Ok(None);
                };
                let key = self.eval(index)?;
                Ok(access_index(&value, &key))
            }
            _ => self.eval(expr).map(Some),
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &SpannedExpr) -> Result<Value, EvalError> {
        let value = self.eval(operand)?;
        match op {
            UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
            UnaryOp::Neg => match value {
                Value::Number(n) => Ok(Value::Number(-n)),
                Value::BigInt(d) => Ok(Value::BigInt(-d)),
                other => Err(EvalError::type_mismatch("number", other.type_name())),
            },
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &SpannedExpr,
        right: &SpannedExpr,
    ) -> Result<Value, EvalError> {
        // Short-circuit operators
        match op {
            BinaryOp::And => {
                if !self.eval(left)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                return Ok(Value::Bool(self.eval(right)?.is_truthy()));
            }
            BinaryOp::Or => {
                if self.eval(left)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(self.eval(right)?.is_truthy()));
            }
            BinaryOp::Implies => {
                if !self.eval(left)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(self.eval(right)?.is_truthy()));
            }
            _ => {}
        }

        let l = self.eval(left)?;
        let r = self.eval(right)?;
        match op {
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => Ok(Value::Bool(compare(op, &l, &r))),
            _ => arithmetic(op, &l, &r),
        }
    }

    fn eval_call(
        &mut self,
        name: &str,
        args: &[SpannedExpr],
        span: &Span,
    ) -> Result<Value, EvalError> {
        let functions = self.functions;
        let builtin = functions
            .get(name)
            .ok_or_else(|| EvalError::unknown_function(name))?;
        if !builtin.arity.is_valid(args.len()) {
            return Err(EvalError::arity(name, builtin.arity, args.len()));
        }

        trace!(function = name, args = args.len(), "dispatching builtin");
        self.enter()?;
        let call = Call { name, args, span };
        let result = (builtin.implementation)(self, &call);
        self.depth -= 1;
        result
    }

    /// Evaluate a lambda body with `param` bound to `value`.
    ///
    /// The binding frame is popped whether or not the body succeeds.
    pub fn apply(
        &mut self,
        param: &str,
        body: &SpannedExpr,
        value: Value,
    ) -> Result<Value, EvalError> {
        self.enter()?;
        self.scopes.push(Frame::with_binding(param, value));
        let result = self.eval(body);
        self.scopes.pop();
        self.depth -= 1;
        result
    }

    /// Evaluate the argument at `index`.
    pub fn eval_arg(&mut self, call: &Call<'_>, index: usize) -> Result<Value, EvalError> {
        let arg = call.required(index)?;
        self.eval(arg)
    }

    /// Evaluate every argument in order.
    pub fn eval_args(&mut self, call: &Call<'_>) -> Result<Vec<Value>, EvalError> {
        call.args.iter().map(|arg| self.eval(arg)).collect()
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            return Err(EvalError::depth_exceeded());
        }
        self.depth += 1;
        Ok(())
    }
}

/// Field access. `.length` is synthesized for arrays and strings; objects
/// only answer with their own keys.
fn access_field(value: &Value, field: &str) -> Option<Value> {
    match value {
        Value::Object(map) => map.get(field).cloned(),
        Value::Array(items) if field == "length" => Some(Value::from(items.len())),
        Value::String(s) if field == "length" => Some(Value::from(s.chars().count())),
        _ => None,
    }
}

fn access_index(value: &Value, key: &Value) -> Option<Value> {
    match (value, key) {
        (Value::Array(items), Value::Number(n)) if *n >= 0.0 && n.fract() == 0.0 => {
            items.get(*n as usize).cloned()
        }
        (Value::Array(items), Value::String(s)) => {
            s.parse::<usize>().ok().and_then(|i| items.get(i).cloned())
        }
        (Value::Object(map), Value::String(s)) => map.get(&**s).cloned(),
        (Value::Object(map), Value::Number(n)) if n.fract() == 0.0 => {
            map.get(&(*n as i64).to_string()).cloned()
        }
        _ => None,
    }
}

fn missing(expr: &SpannedExpr, last: &str) -> EvalError {
    let path = expr.node.as_path().unwrap_or_else(|| last.to_string());
    EvalError::unknown_identifier(&path)
}

/// Comparison with null, exact-integer and mixed-type rules.
fn compare(op: BinaryOp, left: &Value, right: &Value) -> bool {
    if left.is_null() || right.is_null() {
        let both = left.is_null() && right.is_null();
        return match op {
            BinaryOp::Eq => both,
            BinaryOp::Ne => !both,
            _ => false,
        };
    }

    let ordering = match (left, right) {
        (Value::BigInt(_), _) | (_, Value::BigInt(_)) => {
            match (exact::coerce(left), exact::coerce(right)) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                _ => None,
            }
        }
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(_), Value::Bool(_))
        | (Value::Array(_), Value::Array(_))
        | (Value::Object(_), Value::Object(_)) => {
            return match op {
                BinaryOp::Eq => left == right,
                BinaryOp::Ne => left != right,
                _ => false,
            };
        }
        _ => None,
    };

    match ordering {
        Some(ord) => match op {
            BinaryOp::Eq => ord == Ordering::Equal,
            BinaryOp::Ne => ord != Ordering::Equal,
            BinaryOp::Lt => ord == Ordering::Less,
            BinaryOp::Le => ord != Ordering::Greater,
            BinaryOp::Gt => ord == Ordering::Greater,
            BinaryOp::Ge => ord != Ordering::Less,
            _ => false,
        },
        // Mixed types and NaN: only inequality holds.
        None => op == BinaryOp::Ne,
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            let n = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Mod => a % b,
                _ => return Err(operand_mismatch(op, left, right)),
            };
            Ok(Value::Number(n))
        }
        (Value::BigInt(_), _) | (_, Value::BigInt(_)) => {
            let (Some(a), Some(b)) = (exact::coerce(left), exact::coerce(right)) else {
                return Err(operand_mismatch(op, left, right));
            };
            let d = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => exact::div(&a, &b)?,
                BinaryOp::Mod => exact::rem(&a, &b)?,
                _ => return Err(operand_mismatch(op, left, right)),
            };
            Ok(Value::BigInt(d))
        }
        (Value::String(a), Value::String(b)) if op == BinaryOp::Add => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::String(Arc::from(joined)))
        }
        _ => Err(operand_mismatch(op, left, right)),
    }
}

fn operand_mismatch(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalError::type_mismatch(
        &format!("numeric operands for '{}'", op.as_str()),
        &format!("{} and {}", left.type_name(), right.type_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{Arity, EvalErrorKind};
    use constraint_parser::{parse, ExpressionVersion};
    use dashu::Integer;
    use serde_json::json;

    fn eval_with(source: &str, context: serde_json::Value) -> Result<Value, EvalError> {
        let ast = parse(source, ExpressionVersion::default()).expect("parse");
        let context = Value::from(context);
        let registry = FunctionRegistry::standard();
        let options = EvalOptions::default();
        Evaluator::new(&context, &registry, &options).eval(&ast)
    }

    fn eval_expr(source: &str) -> Value {
        eval_with(source, json!({})).expect("eval")
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval_expr("null"), Value::Null);
        assert_eq!(eval_expr("true"), Value::Bool(true));
        assert_eq!(eval_expr("42"), Value::Number(42.0));
        assert_eq!(eval_expr("0.5"), Value::Number(0.5));
        assert_eq!(eval_expr("'hi'"), Value::from("hi"));
        assert_eq!(
            eval_expr("[1, 'a', null]"),
            Value::from(vec![Value::from(1i64), Value::from("a"), Value::Null])
        );
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_expr("1 + 2 * 3"), Value::Number(7.0));
        assert_eq!(eval_expr("7 / 2"), Value::Number(3.5));
        assert_eq!(eval_expr("7 % 4"), Value::Number(3.0));
        assert_eq!(eval_expr("-(2 + 3)"), Value::Number(-5.0));
        assert_eq!(eval_expr("'ab' + 'cd'"), Value::from("abcd"));
    }

    #[test]
    fn test_exact_arithmetic() {
        let value = eval_expr("100000000000000000000 + 1");
        assert_eq!(
            value,
            Value::BigInt("100000000000000000001".parse::<Integer>().unwrap())
        );
        let err = eval_with("100000000000000000000 / 0", json!({})).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    }

    #[test]
    fn test_mixed_arithmetic_is_type_mismatch() {
        let err = eval_with("1 + 'a'", json!({})).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
        let err = eval_with("true * 2", json!({})).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
    }

    #[test]
    fn test_comparison() {
        assert_eq!(eval_expr("1 < 2"), Value::Bool(true));
        assert_eq!(eval_expr("2 <= 2"), Value::Bool(true));
        assert_eq!(eval_expr("'b' > 'a'"), Value::Bool(true));
        assert_eq!(eval_expr("[1, 2] == [1, 2]"), Value::Bool(true));
        assert_eq!(eval_expr("true == true"), Value::Bool(true));
        assert_eq!(eval_expr("true < false"), Value::Bool(false));
    }

    #[test]
    fn test_null_comparison() {
        assert_eq!(eval_expr("null == null"), Value::Bool(true));
        assert_eq!(eval_expr("null != 1"), Value::Bool(true));
        assert_eq!(eval_expr("null < 1"), Value::Bool(false));
        assert_eq!(eval_expr("null >= 1"), Value::Bool(false));
    }

    #[test]
    fn test_mixed_type_comparison() {
        assert_eq!(eval_expr("1 == '1'"), Value::Bool(false));
        assert_eq!(eval_expr("1 != '1'"), Value::Bool(true));
        assert_eq!(eval_expr("1 < '2'"), Value::Bool(false));
    }

    #[test]
    fn test_bigint_comparison_coerces() {
        let ctx = json!({"amount": "100000000000000000001"});
        assert_eq!(
            eval_with("100000000000000000000 < amount", ctx).unwrap(),
            Value::Bool(true)
        );
        let ctx = json!({"limit": 5});
        assert_eq!(
            eval_with("100000000000000000000 > limit", ctx).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_logical() {
        assert_eq!(eval_expr("true && false"), Value::Bool(false));
        assert_eq!(eval_expr("false || 'x'"), Value::Bool(true));
        assert_eq!(eval_expr("!0"), Value::Bool(true));
        assert_eq!(eval_expr("false => nonsense"), Value::Bool(true));
        assert_eq!(eval_expr("true => false"), Value::Bool(false));
    }

    #[test]
    fn test_short_circuit() {
        assert_eq!(eval_expr("false && missing.field"), Value::Bool(false));
        assert_eq!(eval_expr("true || missing.field"), Value::Bool(true));
    }

    #[test]
    fn test_paths() {
        let ctx = json!({"order": {"lines": [{"sku": "a"}, {"sku": "b"}], "length": 9}});
        assert_eq!(eval_with("order.lines[1].sku", ctx.clone()).unwrap(), Value::from("b"));
        assert_eq!(eval_with("order.lines['0'].sku", ctx.clone()).unwrap(), Value::from("a"));
        assert_eq!(eval_with("order['lines'].length", ctx.clone()).unwrap(), Value::from(2i64));
        assert_eq!(eval_with("order.length", ctx).unwrap(), Value::from(9i64));
    }

    #[test]
    fn test_missing_identifier_is_error() {
        let err = eval_with("a.b.c == 1", json!({"a": {"b": {}}})).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::UnknownIdentifier);
        assert_eq!(err.message, "unknown identifier: a.b.c");
        assert_eq!(err.position, Some(0));

        let err = eval_with("1 + ghost", json!({})).unwrap_err();
        assert_eq!(err.position, Some(4));
    }

    #[test]
    fn test_indexing_scalar_is_type_mismatch() {
        let err = eval_with("n[0]", json!({"n": 3})).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
    }

    #[test]
    fn test_unknown_function_and_arity() {
        let err = eval_with("nope(1)", json!({})).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::UnknownFunction);
        let err = eval_with("len(1, 2)", json!({})).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::ArityMismatch);
        assert_eq!(err.position, Some(0));
    }

    #[test]
    fn test_quantifier_scope() {
        let ctx = json!({"x": 100, "xs": [1, 2, 3]});
        assert_eq!(eval_with("every(xs, x -> x < 10)", ctx.clone()).unwrap(), Value::Bool(true));
        assert_eq!(eval_with("every(xs, x -> x < 10) && x == 100", ctx).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_custom_function() {
        let registry = FunctionRegistry::new().with_function("double", Arity::Exact(1), |ev, call| {
            match ev.eval_arg(call, 0)? {
                Value::Number(n) => Ok(Value::Number(n * 2.0)),
                other => Err(EvalError::type_mismatch("number", other.type_name())),
            }
        });
        let ast = parse("double(21)", ExpressionVersion::default()).unwrap();
        let context = Value::Null;
        let options = EvalOptions::default();
        let value = Evaluator::new(&context, &registry, &options).eval(&ast).unwrap();
        assert_eq!(value, Value::Number(42.0));
    }

    #[test]
    fn test_call_depth_guard() {
        let registry = FunctionRegistry::new()
            .with_function("wrap", Arity::Exact(1), |ev, call| ev.eval_arg(call, 0));
        let mut expr = SpannedExpr::new(0, Expr::Null, 0..4);
        for _ in 0..40 {
            expr = SpannedExpr::new(
                0,
                Expr::Call {
                    name: "wrap".into(),
                    args: vec![expr],
                },
                0..4,
            );
        }
        let context = Value::Null;
        let options = EvalOptions::default();
        let err = Evaluator::new(&context, &registry, &options)
            .eval(&expr)
            .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DepthExceeded);
    }
}
