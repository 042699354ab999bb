//! Structured evaluation for hosts that report failures to constraint authors.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::options::EvalOptions;
use crate::value::Value;

/// Outcome of [`evaluate_detailed`].
///
/// Serializes as `{"valid": true, "value": ...}` or
/// `{"valid": false, "error": "...", "position": n}`, omitting `position`
/// when unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    Valid { value: Value },
    Invalid { error: String, position: Option<usize> },
}

impl EvaluationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, EvaluationResult::Valid { .. })
    }

    /// The computed value, if evaluation succeeded.
    pub fn value(&self) -> Option<&Value> {
        match self {
            EvaluationResult::Valid { value } => Some(value),
            EvaluationResult::Invalid { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            EvaluationResult::Valid { .. } => None,
            EvaluationResult::Invalid { error, .. } => Some(error),
        }
    }

    /// Byte offset of the failing token or node.
    pub fn position(&self) -> Option<usize> {
        match self {
            EvaluationResult::Valid { .. } => None,
            EvaluationResult::Invalid { position, .. } => *position,
        }
    }
}

impl Serialize for EvaluationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EvaluationResult::Valid { value } => {
                let mut state = serializer.serialize_struct("EvaluationResult", 2)?;
                state.serialize_field("valid", &true)?;
                state.serialize_field("value", value)?;
                state.end()
            }
            EvaluationResult::Invalid { error, position } => {
                let len = if position.is_some() { 3 } else { 2 };
                let mut state = serializer.serialize_struct("EvaluationResult", len)?;
                state.serialize_field("valid", &false)?;
                state.serialize_field("error", error)?;
                match position {
                    Some(position) => state.serialize_field("position", position)?,
                    None => state.skip_field("position")?,
                }
                state.end()
            }
        }
    }
}

/// Validate then evaluate `expression`, folding every failure into the result.
///
/// Syntax failures are reported exactly as the grammar validator reports them;
/// evaluation failures carry the position of the innermost failing node.
pub fn evaluate_detailed(expression: &str, context: &Value, options: &EvalOptions) -> EvaluationResult {
    let syntax = constraint_parser::validate(expression, &options.expression_version);
    if !syntax.valid {
        return EvaluationResult::Invalid {
            error: syntax.error.unwrap_or_else(|| "invalid expression".to_string()),
            position: syntax.position,
        };
    }

    match crate::evaluate(context, expression, options) {
        Ok(value) => EvaluationResult::Valid { value },
        Err(err) => EvaluationResult::Invalid {
            error: err.message,
            position: err.position,
        },
    }
}
