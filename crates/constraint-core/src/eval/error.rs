//! Evaluation error types.

use constraint_parser::{ParseError, ParseErrorKind};

use super::functions::Arity;

/// An error that aborted evaluation of an expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    /// The error message.
    pub message: String,
    /// The kind of error.
    pub kind: EvalErrorKind,
    /// Byte offset of the expression node that failed, when known.
    pub position: Option<usize>,
}

/// The kind of evaluation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// The expression did not tokenize or parse.
    Syntax,
    /// Identifier or path not present in scope or context.
    UnknownIdentifier,
    /// Call to a name with no registered builtin.
    UnknownFunction,
    /// Builtin called with the wrong number of arguments.
    ArityMismatch,
    /// Operand or argument of the wrong type.
    TypeMismatch,
    /// Argument of the right type but unusable value.
    InvalidArgument,
    /// Nesting exceeded `MAX_EXPRESSION_DEPTH`.
    DepthExceeded,
    /// Exact integer overflow.
    Overflow,
    /// Exact integer division or remainder by zero.
    DivisionByZero,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            position: None,
        }
    }

    /// Attach a position unless a more specific one is already set.
    pub fn at(mut self, position: usize) -> Self {
        self.position.get_or_insert(position);
        self
    }

    pub fn unknown_identifier(path: &str) -> Self {
        Self::new(
            EvalErrorKind::UnknownIdentifier,
            format!("unknown identifier: {}", path),
        )
    }

    pub fn unknown_function(name: &str) -> Self {
        Self::new(
            EvalErrorKind::UnknownFunction,
            format!("unknown function: {}", name),
        )
    }

    pub fn arity(function: &str, expected: Arity, actual: usize) -> Self {
        Self::new(
            EvalErrorKind::ArityMismatch,
            format!(
                "{}() expects {} argument(s), got {}",
                function,
                expected.description(),
                actual
            ),
        )
    }

    pub fn type_mismatch(expected: &str, actual: &str) -> Self {
        Self::new(
            EvalErrorKind::TypeMismatch,
            format!("expected {}, got {}", expected, actual),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::InvalidArgument, message)
    }

    pub fn depth_exceeded() -> Self {
        Self::new(
            EvalErrorKind::DepthExceeded,
            "Expression nesting exceeds maximum depth",
        )
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::Overflow, message)
    }

    pub fn division_by_zero() -> Self {
        Self::new(EvalErrorKind::DivisionByZero, "division by zero")
    }
}

impl From<ParseError> for EvalError {
    fn from(err: ParseError) -> Self {
        let kind = match err.kind {
            ParseErrorKind::DepthExceeded => EvalErrorKind::DepthExceeded,
            _ => EvalErrorKind::Syntax,
        };
        Self {
            message: err.message,
            kind,
            position: err.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_position_wins() {
        let err = EvalError::unknown_identifier("a.b").at(4).at(0);
        assert_eq!(err.position, Some(4));
    }

    #[test]
    fn parse_depth_maps_to_depth_kind() {
        let err: EvalError = ParseError::depth_exceeded(3).into();
        assert_eq!(err.kind, EvalErrorKind::DepthExceeded);
        assert_eq!(err.position, Some(3));
    }

    #[test]
    fn arity_message() {
        let err = EvalError::arity("len", Arity::Exact(1), 2);
        assert_eq!(err.to_string(), "len() expects 1 argument(s), got 2");
    }
}
