//! Parse errors.

use crate::lexer::LexicalError;

/// Which stage rejected the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Unrecognized character, unterminated string or bad escape.
    Lexical,
    /// Token sequence does not match the grammar.
    Syntax,
    /// Nesting exceeded [`MAX_EXPRESSION_DEPTH`](crate::MAX_EXPRESSION_DEPTH).
    DepthExceeded,
    /// The requested grammar version is not published.
    UnsupportedVersion,
}

/// A parse error with the offset of the offending token.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// Byte offset of the token where parsing stopped. `None` only for
    /// errors that precede tokenization (unknown version).
    pub position: Option<usize>,
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, position: usize) -> Self {
        Self {
            kind: ParseErrorKind::Syntax,
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn depth_exceeded(position: usize) -> Self {
        Self {
            kind: ParseErrorKind::DepthExceeded,
            message: "Expression nesting exceeds maximum depth".to_string(),
            position: Some(position),
        }
    }

    pub fn unsupported_version(version: &str) -> Self {
        Self {
            kind: ParseErrorKind::UnsupportedVersion,
            message: format!("Unsupported expression version: {}", version),
            position: None,
        }
    }
}

impl From<LexicalError> for ParseError {
    fn from(err: LexicalError) -> Self {
        Self {
            kind: ParseErrorKind::Lexical,
            message: err.message,
            position: Some(err.position),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{} at position {}", self.message, pos),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}
