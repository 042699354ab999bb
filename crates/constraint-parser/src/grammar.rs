//! Syntax-only validation.
//!
//! Runs the shared parser and throws the tree away, so a constraint author can
//! be told an expression is malformed without any data context.

use serde::Serialize;

use crate::error::ParseError;
use crate::version::ExpressionVersion;

/// Outcome of validating an expression's syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
            position: None,
        }
    }
}

impl From<ParseError> for ValidationResult {
    fn from(err: ParseError) -> Self {
        Self {
            valid: false,
            error: Some(err.message),
            position: err.position,
        }
    }
}

/// Check that `expr` parses under the grammar named by `version`.
pub fn check_syntax(expr: &str, version: &str) -> Result<(), ParseError> {
    let version: ExpressionVersion = version.parse()?;
    crate::parse(expr, version).map(|_| ())
}

/// Validate `expr` under `version`, reporting the first structural violation.
pub fn validate(expr: &str, version: &str) -> ValidationResult {
    match check_syntax(expr, version) {
        Ok(()) => ValidationResult::ok(),
        Err(err) => err.into(),
    }
}
