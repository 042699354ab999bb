//! Expression grammar versions.
//!
//! A version tag travels with every constraint file so that consumers parse
//! with the grammar the author wrote against. Versions are additive: anything
//! valid under "1.0" is valid under "2.0".

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// The grammar version used when none is specified.
pub const EXPRESSION_VERSION: &str = "2.0";

/// Every published grammar version, oldest first.
pub const SUPPORTED_VERSIONS: &[&str] = &["1.0", "2.0"];

/// A published expression grammar version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ExpressionVersion {
    /// Operators, paths, builtin calls and the `.every(x => ...)` method form.
    V1_0,
    /// Adds `param -> body` lambda arguments.
    #[default]
    V2_0,
}

impl ExpressionVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionVersion::V1_0 => "1.0",
            ExpressionVersion::V2_0 => "2.0",
        }
    }

    /// Whether `ident -> expr` lambda arguments are accepted.
    pub fn supports_lambdas(&self) -> bool {
        *self >= ExpressionVersion::V2_0
    }
}

impl FromStr for ExpressionVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(ExpressionVersion::V1_0),
            "2.0" => Ok(ExpressionVersion::V2_0),
            other => Err(ParseError::unsupported_version(other)),
        }
    }
}

impl fmt::Display for ExpressionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
