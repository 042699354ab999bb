//! Evaluation options.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use constraint_parser::{ExpressionVersion, ParseError, EXPRESSION_VERSION};
use serde::Deserialize;
use tracing::warn;

use crate::eval::FunctionRegistry;

/// Options controlling a single evaluation.
///
/// ```
/// use constraint_core::EvalOptions;
///
/// let options = EvalOptions::new()
///     .with_expression_version("1.0")
///     .with_evaluation_timestamp("2026-01-01T00:00:00Z");
/// assert_eq!(options.expression_version, "1.0");
/// ```
///
/// Hosts may also load options from JSON; missing fields take their defaults.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Grammar version tag (`"1.0"` or `"2.0"`).
    pub expression_version: String,
    /// Fixed instant returned by `now()`, for deterministic replay.
    pub evaluation_timestamp: Option<String>,
    #[serde(skip)]
    functions: Option<Arc<FunctionRegistry>>,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            expression_version: EXPRESSION_VERSION.to_string(),
            evaluation_timestamp: None,
            functions: None,
        }
    }
}

impl EvalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expression_version(mut self, version: impl Into<String>) -> Self {
        self.expression_version = version.into();
        self
    }

    pub fn with_evaluation_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.evaluation_timestamp = Some(timestamp.into());
        self
    }

    /// Evaluate with a custom registry instead of the standard builtins.
    pub fn with_functions(mut self, functions: Arc<FunctionRegistry>) -> Self {
        self.functions = Some(functions);
        self
    }

    /// The custom registry, if one was configured.
    pub fn functions(&self) -> Option<&Arc<FunctionRegistry>> {
        self.functions.as_ref()
    }

    /// The parsed grammar version.
    pub fn version(&self) -> Result<ExpressionVersion, ParseError> {
        self.expression_version.parse()
    }

    /// The instant `now()` reports.
    ///
    /// An unparseable `evaluation_timestamp` falls back to the live clock.
    pub fn now(&self) -> DateTime<Utc> {
        let Some(raw) = self.evaluation_timestamp.as_deref() else {
            return Utc::now();
        };
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(err) => {
                warn!(timestamp = raw, error = %err, "invalid evaluation_timestamp, using live clock");
                Utc::now()
            }
        }
    }
}

impl fmt::Debug for EvalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalOptions")
            .field("expression_version", &self.expression_version)
            .field("evaluation_timestamp", &self.evaluation_timestamp)
            .field("custom_functions", &self.functions.as_ref().map(|r| r.len()))
            .finish()
    }
}
