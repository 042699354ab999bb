//! Compiled constraint program ready for evaluation.
//!
//! A `Program` combines a parsed AST with a function registry, so one
//! expression can be checked once and evaluated against many contexts.

use std::fmt;
use std::sync::Arc;

use constraint_parser::{parse, ExpressionVersion, SpannedExpr};
use tracing::debug;

use super::{EvalError, Evaluator, FunctionRegistry};
use crate::builtins::standard_functions;
use crate::options::EvalOptions;
use crate::value::Value;

/// A compiled constraint expression.
///
/// Programs are immutable and cheap to clone; they can be shared across
/// threads and evaluated concurrently.
#[derive(Clone)]
pub struct Program {
    source: Arc<str>,
    ast: Arc<SpannedExpr>,
    version: ExpressionVersion,
    functions: Arc<FunctionRegistry>,
}

impl Program {
    /// Parse `source` under `version`, bound to the standard builtins.
    pub fn compile(source: &str, version: ExpressionVersion) -> Result<Self, EvalError> {
        debug!(len = source.len(), version = %version, "compiling constraint expression");
        let ast = parse(source, version)?;
        Ok(Self {
            source: Arc::from(source),
            ast: Arc::new(ast),
            version,
            functions: standard_functions(),
        })
    }

    /// Replace the function registry used for evaluation.
    pub fn with_functions(mut self, functions: Arc<FunctionRegistry>) -> Self {
        self.functions = functions;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &SpannedExpr {
        &self.ast
    }

    pub fn version(&self) -> ExpressionVersion {
        self.version
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Evaluate against a context document.
    pub fn evaluate(&self, context: &Value, options: &EvalOptions) -> Result<Value, EvalError> {
        Evaluator::new(context, &self.functions, options).eval(&self.ast)
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("source", &self.source)
            .field("version", &self.version)
            .field("functions", &format!("{} functions", self.functions.len()))
            .finish()
    }
}
