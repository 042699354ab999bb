//! Catalogue of the standard builtins with documentation and executable examples.
//!
//! Every example is a small context document, an expression and the value it
//! must produce, so the catalogue doubles as a conformance table for other
//! implementations of the language.

mod specs;

use std::collections::HashSet;
use std::sync::LazyLock;

use serde::{Serialize, Serializer};

pub use specs::EVALUATOR_BUILTIN_SPECS;

/// One argument of a builtin.
#[derive(Debug, Clone, Serialize)]
pub struct ArgumentSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub description: &'static str,
}

/// An executable example: `expression` evaluated against `context` yields `expected`.
#[derive(Debug, Clone, Serialize)]
pub struct Example {
    pub description: &'static str,
    /// JSON document.
    #[serde(serialize_with = "embed_json")]
    pub context: &'static str,
    pub expression: &'static str,
    /// JSON value.
    #[serde(serialize_with = "embed_json")]
    pub expected: &'static str,
}

impl Example {
    /// The context as a JSON document.
    pub fn context_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(self.context)
    }

    /// The expected result as a JSON value.
    pub fn expected_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(self.expected)
    }
}

/// Documentation for a standard builtin.
#[derive(Debug, Clone, Serialize)]
pub struct BuiltinSpec {
    /// Function name (e.g. "bigint_sum")
    pub name: &'static str,
    /// Call signature (e.g. "bigint_sum(array, field?) -> bigint")
    pub signature: &'static str,
    pub description: &'static str,
    pub arguments: &'static [ArgumentSpec],
    pub return_type: &'static str,
    /// Whether the builtin may skip evaluating part of its input.
    pub short_circuit: bool,
    pub examples: &'static [Example],
    pub edge_cases: &'static [&'static str],
}

/// Serialize JSON text as the document it holds rather than as a string.
fn embed_json<S: Serializer>(text: &&'static str, serializer: S) -> Result<S::Ok, S::Error> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(serde::ser::Error::custom)?;
    value.serialize(serializer)
}

static SPEC_NAMES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| EVALUATOR_BUILTIN_SPECS.iter().map(|s| s.name).collect());

/// Check if a name has a catalogue entry.
pub fn is_documented(name: &str) -> bool {
    SPEC_NAMES.contains(name)
}

/// Get the catalogue entry for a builtin by name.
pub fn builtin_spec(name: &str) -> Option<&'static BuiltinSpec> {
    EVALUATOR_BUILTIN_SPECS.iter().find(|s| s.name == name)
}
