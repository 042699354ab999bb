//! The constraint file document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named set of expressions bound to one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintFile {
    pub schema_id: String,
    pub contract_version: String,
    #[serde(default = "default_expression_version")]
    pub expression_version: String,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

fn default_expression_version() -> String {
    constraint_parser::EXPRESSION_VERSION.to_string()
}

impl ConstraintFile {
    /// Parse a constraint file from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up a constraint by id.
    pub fn constraint(&self, id: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.id == id)
    }
}

/// One rule in a constraint file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: String,
    pub expression: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_signature: Option<TypeSignature>,
}

/// How a violated constraint is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Declared typing metadata of a constraint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeSignature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
    /// Field path to declared type, e.g. `"links.budget" -> "bigint_coercible"`.
    #[serde(default)]
    pub field_types: BTreeMap<String, String>,
}
