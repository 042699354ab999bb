//! Findings reported by the type checker.
//!
//! Neither type is ever raised; both are accumulated into a
//! [`TypeCheckResult`](super::TypeCheckResult).

use serde::{Deserialize, Serialize};

/// A declared type that contradicts the schema or the language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{constraint_id}: {message}")]
pub struct TypeCheckError {
    /// The constraint at fault, or the schema id for file-level problems.
    pub constraint_id: String,
    pub message: String,
    /// The offending piece of metadata, such as a field path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
    pub expected: String,
    pub actual: String,
}

impl TypeCheckError {
    /// The file's schema is not registered.
    pub fn unknown_schema(schema_id: &str) -> Self {
        Self {
            constraint_id: schema_id.to_string(),
            message: format!("schema '{}' not found in registry", schema_id),
            fragment: Some(schema_id.to_string()),
            expected: "registered schema".to_string(),
            actual: "unknown".to_string(),
        }
    }

    /// The file declares an expression version no parser understands.
    pub fn unknown_version(schema_id: &str, version: &str) -> Self {
        Self {
            constraint_id: schema_id.to_string(),
            message: format!("unsupported expression_version '{}'", version),
            fragment: Some(version.to_string()),
            expected: constraint_parser::SUPPORTED_VERSIONS.join(" | "),
            actual: version.to_string(),
        }
    }

    pub fn input_schema_mismatch(constraint_id: &str, declared: &str, schema_id: &str) -> Self {
        Self {
            constraint_id: constraint_id.to_string(),
            message: format!(
                "type_signature.input_schema '{}' does not match file schema_id '{}'",
                declared, schema_id
            ),
            fragment: Some(declared.to_string()),
            expected: schema_id.to_string(),
            actual: declared.to_string(),
        }
    }

    pub fn non_boolean_output(constraint_id: &str, declared: &str) -> Self {
        Self {
            constraint_id: constraint_id.to_string(),
            message: format!("constraint output_type must be 'boolean', got '{}'", declared),
            fragment: Some(format!("output_type: {}", declared)),
            expected: "boolean".to_string(),
            actual: declared.to_string(),
        }
    }

    /// A field path whose root is not a field of the schema.
    pub fn unknown_field(constraint_id: &str, path: &str, schema_id: &str) -> Self {
        let root = root_segment(path);
        Self {
            constraint_id: constraint_id.to_string(),
            message: format!(
                "field path '{}' root '{}' not found in schema '{}'",
                path, root, schema_id
            ),
            fragment: Some(path.to_string()),
            expected: format!("field of {}", schema_id),
            actual: root.to_string(),
        }
    }
}

/// A softer problem that does not fail the check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCheckWarning {
    pub constraint_id: String,
    pub message: String,
}

impl TypeCheckWarning {
    pub fn new(constraint_id: &str, message: impl Into<String>) -> Self {
        Self {
            constraint_id: constraint_id.to_string(),
            message: message.into(),
        }
    }
}

/// First segment of a dotted field path.
pub(crate) fn root_segment(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}
