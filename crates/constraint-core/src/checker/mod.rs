//! Offline type checking of constraint files.
//!
//! The checker reasons only about declared metadata: the file's schema id,
//! each constraint's `type_signature`, and the fields of the registered
//! schema. Expressions are never parsed or evaluated here.
//!
//! # Example
//!
//! ```
//! use constraint_core::checker::{type_check, ConstraintFile, SchemaInfo, SchemaRegistry};
//!
//! let file = ConstraintFile::from_json(r#"{
//!     "schema_id": "BillingEntry",
//!     "contract_version": "7.0.0",
//!     "expression_version": "2.0",
//!     "constraints": [{
//!         "id": "budget",
//!         "expression": "bigint_gte(budget_micro, cost_micro)",
//!         "severity": "error",
//!         "type_signature": {
//!             "input_schema": "BillingEntry",
//!             "output_type": "boolean",
//!             "field_types": {"budget_micro": "bigint_coercible", "cost_micro": "bigint_coercible"}
//!         }
//!     }]
//! }"#).unwrap();
//!
//! let registry = SchemaRegistry::new().with_schema(
//!     SchemaInfo::new("BillingEntry")
//!         .with_field("budget_micro", "string")
//!         .with_field("cost_micro", "string"),
//! );
//! let result = type_check(&file, &registry);
//! assert!(result.valid);
//! ```

mod errors;
mod file;
mod schema;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use errors::{TypeCheckError, TypeCheckWarning};
pub use file::{Constraint, ConstraintFile, Severity, TypeSignature};
pub use schema::{SchemaInfo, SchemaRegistry};

use crate::reserved::find_reserved_collisions;
use errors::root_segment;

/// Types a field may be declared with directly.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "boolean",
    "bigint",
    "bigint_coercible",
    "string",
    "number",
    "array",
    "object",
    "unknown",
];

static RECORD_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Record<.+>$").expect("invalid regex"));
static SCHEMA_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9_]*$").expect("invalid regex"));

/// Outcome of checking one constraint file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeCheckResult {
    /// True when there are no errors; warnings do not count.
    pub valid: bool,
    pub errors: Vec<TypeCheckError>,
    pub warnings: Vec<TypeCheckWarning>,
}

/// Whether `ty` is a type the checker understands.
///
/// Accepts the primitives, arrays of a known type (`string[]`), records
/// (`Record<string, number>`) and schema references (`SagaStep`).
pub fn is_known_type(ty: &str) -> bool {
    if let Some(element) = ty.strip_suffix("[]") {
        return is_known_type(element);
    }
    PRIMITIVE_TYPES.contains(&ty) || RECORD_TYPE.is_match(ty) || SCHEMA_REFERENCE.is_match(ty)
}

/// Check `file` against `registry`, accumulating every problem found.
pub fn type_check(file: &ConstraintFile, registry: &SchemaRegistry) -> TypeCheckResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let schema = registry.get(&file.schema_id);
    if schema.is_none() {
        errors.push(TypeCheckError::unknown_schema(&file.schema_id));
    }
    if file.expression_version.parse::<constraint_parser::ExpressionVersion>().is_err() {
        errors.push(TypeCheckError::unknown_version(&file.schema_id, &file.expression_version));
    }
    if let Some(schema) = schema {
        for collision in find_reserved_collisions(schema.fields.keys(), &schema.id) {
            warnings.push(TypeCheckWarning::new(
                &file.schema_id,
                format!("schema field '{}' shadows a reserved evaluator name", collision.field),
            ));
        }
    }

    for constraint in &file.constraints {
        let Some(sig) = &constraint.type_signature else {
            warnings.push(TypeCheckWarning::new(
                &constraint.id,
                format!("constraint '{}' has no type_signature and cannot be type-checked", constraint.id),
            ));
            continue;
        };

        if let Some(declared) = sig.input_schema.as_deref() {
            if declared != file.schema_id {
                errors.push(TypeCheckError::input_schema_mismatch(
                    &constraint.id,
                    declared,
                    &file.schema_id,
                ));
            }
        }
        if let Some(output) = sig.output_type.as_deref() {
            if output != "boolean" {
                errors.push(TypeCheckError::non_boolean_output(&constraint.id, output));
            }
        }

        for (path, ty) in &sig.field_types {
            if !is_known_type(ty) {
                warnings.push(TypeCheckWarning::new(
                    &constraint.id,
                    format!("field '{}' has unrecognized type '{}'", path, ty),
                ));
            }
            if let Some(schema) = schema {
                if !schema.fields.is_empty() && !schema.has_field(root_segment(path)) {
                    errors.push(TypeCheckError::unknown_field(&constraint.id, path, &file.schema_id));
                }
            }
        }

        let roots = sig.field_types.keys().map(|path| root_segment(path));
        for collision in find_reserved_collisions(roots, &constraint.id) {
            warnings.push(TypeCheckWarning::new(
                &constraint.id,
                format!("field '{}' shadows a reserved evaluator name", collision.field),
            ));
        }
    }

    debug!(
        schema_id = %file.schema_id,
        constraints = file.constraints.len(),
        errors = errors.len(),
        warnings = warnings.len(),
        "type-checked constraint file"
    );

    TypeCheckResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file(constraints: serde_json::Value) -> ConstraintFile {
        serde_json::from_value(json!({
            "schema_id": "BillingEntry",
            "contract_version": "7.0.0",
            "expression_version": "2.0",
            "constraints": constraints,
        }))
        .unwrap()
    }

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new().with_schema(
            SchemaInfo::new("BillingEntry")
                .with_field("amount_micro", "string")
                .with_field("links", "DelegationLink[]"),
        )
    }

    fn constraint(signature: serde_json::Value) -> serde_json::Value {
        json!({"id": "c1", "expression": "true", "severity": "error", "type_signature": signature})
    }

    #[test]
    fn known_types() {
        for ty in ["boolean", "bigint_coercible", "string[]", "string[][]", "Record<string, number>", "SagaStep", "SagaStep[]"] {
            assert!(is_known_type(ty), "{}", ty);
        }
        for ty in ["integer", "str[]", "record<string>", "", "Saga Step"] {
            assert!(!is_known_type(ty), "{}", ty);
        }
    }

    #[test]
    fn clean_file_is_valid() {
        let f = file(json!([constraint(json!({
            "input_schema": "BillingEntry",
            "output_type": "boolean",
            "field_types": {"amount_micro": "bigint_coercible", "links.budget": "string"},
        }))]));
        let result = type_check(&f, &registry());
        assert!(result.valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn missing_schema_is_one_error() {
        let f = file(json!([]));
        let result = type_check(&f, &SchemaRegistry::new());
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        let err = &result.errors[0];
        assert_eq!(err.constraint_id, "BillingEntry");
        assert_eq!(err.expected, "registered schema");
        assert_eq!(err.actual, "unknown");
    }

    #[test]
    fn signature_mismatches() {
        let f = file(json!([constraint(json!({
            "input_schema": "Other",
            "output_type": "number",
            "field_types": {"ghost.field": "string"},
        }))]));
        let result = type_check(&f, &registry());
        let actual: Vec<&str> = result.errors.iter().map(|e| e.actual.as_str()).collect();
        assert_eq!(actual, vec!["Other", "number", "ghost"]);
        assert_eq!(result.errors[2].fragment.as_deref(), Some("ghost.field"));
        assert!(result.errors.iter().all(|e| e.constraint_id == "c1"));
    }

    #[test]
    fn field_roots_unchecked_without_declared_fields() {
        let registry = SchemaRegistry::new().with_schema(SchemaInfo::new("BillingEntry"));
        let f = file(json!([constraint(json!({"field_types": {"anything": "string"}}))]));
        assert!(type_check(&f, &registry).valid);
    }

    #[test]
    fn soft_problems_are_warnings() {
        let f = file(json!([
            {"id": "bare", "expression": "true", "severity": "warning"},
            constraint(json!({"field_types": {"amount_micro": "integer"}})),
        ]));
        let result = type_check(&f, &registry());
        assert!(result.valid);
        let ids: Vec<&str> = result.warnings.iter().map(|w| w.constraint_id.as_str()).collect();
        assert_eq!(ids, vec!["bare", "c1"]);
    }

    #[test]
    fn reserved_field_names_warn() {
        let registry = SchemaRegistry::new()
            .with_schema(SchemaInfo::new("BillingEntry").with_field("len", "number"));
        let f = file(json!([constraint(json!({"field_types": {"len": "number"}}))]));
        let result = type_check(&f, &registry);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings.iter().all(|w| w.message.contains("'len'")));
    }

    #[test]
    fn unknown_expression_version() {
        let mut f = file(json!([]));
        f.expression_version = "9.9".to_string();
        let result = type_check(&f, &registry());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].actual, "9.9");
    }
}
