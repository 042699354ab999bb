//! Type checking of whole constraint files.

use constraint_core::checker::{type_check, ConstraintFile, SchemaInfo, SchemaRegistry};
use constraint_core::{find_reserved_collisions, RESERVED_EVALUATOR_NAMES};

#[test]
fn missing_schema_yields_exactly_one_error() {
    let file = ConstraintFile::from_json(
        r#"{
            "schema_id": "NonExistent",
            "contract_version": "1.0.0",
            "expression_version": "2.0",
            "constraints": [
                {"id": "a", "expression": "true", "severity": "error",
                 "type_signature": {"input_schema": "NonExistent", "output_type": "boolean",
                                    "field_types": {"whatever": "string"}}}
            ]
        }"#,
    )
    .unwrap();
    let result = type_check(&file, &SchemaRegistry::new());
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("NonExistent"));
}

#[test]
fn saga_file_checks_clean() {
    let file = ConstraintFile::from_json(
        r#"{
            "schema_id": "SagaContext",
            "contract_version": "3.1.0",
            "constraints": [
                {"id": "conserved", "expression": "saga_amount_conserved(saga)", "severity": "error",
                 "type_signature": {"input_schema": "SagaContext", "output_type": "boolean",
                                    "field_types": {"saga": "Saga", "saga.steps": "SagaStep[]"}}},
                {"id": "ordered", "expression": "saga_steps_sequential(saga)", "severity": "warning",
                 "type_signature": {"output_type": "boolean",
                                    "field_types": {"saga.steps": "Record<string, unknown>[]"}}}
            ]
        }"#,
    )
    .unwrap();
    let registry = SchemaRegistry::new().with_schema(SchemaInfo::new("SagaContext").with_field("saga", "Saga"));
    let result = type_check(&file, &registry);
    assert!(result.valid, "{:?}", result.errors);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
}

#[test]
fn collisions_are_reported_once_per_reserved_field() {
    let reserved: Vec<&str> = RESERVED_EVALUATOR_NAMES.iter().map(String::as_str).take(3).collect();
    let mut fields = vec!["amount_micro", "status", "owner", "created_at"];
    fields.extend(reserved.iter().copied());

    let collisions = find_reserved_collisions(&fields, "Wide");
    assert_eq!(collisions.len(), reserved.len());
    let names: Vec<&str> = collisions.iter().map(|c| c.field.as_str()).collect();
    assert_eq!(names, reserved);
    assert!(collisions.iter().all(|c| c.source == "Wide"));
}

#[test]
fn every_reserved_name_collides() {
    let names: Vec<&String> = RESERVED_EVALUATOR_NAMES.iter().collect();
    assert_eq!(find_reserved_collisions(&names, "All").len(), names.len());
    assert!(find_reserved_collisions(["budget", "Len", "lengthy"], "None").is_empty());
}
