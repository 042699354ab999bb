//! Error handling tests for constraint-parser.

mod common;

use common::assert_parse_error;
use constraint_parser::{validate, ParseErrorKind, EXPRESSION_VERSION};

#[test]
fn error_on_unclosed_parenthesis() {
    let err = assert_parse_error("(a == 1");
    assert_eq!(err.kind, ParseErrorKind::Syntax);
}

#[test]
fn error_on_unclosed_bracket() {
    assert_parse_error("bigint_sum([a, b)");
}

#[test]
fn error_on_missing_operator() {
    let err = assert_parse_error("a b");
    assert_eq!(err.position, Some(2));
}

#[test]
fn error_on_trailing_operator() {
    assert_parse_error("a >=");
}

#[test]
fn error_on_empty_input() {
    let err = assert_parse_error("");
    assert_eq!(err.position, Some(0));
}

#[test]
fn error_on_lone_arrow() {
    assert_parse_error("a -> b");
}

#[test]
fn error_on_unexpected_character() {
    let err = assert_parse_error("a @ b");
    assert_eq!(err.kind, ParseErrorKind::Lexical);
    assert_eq!(err.position, Some(2));
}

#[test]
fn unterminated_string_reports_opening_quote() {
    let result = validate("status == 'active && ok", EXPRESSION_VERSION);
    assert!(!result.valid);
    assert_eq!(result.position, Some(10));

    let result = validate("x == \"bad", EXPRESSION_VERSION);
    assert_eq!(result.position, Some(5));
}

#[test]
fn positions_are_character_offsets() {
    let result = validate("'héllo' == 'x", EXPRESSION_VERSION);
    assert!(!result.valid);
    assert_eq!(result.position, Some(11));

    let err = assert_parse_error("name == 'ü' &&");
    assert_eq!(err.position, Some(13));
}

#[test]
fn long_chains_fail_with_depth_error() {
    let conjunction = vec!["ok"; 10_000].join(" && ");
    let result = validate(&conjunction, EXPRESSION_VERSION);
    assert!(!result.valid);
    assert_eq!(assert_parse_error(&conjunction).kind, ParseErrorKind::DepthExceeded);

    let members = format!("a{}", ".b".repeat(50_000));
    assert!(!validate(&members, EXPRESSION_VERSION).valid);
    assert_eq!(assert_parse_error(&members).kind, ParseErrorKind::DepthExceeded);
}

#[test]
fn lambda_under_version_one_reports_arrow() {
    let result = validate("every(items, x -> x.amount_micro > 0)", "1.0");
    assert!(!result.valid);
    assert_eq!(result.position, Some(15));

    assert!(validate("every(items, x -> x.amount_micro > 0)", "2.0").valid);
}

#[test]
fn truncated_expressions_report_positions_inside_source() {
    let full = "bigint_gte(bigint_sum(items, 'cost'), budget) && every(links, l -> l.ok == true)";
    for end in 1..full.len() {
        let truncated = &full[..end];
        let result = validate(truncated, EXPRESSION_VERSION);
        if let Some(pos) = result.position {
            assert!(pos < truncated.len(), "position {} out of range for '{}'", pos, truncated);
        }
    }
}

#[test]
fn malformed_expressions_report_positions_inside_source() {
    let cases = ["(((", "a ==", "f(a,", "[1, 2", "a.", "x.every(", "!", "a =>", "'open", "a && && b"];
    for case in cases {
        let result = validate(case, EXPRESSION_VERSION);
        assert!(!result.valid, "'{}' should be invalid", case);
        let pos = result.position.expect("syntax errors carry a position");
        assert!(pos < case.len(), "position {} out of range for '{}'", pos, case);
    }
}
