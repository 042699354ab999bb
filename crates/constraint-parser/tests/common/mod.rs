//! Common test utilities for constraint-parser integration tests.

use constraint_parser::{parse, ExpressionVersion, ParseError, SpannedExpr};

/// Parse input under the current version and assert it succeeds.
#[allow(dead_code)]
pub fn assert_parses(input: &str) -> SpannedExpr {
    match parse(input, ExpressionVersion::default()) {
        Ok(ast) => ast,
        Err(err) => panic!("failed to parse '{}': {}", input, err),
    }
}

/// Parse input under the current version and assert it fails.
#[allow(dead_code)]
pub fn assert_parse_error(input: &str) -> ParseError {
    match parse(input, ExpressionVersion::default()) {
        Ok(ast) => panic!("expected parse error for '{}', but got: {:?}", input, ast),
        Err(err) => err,
    }
}
