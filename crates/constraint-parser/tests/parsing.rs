//! Integration tests for the public parse() API.

mod common;

use common::assert_parses;
use constraint_parser::{parse, tokenize, validate, BinaryOp, Expr, ExpressionVersion, TokenKind};

#[test]
fn parse_is_deterministic() {
    let source = "every(links, l -> bigint_gte(l.budget, 0)) && (a.b[0] != 'x' => has(c))";
    let first = assert_parses(source);
    for _ in 0..10 {
        assert_eq!(assert_parses(source), first);
    }
}

#[test]
fn parse_nested_calls() {
    match assert_parses("bigint_eq(bigint_sub(total, part), 700)").node {
        Expr::Call { name, args } => {
            assert_eq!(name, "bigint_eq");
            assert!(matches!(args[0].node, Expr::Call { ref name, .. } if name == "bigint_sub"));
            assert_eq!(args[1].node, Expr::Number("700".into()));
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn parse_zero_arg_call() {
    assert!(matches!(
        assert_parses("now()").node,
        Expr::Call { ref name, ref args } if name == "now" && args.is_empty()
    ));
}

#[test]
fn parse_null_checks() {
    assert!(matches!(
        assert_parses("a.b == null").node,
        Expr::Binary { op: BinaryOp::Eq, .. }
    ));
}

#[test]
fn parse_arithmetic_comparison() {
    match assert_parses("a * 2 + b % 3 <= c - d / 4").node {
        Expr::Binary { op: BinaryOp::Le, left, right } => {
            assert!(matches!(left.node, Expr::Binary { op: BinaryOp::Add, .. }));
            assert!(matches!(right.node, Expr::Binary { op: BinaryOp::Sub, .. }));
        }
        other => panic!("expected <=, got {:?}", other),
    }
}

#[test]
fn parse_nested_lambdas() {
    let ast = assert_parses("every(orders, o -> some(o.lines, l -> l.qty > 0))");
    match ast.node {
        Expr::Call { args, .. } => match &args[1].node {
            Expr::Lambda { body, .. } => {
                assert!(matches!(body.node, Expr::Call { ref name, .. } if name == "some"));
            }
            other => panic!("expected lambda, got {:?}", other),
        },
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn version_one_accepts_everything_but_lambdas() {
    let v1 = [
        "a.b.c == 'x'",
        "bigint_sum(items, 'cost') >= 100",
        "items.every(i => i.ok) && !done",
        "a => b",
    ];
    for source in v1 {
        assert!(parse(source, ExpressionVersion::V1_0).is_ok(), "{}", source);
        assert!(parse(source, ExpressionVersion::V2_0).is_ok(), "{}", source);
    }
}

#[test]
fn tokens_match_validator_acceptance() {
    let source = "len(nonce) >= 16";
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[0].value, "len");
    assert!(validate(source, "2.0").valid);
}
