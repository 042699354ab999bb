//! Constraint expression parser.
//!
//! Constraint expressions are small boolean rules such as
//! `bigint_gte(budget_micro, cost_micro) && every(links, l -> l.active)`.
//! This crate turns them into an AST:
//!
//! - [`tokenize`] / [`lex`]: the logos-based lexer
//! - [`parse`]: the recursive-descent parser shared by validation and evaluation
//! - [`validate`]: syntax-only checking with a structured position
//!
//! ```
//! use constraint_parser::{parse, validate, ExpressionVersion, Expr};
//!
//! let ast = parse("len(nonce) >= 16", ExpressionVersion::default()).unwrap();
//! assert!(matches!(ast.node, Expr::Binary { .. }));
//!
//! let result = validate("x == 'bad", "2.0");
//! assert_eq!(result.position, Some(5));
//! ```

pub mod ast;
mod error;
mod grammar;
mod lexer;
mod parser;
mod version;

pub use ast::{BinaryOp, Expr, Span, Spanned, SpannedExpr, UnaryOp};
pub use error::{ParseError, ParseErrorKind};
pub use grammar::{check_syntax, validate, ValidationResult};
pub use lexer::{lex, tokenize, LexicalError, PositionedToken, SpannedToken, Token, TokenKind};
pub use version::{ExpressionVersion, EXPRESSION_VERSION, SUPPORTED_VERSIONS};

/// Maximum nesting of sub-expressions, shared by the parser and the evaluator.
pub const MAX_EXPRESSION_DEPTH: usize = 32;

/// Parse an expression under the given grammar version.
///
/// Stops at the first lexical or syntax error.
pub fn parse(input: &str, version: ExpressionVersion) -> Result<SpannedExpr, ParseError> {
    let tokens = lexer::lex(input)?;
    parser::parse_tokens(input, &tokens, version)
}
