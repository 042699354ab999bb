//! Constraint parser - hand-written recursive descent.
//!
//! This is the only parser in the workspace. The grammar validator runs it and
//! discards the tree; the evaluator runs it and walks the tree. Sharing one
//! routine keeps the two from ever disagreeing about what is well-formed.

use crate::ast::{BinaryOp, Expr, Spanned, SpannedExpr, UnaryOp};
use crate::error::ParseError;
use crate::lexer::{Span, SpannedToken, Token};
use crate::version::ExpressionVersion;
use crate::MAX_EXPRESSION_DEPTH;

/// Methods that may be written in `.name(param => body)` form.
const METHOD_QUANTIFIERS: &[&str] = &["every", "some"];

/// Recursive descent parser for constraint expressions.
pub struct Parser<'a> {
    source: &'a str,
    tokens: &'a [SpannedToken],
    pos: usize,
    version: ExpressionVersion,
    /// Height of the tree under construction: `expr`/`unary` nesting plus
    /// every binary fold and postfix step on the current path.
    depth: usize,
    /// Counter for generating unique node IDs (starts at 1)
    next_id: i64,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: &'a [SpannedToken], version: ExpressionVersion) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            version,
            depth: 0,
            next_id: 1,
        }
    }

    /// Allocate the next unique node ID.
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // === Utility Methods ===

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|(t, _)| t)
    }

    /// Position of the current token, or of the last character at end of input.
    fn peek_pos(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| s.start)
            .unwrap_or_else(|| self.eof_pos())
    }

    /// Offset of the last character, so end-of-input errors stay inside the source.
    fn eof_pos(&self) -> usize {
        self.source.chars().count().saturating_sub(1)
    }

    fn advance(&mut self) -> Option<&SpannedToken> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, token: &Token) -> bool {
        self.peek().map_or(false, |t| t == token)
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token, returning its span.
    fn expect(&mut self, token: &Token) -> Result<Span, ParseError> {
        match self.tokens.get(self.pos) {
            Some((t, span)) if t == token => {
                let span = span.clone();
                self.pos += 1;
                Ok(span)
            }
            _ => Err(self.unexpected(&format!("Expected '{}'", token))),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<(String, Span), ParseError> {
        match self.tokens.get(self.pos) {
            Some((Token::Ident(name), span)) => {
                let found = (name.clone(), span.clone());
                self.pos += 1;
                Ok(found)
            }
            _ => Err(self.unexpected(&format!("Expected {}", what))),
        }
    }

    /// Error describing the current token (or end of input).
    fn unexpected(&self, context: &str) -> ParseError {
        let found = match self.peek() {
            Some(tok) => format!("{} '{}'", describe(tok), tok),
            None => "end of expression".to_string(),
        };
        ParseError::syntax(format!("{}, found {}", context, found), self.peek_pos())
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Run `f` one nesting level deeper, failing fast past the depth ceiling.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(ParseError::depth_exceeded(self.peek_pos()));
        }
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Count one more level of height for a fold or postfix step.
    ///
    /// Flat chains (`a && b && ...`, `a.b.c...`) build left-nested trees, so
    /// each link counts toward the ceiling like a parenthesis would.
    fn deepen(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            return Err(ParseError::depth_exceeded(self.peek_pos()));
        }
        self.depth += 1;
        Ok(())
    }

    fn binary(&mut self, op: BinaryOp, left: SpannedExpr, right: SpannedExpr) -> SpannedExpr {
        let span = left.span.start..right.span.end;
        Spanned::new(
            self.next_id(),
            Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    // === Expression Parsing ===

    /// Parse an expression (entry point).
    pub fn parse_expr(&mut self) -> Result<SpannedExpr, ParseError> {
        self.nested(|p| p.parse_implication())
    }

    /// Parse implication: or => or
    fn parse_implication(&mut self) -> Result<SpannedExpr, ParseError> {
        let left = self.parse_or()?;

        if self.match_token(&Token::FatArrow) {
            self.deepen()?;
            let right = self.parse_or()?;
            self.depth -= 1;
            Ok(self.binary(BinaryOp::Implies, left, right))
        } else {
            Ok(left)
        }
    }

    /// Parse logical OR: expr || expr
    fn parse_or(&mut self) -> Result<SpannedExpr, ParseError> {
        let base = self.depth;
        let mut left = self.parse_and()?;

        while self.match_token(&Token::Or) {
            self.deepen()?;
            let right = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, right);
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse logical AND: expr && expr
    fn parse_and(&mut self) -> Result<SpannedExpr, ParseError> {
        let base = self.depth;
        let mut left = self.parse_comparison()?;

        while self.match_token(&Token::And) {
            self.deepen()?;
            let right = self.parse_comparison()?;
            left = self.binary(BinaryOp::And, left, right);
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse a single comparison: == != < <= > >=
    ///
    /// Comparisons do not chain; `a < b < c` leaves `< c` as trailing tokens.
    fn parse_comparison(&mut self) -> Result<SpannedExpr, ParseError> {
        let left = self.parse_addition()?;

        match self.peek_relop() {
            Some(op) => {
                self.advance();
                self.deepen()?;
                let right = self.parse_addition()?;
                self.depth -= 1;
                Ok(self.binary(op, left, right))
            }
            None => Ok(left),
        }
    }

    fn peek_relop(&self) -> Option<BinaryOp> {
        match self.peek()? {
            Token::EqEq => Some(BinaryOp::Eq),
            Token::Ne => Some(BinaryOp::Ne),
            Token::Lt => Some(BinaryOp::Lt),
            Token::Le => Some(BinaryOp::Le),
            Token::Gt => Some(BinaryOp::Gt),
            Token::Ge => Some(BinaryOp::Ge),
            _ => None,
        }
    }

    /// Parse additive operators: + -
    fn parse_addition(&mut self) -> Result<SpannedExpr, ParseError> {
        let base = self.depth;
        let mut left = self.parse_mult()?;

        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.deepen()?;
            let right = self.parse_mult()?;
            left = self.binary(op, left, right);
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse multiplicative operators: * / %
    fn parse_mult(&mut self) -> Result<SpannedExpr, ParseError> {
        let base = self.depth;
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            self.deepen()?;
            let right = self.parse_unary()?;
            left = self.binary(op, left, right);
        }

        self.depth = base;
        Ok(left)
    }

    /// Parse unary operators: ! -
    fn parse_unary(&mut self) -> Result<SpannedExpr, ParseError> {
        let op = match self.peek() {
            Some(Token::Not) => UnaryOp::Not,
            Some(Token::Minus) => UnaryOp::Neg,
            _ => return self.parse_postfix(),
        };
        let start = self.peek_pos();
        self.advance();

        let expr = self.nested(|p| p.parse_unary())?;
        let span = start..expr.span.end;
        Ok(Spanned::new(
            self.next_id(),
            Expr::Unary {
                op,
                expr: Box::new(expr),
            },
            span,
        ))
    }

    /// Parse postfix operators: .field [index] .every(x => ...)
    fn parse_postfix(&mut self) -> Result<SpannedExpr, ParseError> {
        let base = self.depth;
        let mut expr = self.parse_atom()?;

        loop {
            if self.check(&Token::LBracket) {
                self.deepen()?;
                expr = self.parse_index(expr)?;
            } else if self.check(&Token::Dot) {
                self.deepen()?;
                expr = self.parse_member(expr)?;
            } else {
                break;
            }
        }

        self.depth = base;
        Ok(expr)
    }

    fn parse_index(&mut self, base: SpannedExpr) -> Result<SpannedExpr, ParseError> {
        let start = base.span.start;
        self.expect(&Token::LBracket)?;
        let index = self.parse_expr()?;
        let end_span = self.expect(&Token::RBracket)?;

        Ok(Spanned::new(
            self.next_id(),
            Expr::Index {
                expr: Box::new(base),
                index: Box::new(index),
            },
            start..end_span.end,
        ))
    }

    /// Parse member access: expr.field, or the quantifier method form.
    fn parse_member(&mut self, base: SpannedExpr) -> Result<SpannedExpr, ParseError> {
        let start = base.span.start;
        self.expect(&Token::Dot)?;
        let (field, field_span) = self.expect_ident("identifier after '.'")?;

        if self.check(&Token::LParen) {
            if METHOD_QUANTIFIERS.contains(&field.as_str()) {
                return self.parse_method_quantifier(base, field);
            }
            return Err(ParseError::syntax(
                format!("Unknown method '.{}()'; only .every() and .some() take arguments", field),
                field_span.start,
            ));
        }

        Ok(Spanned::new(
            self.next_id(),
            Expr::Member {
                expr: Box::new(base),
                field,
            },
            start..field_span.end,
        ))
    }

    /// Expand `xs.every(x => body)` into `every(xs, x -> body)`.
    fn parse_method_quantifier(
        &mut self,
        receiver: SpannedExpr,
        name: String,
    ) -> Result<SpannedExpr, ParseError> {
        let start = receiver.span.start;
        self.expect(&Token::LParen)?;
        let (param, param_span) = self.expect_ident(&format!("parameter name in .{}()", name))?;

        match self.peek() {
            Some(Token::FatArrow) => {
                self.advance();
            }
            Some(Token::Arrow) => {
                self.check_lambda_allowed()?;
                self.advance();
            }
            _ => return Err(self.unexpected(&format!("Expected '=>' in .{}() lambda", name))),
        }

        let body = self.parse_expr()?;
        let end_span = self.expect(&Token::RParen)?;

        let lambda_span = param_span.start..body.span.end;
        let lambda = Spanned::new(
            self.next_id(),
            Expr::Lambda {
                param,
                body: Box::new(body),
            },
            lambda_span,
        );

        Ok(Spanned::new(
            self.next_id(),
            Expr::Call {
                name,
                args: vec![receiver, lambda],
            },
            start..end_span.end,
        ))
    }

    fn check_lambda_allowed(&self) -> Result<(), ParseError> {
        if self.version.supports_lambdas() {
            Ok(())
        } else {
            Err(ParseError::syntax(
                format!(
                    "Lambda syntax '->' requires expression version 2.0 (parsing as {})",
                    self.version
                ),
                self.peek_pos(),
            ))
        }
    }

    /// Parse primary expressions: literals, identifiers, calls, parens, lists.
    fn parse_atom(&mut self) -> Result<SpannedExpr, ParseError> {
        let Some((token, span)) = self.tokens.get(self.pos).cloned() else {
            return Err(ParseError::syntax("Unexpected end of expression", self.eof_pos()));
        };

        let node = match token {
            Token::Number(n) => Expr::Number(n),
            Token::String(s) => Expr::String(s),
            Token::Ident(name) => match name.as_str() {
                "true" => Expr::Bool(true),
                "false" => Expr::Bool(false),
                "null" => Expr::Null,
                _ if self.peek_at(1) == Some(&Token::LParen) => {
                    self.advance();
                    return self.parse_call(name, span.start);
                }
                _ => Expr::Ident(name),
            },
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                return Ok(inner);
            }
            Token::LBracket => return self.parse_list(),
            _ => return Err(self.unexpected("Expected expression")),
        };

        self.advance();
        Ok(Spanned::new(self.next_id(), node, span))
    }

    /// Parse call arguments after the function name: (arg, arg, ...)
    fn parse_call(&mut self, name: String, start: usize) -> Result<SpannedExpr, ParseError> {
        self.expect(&Token::LParen)?;

        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            args.push(self.parse_arg()?);
            while self.match_token(&Token::Comma) {
                args.push(self.parse_arg()?);
            }
        }

        let end_span = self.expect(&Token::RParen)?;

        Ok(Spanned::new(
            self.next_id(),
            Expr::Call { name, args },
            start..end_span.end,
        ))
    }

    /// Parse a call argument, which may be a `param -> body` lambda.
    fn parse_arg(&mut self) -> Result<SpannedExpr, ParseError> {
        let is_lambda = matches!(self.peek(), Some(Token::Ident(_)))
            && self.peek_at(1) == Some(&Token::Arrow);
        if !is_lambda {
            return self.parse_expr();
        }

        let (param, param_span) = self.expect_ident("lambda parameter")?;
        self.check_lambda_allowed()?;
        self.expect(&Token::Arrow)?;
        let body = self.parse_expr()?;
        let span = param_span.start..body.span.end;

        Ok(Spanned::new(
            self.next_id(),
            Expr::Lambda {
                param,
                body: Box::new(body),
            },
            span,
        ))
    }

    /// Parse a list literal: [expr, expr, ...]
    fn parse_list(&mut self) -> Result<SpannedExpr, ParseError> {
        let start = self.peek_pos();
        self.expect(&Token::LBracket)?;

        let mut items = Vec::new();
        if !self.check(&Token::RBracket) {
            items.push(self.parse_expr()?);
            while self.match_token(&Token::Comma) {
                if self.check(&Token::RBracket) {
                    break; // trailing comma
                }
                items.push(self.parse_expr()?);
            }
        }

        let end_span = self.expect(&Token::RBracket)?;

        Ok(Spanned::new(self.next_id(), Expr::List(items), start..end_span.end))
    }
}

fn describe(token: &Token) -> &'static str {
    match token {
        Token::Number(_) => "number",
        Token::String(_) => "string",
        Token::Ident(_) => "identifier",
        Token::Arrow | Token::FatArrow => "arrow",
        Token::LParen | Token::RParen => "paren",
        Token::LBracket | Token::RBracket => "bracket",
        Token::Comma => "comma",
        Token::Dot => "dot",
        _ => "operator",
    }
}

/// Parse a token stream into an AST, stopping at the first error.
pub fn parse_tokens(
    source: &str,
    tokens: &[SpannedToken],
    version: ExpressionVersion,
) -> Result<SpannedExpr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::syntax("Empty expression", 0));
    }

    let mut parser = Parser::new(source, tokens, version);
    let ast = parser.parse_expr()?;
    if !parser.at_end() {
        return Err(parser.unexpected("Unexpected tokens after expression"));
    }
    Ok(ast)
}
