//! Constraint expression lexer using logos.

use logos::Logos;
use serde::Serialize;

/// A span in the source input, in character (not byte) offsets.
pub type Span = std::ops::Range<usize>;

/// A token with its source span.
pub type SpannedToken = (Token, Span);

/// Why a lexer callback rejected its input.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LexErrorKind {
    #[default]
    UnexpectedCharacter,
    UnterminatedString,
    /// Offset of the backslash, relative to the opening quote.
    InvalidEscape(usize),
}

/// Lexer error with the offset of the offending character.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at position {position}")]
pub struct LexicalError {
    pub message: String,
    pub position: usize,
}

/// Constraint expression tokens.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // Kept as source text; the evaluator decides between float and exact integer.
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().to_string(), priority = 3)]
    #[regex(r"[0-9]+", |lex| lex.slice().to_string(), priority = 2)]
    Number(String),

    #[token("\"", lex_double_string)]
    #[token("'", lex_single_string)]
    String(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // === Arrows ===
    /// `->` introduces a lambda parameter.
    #[token("->")]
    Arrow,
    /// `=>` is implication, and the legacy `.every(x => ...)` parameter arrow.
    #[token("=>")]
    FatArrow,

    // === Operators (multi-char first) ===
    #[token("==")]
    EqEq,
    #[token("!=")]
    Ne,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("&&")]
    And,
    #[token("||")]
    Or,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("!")]
    Not,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
}

/// Coarse token category, as exposed by [`tokenize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Number,
    String,
    Ident,
    Op,
    Paren,
    Comma,
    Bracket,
    Dot,
    Arrow,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Number(_) => TokenKind::Number,
            Token::String(_) => TokenKind::String,
            Token::Ident(_) => TokenKind::Ident,
            Token::Arrow | Token::FatArrow => TokenKind::Arrow,
            Token::LParen | Token::RParen => TokenKind::Paren,
            Token::LBracket | Token::RBracket => TokenKind::Bracket,
            Token::Dot => TokenKind::Dot,
            Token::Comma => TokenKind::Comma,
            Token::EqEq
            | Token::Ne
            | Token::Le
            | Token::Ge
            | Token::And
            | Token::Or
            | Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::Percent
            | Token::Lt
            | Token::Gt
            | Token::Not => TokenKind::Op,
        }
    }

    /// The token's value: decoded contents for strings, source text otherwise.
    pub fn text(&self) -> String {
        match self {
            Token::Number(s) | Token::String(s) | Token::Ident(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "'{}'", s),
            Token::Ident(s) => write!(f, "{}", s),
            Token::Arrow => write!(f, "->"),
            Token::FatArrow => write!(f, "=>"),
            Token::EqEq => write!(f, "=="),
            Token::Ne => write!(f, "!="),
            Token::Le => write!(f, "<="),
            Token::Ge => write!(f, ">="),
            Token::And => write!(f, "&&"),
            Token::Or => write!(f, "||"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::Not => write!(f, "!"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Dot => write!(f, "."),
            Token::Comma => write!(f, ","),
        }
    }
}

/// A flat token: category, value and the offset of its first character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionedToken {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: String,
    pub pos: usize,
}

// === String callbacks ===

fn lex_double_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexErrorKind> {
    lex_quoted_string(lex, '"')
}

fn lex_single_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexErrorKind> {
    lex_quoted_string(lex, '\'')
}

fn lex_quoted_string(lex: &mut logos::Lexer<Token>, quote: char) -> Result<String, LexErrorKind> {
    let remainder = lex.remainder();
    let mut chars = remainder.char_indices();
    let mut result = String::new();

    while let Some((offset, c)) = chars.next() {
        if c == quote {
            lex.bump(offset + c.len_utf8());
            return Ok(result);
        }
        if c != '\\' {
            result.push(c);
            continue;
        }
        // +1 accounts for the opening quote.
        let invalid = LexErrorKind::InvalidEscape(offset + 1);
        let (_, escape_char) = chars.next().ok_or(LexErrorKind::UnterminatedString)?;
        match escape_char {
            '\\' => result.push('\\'),
            '"' => result.push('"'),
            '\'' => result.push('\''),
            'n' => result.push('\n'),
            'r' => result.push('\r'),
            't' => result.push('\t'),
            '0' => result.push('\0'),
            'u' => {
                let mut hex = String::with_capacity(4);
                for _ in 0..4 {
                    let (_, h) = chars.next().ok_or(LexErrorKind::UnterminatedString)?;
                    hex.push(h);
                }
                let code = u32::from_str_radix(&hex, 16).map_err(|_| invalid.clone())?;
                result.push(char::from_u32(code).ok_or(invalid)?);
            }
            _ => return Err(invalid),
        }
    }

    Err(LexErrorKind::UnterminatedString)
}

/// Maps the lexer's increasing byte offsets to character offsets.
struct CharOffsets<'a> {
    input: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharOffsets<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, byte: 0, chars: 0 }
    }

    /// Character offset of `byte`. Calls must not go backwards.
    fn at(&mut self, byte: usize) -> usize {
        self.chars += self.input[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

/// Lex the entire input into spanned tokens.
///
/// Spans count characters, so positions match what an author sees in the
/// expression even when it holds non-ASCII text.
pub fn lex(input: &str) -> Result<Vec<SpannedToken>, LexicalError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(input);
    let mut offsets = CharOffsets::new(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => {
                let start = offsets.at(span.start);
                let end = offsets.at(span.end);
                tokens.push((token, start..end));
            }
            Err(kind) => return Err(lex_error(input, span, kind)),
        }
    }

    Ok(tokens)
}

fn lex_error(input: &str, span: Span, kind: LexErrorKind) -> LexicalError {
    let char_offset = |byte: usize| input[..byte].chars().count();
    match kind {
        LexErrorKind::UnexpectedCharacter => {
            let found = input[span.start..].chars().next().unwrap_or_default();
            LexicalError {
                message: format!("Unexpected character: {}", found),
                position: char_offset(span.start),
            }
        }
        LexErrorKind::UnterminatedString => LexicalError {
            message: "Unterminated string literal".to_string(),
            position: char_offset(span.start),
        },
        LexErrorKind::InvalidEscape(offset) => LexicalError {
            message: "Invalid escape sequence in string literal".to_string(),
            position: char_offset(span.start + offset),
        },
    }
}

/// Tokenize an expression into the flat `{type, value, pos}` stream.
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken>, LexicalError> {
    Ok(lex(input)?
        .into_iter()
        .map(|(token, span)| PositionedToken {
            kind: token.kind(),
            value: token.text(),
            pos: span.start,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_tokens(input: &str) -> Vec<Token> {
        lex(input)
            .unwrap()
            .into_iter()
            .map(|(tok, _)| tok)
            .collect()
    }

    #[test]
    fn numbers_keep_source_text() {
        assert_eq!(
            lex_tokens("42 3.25 9007199254740993"),
            vec![
                Token::Number("42".into()),
                Token::Number("3.25".into()),
                Token::Number("9007199254740993".into()),
            ]
        );
    }

    #[test]
    fn both_quote_styles() {
        assert_eq!(
            lex_tokens(r#"'active' "pending""#),
            vec![Token::String("active".into()), Token::String("pending".into())]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            lex_tokens(r#"'it\'s' "a\"b" 'x\ny' '\u0041'"#),
            vec![
                Token::String("it's".into()),
                Token::String("a\"b".into()),
                Token::String("x\ny".into()),
                Token::String("A".into()),
            ]
        );
    }

    #[test]
    fn arrows_are_distinct_from_operators() {
        assert_eq!(
            lex_tokens("a => b -> c >= d - e"),
            vec![
                Token::Ident("a".into()),
                Token::FatArrow,
                Token::Ident("b".into()),
                Token::Arrow,
                Token::Ident("c".into()),
                Token::Ge,
                Token::Ident("d".into()),
                Token::Minus,
                Token::Ident("e".into()),
            ]
        );
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            lex_tokens("f(a.b, c[0])"),
            vec![
                Token::Ident("f".into()),
                Token::LParen,
                Token::Ident("a".into()),
                Token::Dot,
                Token::Ident("b".into()),
                Token::Comma,
                Token::Ident("c".into()),
                Token::LBracket,
                Token::Number("0".into()),
                Token::RBracket,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn positions_point_at_first_character() {
        let tokens = tokenize("  len(nonce) >= 16").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.pos).collect();
        assert_eq!(positions, vec![2, 5, 6, 11, 13, 16]);
        assert_eq!(tokens[4].kind, TokenKind::Op);
        assert_eq!(tokens[4].value, ">=");
    }

    #[test]
    fn flat_token_kinds() {
        let kinds: Vec<TokenKind> = tokenize("x -> [1, 'a'].b")
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Arrow,
                TokenKind::Bracket,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::String,
                TokenKind::Bracket,
                TokenKind::Dot,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn unterminated_string_reports_opening_quote() {
        let err = lex("x == 'bad").unwrap_err();
        assert_eq!(err.position, 5);
        assert!(err.message.contains("Unterminated"));
    }

    #[test]
    fn unexpected_character() {
        let err = lex("a @ b").unwrap_err();
        assert_eq!(err.position, 2);
        assert_eq!(err.message, "Unexpected character: @");
    }

    #[test]
    fn single_equals_is_rejected() {
        let err = lex("a = b").unwrap_err();
        assert_eq!(err.position, 2);
    }

    #[test]
    fn positions_count_characters_not_bytes() {
        let err = tokenize("'é' @").unwrap_err();
        assert_eq!(err.position, 4);

        let tokens = tokenize("'héllo' == 'x'").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.pos).collect();
        assert_eq!(positions, vec![0, 8, 11]);

        let err = lex("'日本' == 'x").unwrap_err();
        assert_eq!(err.position, 8);
        let err = lex(r"'ü\q'").unwrap_err();
        assert_eq!(err.position, 2);
    }

    #[test]
    fn invalid_escape_points_at_backslash() {
        let err = lex(r"x == 'a\qb'").unwrap_err();
        assert_eq!(err.position, 7);
    }
}
