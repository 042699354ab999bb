//! Constraint expression abstract syntax tree.

/// Source span for error reporting.
/// Uses character offsets into the source string.
pub type Span = std::ops::Range<usize>;

/// AST node with source location and unique ID.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    /// Unique identifier for this node (1-indexed, assigned during parsing)
    pub id: i64,
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(id: i64, node: T, span: Span) -> Self {
        Self { id, node, span }
    }
}

/// A spanned expression.
pub type SpannedExpr = Spanned<Expr>;

/// Constraint expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    Null,
    Bool(bool),
    /// Numeric literal kept as written (`42`, `0.001`, `100000000000000000000`).
    Number(String),
    String(String),

    /// Identifier, resolved against bound lambda parameters and then the context.
    Ident(String),

    /// List literal: `[a, b, c]`
    List(Vec<SpannedExpr>),

    Unary {
        op: UnaryOp,
        expr: Box<SpannedExpr>,
    },

    Binary {
        op: BinaryOp,
        left: Box<SpannedExpr>,
        right: Box<SpannedExpr>,
    },

    /// Field access: `expr.field`
    Member {
        expr: Box<SpannedExpr>,
        field: String,
    },

    /// Index access: `expr[index]`
    Index {
        expr: Box<SpannedExpr>,
        index: Box<SpannedExpr>,
    },

    /// Builtin call: `name(args)`
    Call {
        name: String,
        args: Vec<SpannedExpr>,
    },

    /// Lambda argument: `param -> body`. Only produced as a call argument.
    Lambda {
        param: String,
        body: Box<SpannedExpr>,
    },
}

impl Expr {
    /// Render a path expression (`a.b[0].c`) back to dotted text.
    ///
    /// Returns `None` for anything that is not an identifier followed by
    /// member or literal index accesses.
    pub fn as_path(&self) -> Option<String> {
        match self {
            Expr::Ident(name) => Some(name.clone()),
            Expr::Member { expr, field } => Some(format!("{}.{}", expr.node.as_path()?, field)),
            Expr::Index { expr, index } => {
                let key = match &index.node {
                    Expr::Number(n) => n.clone(),
                    Expr::String(s) => s.clone(),
                    _ => return None,
                };
                Some(format!("{}.{}", expr.node.as_path()?, key))
            }
            _ => None,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-`)
    Neg,
    /// Logical negation (`!`)
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,
    /// `a => b`, equivalent to `!a || b`
    Implies,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Implies => "=>",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(expr: Expr) -> Box<SpannedExpr> {
        Box::new(Spanned::new(0, expr, 0..0))
    }

    #[test]
    fn path_rendering() {
        let path = Expr::Index {
            expr: node(Expr::Member {
                expr: node(Expr::Ident("links".into())),
                field: "items".into(),
            }),
            index: node(Expr::Number("0".into())),
        };
        assert_eq!(path.as_path().as_deref(), Some("links.items.0"));
    }

    #[test]
    fn non_paths_have_no_rendering() {
        let call = Expr::Call {
            name: "len".into(),
            args: vec![],
        };
        assert_eq!(call.as_path(), None);
    }
}
