//! emberc-ast — typed AST node families produced by `emberc-parse` (spec §3).
//!
//! Two families share the [`Node`] capability (a source [`Span`] and a
//! canonical textual rendering via `Display`): [`Statement`] and [`Expr`].
//! The textual rendering is not cosmetic — spec §8 requires that re-parsing
//! a printed AST yields an AST with the same printed form, which is what
//! the operator-precedence tests in spec §8 exercise (fully-parenthesized
//! infix/prefix rendering makes precedence and associativity visible).

use emberc_util::{Span, Symbol};
use std::fmt;

/// Shared capability of every AST node: where it came from in source.
pub trait Node {
    fn span(&self) -> Span;
}

/// A parsed source file: a sequence of top-level statements.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

/// `name` bound in a `let` statement — always an identifier, never a
/// general pattern (spec §3 invariant: "a `Let` owns a unique Identifier
/// name").
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: Symbol,
    pub span: Span,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A brace-delimited sequence of statements — the body of a function
/// literal or a branch of an `if` expression.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

impl Node for Block {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Block(Block),
}

impl Node for Statement {
    fn span(&self) -> Span {
        match self {
            Statement::Let(s) => s.span,
            Statement::Return(s) => s.span,
            Statement::Expression(s) => s.span,
            Statement::Block(b) => b.span,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => write!(f, "let {} = {};", s.name, s.value),
            Statement::Return(s) => write!(f, "return {};", s.value),
            Statement::Expression(s) => write!(f, "{}", s.expr),
            Statement::Block(b) => write!(f, "{b}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LetStatement {
    pub name: Identifier,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expr: Expr,
    pub span: Span,
}

/// An expression node. Every variant's `Display` impl fully parenthesizes
/// binary/unary operators so precedence is legible in the printed form —
/// this is the canonical printer spec §8's round-trip property is stated
/// against.
#[derive(Debug, Clone)]
pub enum Expr {
    Identifier(Identifier),
    IntegerLiteral(IntegerLiteral),
    StringLiteral(StringLiteral),
    BooleanLiteral(BooleanLiteral),
    ArrayLiteral(ArrayLiteral),
    HashLiteral(HashLiteral),
    Prefix(PrefixExpr),
    Infix(InfixExpr),
    If(IfExpr),
    FunctionLiteral(FunctionLiteral),
    Call(CallExpr),
    Index(IndexExpr),
}

impl Node for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Identifier(e) => e.span,
            Expr::IntegerLiteral(e) => e.span,
            Expr::StringLiteral(e) => e.span,
            Expr::BooleanLiteral(e) => e.span,
            Expr::ArrayLiteral(e) => e.span,
            Expr::HashLiteral(e) => e.span,
            Expr::Prefix(e) => e.span,
            Expr::Infix(e) => e.span,
            Expr::If(e) => e.span,
            Expr::FunctionLiteral(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Index(e) => e.span,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(e) => write!(f, "{e}"),
            Expr::IntegerLiteral(e) => write!(f, "{}", e.value),
            Expr::StringLiteral(e) => write!(f, "{}", e.value),
            Expr::BooleanLiteral(e) => write!(f, "{}", e.value),
            Expr::ArrayLiteral(e) => {
                write!(f, "[")?;
                for (i, elem) in e.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, "]")
            }
            Expr::HashLiteral(e) => {
                write!(f, "{{")?;
                for (i, (k, v)) in e.pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                write!(f, "}}")
            }
            Expr::Prefix(e) => write!(f, "({}{})", e.operator, e.right),
            Expr::Infix(e) => write!(f, "({} {} {})", e.left, e.operator, e.right),
            Expr::If(e) => {
                write!(f, "if{} {}", e.condition, e.consequence)?;
                if let Some(alt) = &e.alternative {
                    write!(f, "else {alt}")?;
                }
                Ok(())
            }
            Expr::FunctionLiteral(e) => {
                write!(f, "fn(")?;
                for (i, p) in e.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") {}", e.body)
            }
            Expr::Call(e) => {
                write!(f, "{}(", e.function)?;
                for (i, a) in e.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
            Expr::Index(e) => write!(f, "({}[{}])", e.left, e.index),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntegerLiteral {
    pub value: i64,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub value: Symbol,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayLiteral {
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct HashLiteral {
    pub pairs: Vec<(Expr, Expr)>,
    pub span: Span,
}

/// `!right` / `-right`. `operator` is the literal token text (`"!"` or
/// `"-"`).
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: String,
    pub right: Box<Expr>,
    pub span: Span,
}

/// `left op right`. `operator` is the literal token text, preserved
/// pre-rewrite — the `<` → `>` swap (spec §4.5) is a compiler-level
/// decision, not an AST-level one, so the AST always reflects what was
/// actually written.
#[derive(Debug, Clone)]
pub struct InfixExpr {
    pub operator: String,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// `if (cond) { consequence } else { alternative }`. `alternative` is
/// optional (spec §3 invariant).
#[derive(Debug, Clone)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub consequence: Block,
    pub alternative: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionLiteral {
    pub params: Vec<Identifier>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub function: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub left: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}
