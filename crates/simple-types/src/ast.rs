//! AST node types for Simple scripts.
//!
//! Every node carries a [`Span`] for error reporting.
//! Recursive expression children are boxed to keep enum sizes reasonable.

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete script: the statements of one source file, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `{ statements... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement inside a program or block.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `name = expr;`
    Assignment(Assignment),
    /// `name(args...);`
    Call(FunctionCall),
    /// `while cond { } else { }` / `until cond { } else { }`
    While(WhileBlock),
    /// `if cond { } else { }`
    If(IfBlock),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Assignment(assign) => assign.span,
            Stmt::Call(call) => call.span,
            Stmt::While(while_block) => while_block.span,
            Stmt::If(if_block) => if_block.span,
        }
    }
}

/// `name = expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Ident,
    pub value: Expr,
    pub span: Span,
}

/// `name(arg, ...)`, used both as a statement and as an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: Ident,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Which keyword opened a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    /// `while`: keep looping while the condition is `true`.
    While,
    /// `until`: keep looping while the condition is `false`.
    Until,
}

impl LoopKind {
    pub fn keyword(self) -> &'static str {
        match self {
            LoopKind::While => "while",
            LoopKind::Until => "until",
        }
    }

    /// Whether a condition value lets the loop continue.
    pub fn continues(self, condition: bool) -> bool {
        match self {
            LoopKind::While => condition,
            LoopKind::Until => !condition,
        }
    }
}

/// `while cond { body } else { ... }`
///
/// The else-branch runs once when the very first check fails.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileBlock {
    pub kind: LoopKind,
    pub condition: Expr,
    pub body: Block,
    pub else_branch: Option<ElseIfBlock>,
    pub span: Span,
}

/// `if cond { then } else { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct IfBlock {
    pub condition: Expr,
    pub then_block: Block,
    pub else_branch: Option<ElseIfBlock>,
    pub span: Span,
}

/// The alternative after an `else` keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum ElseIfBlock {
    /// `else { ... }`
    Block(Block),
    /// `else if cond { ... }`
    If(Box<IfBlock>),
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `42`, `2.5`, `"text"`, `true`, `null`
    Constant(Literal),
    /// `count`
    Identifier(String),
    /// `name(args...)`
    Call(FunctionCall),
    /// `a + b`, `a - b`, `a * b`
    Additive {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `a == b`, `a != b`, `a > b`, `a < b`
    Comparison {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `(expr)`
    Paren(Box<Expr>),
}

/// A literal token as written in the source.
///
/// The text is kept verbatim (string delimiters included); turning it into
/// a runtime value is the evaluator's job.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

impl Literal {
    pub fn new(kind: LiteralKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
    Bool,
    Null,
}

/// Binary operators.
///
/// One enum serves both binary node kinds; [`ExprKind::Additive`] accepts
/// the arithmetic operators and [`ExprKind::Comparison`] the comparison ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    // Comparison
    Eq,
    NotEq,
    Greater,
    Less,
}

impl BinOp {
    /// Returns the operator symbol for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Greater => ">",
            BinOp::Less => "<",
        }
    }
}
