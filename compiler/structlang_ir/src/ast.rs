//! Semantic AST.
//!
//! Built from the parse tree by the AST builder. Separator tokens are gone,
//! groupings are collapsed into their inner expression, and every node keeps
//! the span of the first and last token it came from.

use std::fmt;
use std::rc::Rc;

use crate::span::Span;
use crate::token::TokenKind;

/// A program: the top-level statements in source order.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    TypeDef(TypeDef),
    VarDef(VarDef),
    VarSet(VarSet),
    Return(Return),
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> &Span {
        match self {
            Stmt::TypeDef(td) => &td.span,
            Stmt::VarDef(vd) => &vd.span,
            Stmt::VarSet(vs) => &vs.span,
            Stmt::Return(ret) => &ret.span,
            Stmt::Expr(expr) => &expr.span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeDef {
    pub name: Type,
    pub def: StructDef,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDef {
    pub target: Lvalue,
    pub value: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarSet {
    pub target: Lvalue,
    pub value: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Return {
    pub value: Option<Expr>,
    pub span: Span,
}

/// A type reference such as `int` or `Pair[int, string]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Type {
    pub name: Ident,
    pub args: Vec<Type>,
    pub span: Span,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name.name)?;
        if !self.args.is_empty() {
            f.write_str("[")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDef {
    pub params: Vec<Ident>,
    pub fields: Vec<StructField>,
    pub span: Span,
}

/// Several names sharing one declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    pub names: Vec<Ident>,
    pub ty: Type,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Assignment target.
#[derive(Clone, Debug, PartialEq)]
pub enum Lvalue {
    Ident(Ident),
    FieldAccess(FieldAccess),
}

impl Lvalue {
    /// The identifier the chain is rooted in.
    pub fn base(&self) -> &Ident {
        match self {
            Lvalue::Ident(ident) => ident,
            Lvalue::FieldAccess(fa) => fa.base.base(),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Lvalue::Ident(ident) => &ident.span,
            Lvalue::FieldAccess(fa) => &fa.span,
        }
    }
}

impl fmt::Display for Lvalue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lvalue::Ident(ident) => write!(f, "{ident}"),
            Lvalue::FieldAccess(fa) => write!(f, "(-> {} {})", fa.base, fa.field),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldAccess {
    pub base: Box<Lvalue>,
    pub field: Ident,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Ident(Ident),
    StructLiteral(StructLiteral),
    FieldAccess(FieldAccess),
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    Infix {
        op: InfixOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        callee: Lvalue,
        args: Vec<Expr>,
    },
    FuncDef(Rc<FuncDef>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(lit) => f.write_str(&lit.lexeme),
            ExprKind::Ident(ident) => write!(f, "{ident}"),
            ExprKind::StructLiteral(sl) => {
                write!(f, "({} {{", sl.ty)?;
                for (i, field) in sl.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "({}:{})", field.name, field.value)?;
                }
                f.write_str("})")
            }
            ExprKind::FieldAccess(fa) => write!(f, "(-> {} {})", fa.base, fa.field),
            ExprKind::Prefix { op, operand } => write!(f, "({op} {operand})"),
            ExprKind::Infix { op, left, right } => write!(f, "({op} {left} {right})"),
            ExprKind::Call { callee, args } => {
                write!(f, "({callee} (")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str("))")
            }
            ExprKind::FuncDef(def) => write!(f, "{def}"),
        }
    }
}

/// Which literal token a `Literal` came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    Float,
    String,
    True,
    False,
    Nil,
}

impl LiteralKind {
    pub fn from_token(kind: TokenKind) -> Option<LiteralKind> {
        match kind {
            TokenKind::Int => Some(LiteralKind::Int),
            TokenKind::Float => Some(LiteralKind::Float),
            TokenKind::String => Some(LiteralKind::String),
            TokenKind::True => Some(LiteralKind::True),
            TokenKind::False => Some(LiteralKind::False),
            TokenKind::Nil => Some(LiteralKind::Nil),
            _ => None,
        }
    }
}

/// A literal, still in source form. Values are produced at evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub lexeme: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructLiteral {
    pub ty: Type,
    pub fields: Vec<FieldInit>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldInit {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

/// A function literal. Shared by reference between the AST and every
/// closure created from it.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDef {
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl fmt::Display for FuncDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("func(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", param.name, param.ty)?;
        }
        f.write_str(")")?;
        if let Some(ret) = &self.return_type {
            write!(f, " {ret}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: Ident,
    pub ty: Type,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    /// `+x`
    Pos,
    /// `-x`
    Neg,
    /// `not x`
    Not,
}

impl PrefixOp {
    pub fn from_token(kind: TokenKind) -> Option<PrefixOp> {
        match kind {
            TokenKind::Plus => Some(PrefixOp::Pos),
            TokenKind::Minus => Some(PrefixOp::Neg),
            TokenKind::Not => Some(PrefixOp::Not),
            _ => None,
        }
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            PrefixOp::Pos => "+",
            PrefixOp::Neg => "-",
            PrefixOp::Not => "not",
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Gt,
    GtEq,
    Lt,
    LtEq,
    Eq,
    And,
    Or,
}

impl InfixOp {
    pub fn from_token(kind: TokenKind) -> Option<InfixOp> {
        match kind {
            TokenKind::Plus => Some(InfixOp::Add),
            TokenKind::Minus => Some(InfixOp::Sub),
            TokenKind::Star => Some(InfixOp::Mul),
            TokenKind::Slash => Some(InfixOp::Div),
            TokenKind::Gt => Some(InfixOp::Gt),
            TokenKind::GtEq => Some(InfixOp::GtEq),
            TokenKind::Lt => Some(InfixOp::Lt),
            TokenKind::LtEq => Some(InfixOp::LtEq),
            TokenKind::EqEq => Some(InfixOp::Eq),
            TokenKind::And => Some(InfixOp::And),
            TokenKind::Or => Some(InfixOp::Or),
            _ => None,
        }
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Gt => ">",
            InfixOp::GtEq => ">=",
            InfixOp::Lt => "<",
            InfixOp::LtEq => "<=",
            InfixOp::Eq => "==",
            InfixOp::And => "and",
            InfixOp::Or => "or",
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}
