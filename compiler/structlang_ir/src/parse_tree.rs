//! Concrete parse tree.
//!
//! Every node keeps every token it was parsed from, separators and
//! terminators included. The tree is only consumed by the AST builder and by
//! diagnostics; evaluation never sees it.
//!
//! `Display` renders nodes as S-expressions, e.g. `1 + 2 * 3` prints as
//! `(+ 1 (* 2 3))` and `a->b->c` as `(-> (-> a b) c)`.

use std::fmt;

use crate::ast::{InfixOp, LiteralKind, PrefixOp};
use crate::token::Token;

/// A list of items, each optionally followed by its separator token.
///
/// Every element but the last carries its separator. The last carries one
/// only where the grammar permits a trailing separator (struct literals).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SeparatedList<T>(pub Vec<(T, Option<Token>)>);

impl<T> SeparatedList<T> {
    pub fn new() -> Self {
        SeparatedList(Vec::new())
    }

    pub fn push(&mut self, item: T, separator: Option<Token>) {
        self.0.push((item, separator));
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.0.iter().map(|(item, _)| item)
    }

    pub fn separators(&self) -> impl Iterator<Item = &Token> {
        self.0.iter().filter_map(|(_, sep)| sep.as_ref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn join<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = T>,
    sep: &str,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// A whole source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub eof: Option<Token>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        join(f, self.stmts.iter(), "\n")
    }
}

// Statements

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    TypeDef(TypeDef),
    VarDef(VarDef),
    VarSet(VarSet),
    Return(ReturnStmt),
    Expr(ExprStmt),
}

impl Stmt {
    pub fn first_token(&self) -> &Token {
        match self {
            Stmt::TypeDef(td) => &td.type_kw,
            Stmt::VarDef(vd) => &vd.let_kw,
            Stmt::VarSet(vs) => &vs.set_kw,
            Stmt::Return(rs) => &rs.return_kw,
            Stmt::Expr(es) => es.expr.first_token(),
        }
    }

    pub fn last_token(&self) -> &Token {
        match self {
            Stmt::TypeDef(td) => &td.semicolon,
            Stmt::VarDef(vd) => &vd.semicolon,
            Stmt::VarSet(vs) => &vs.semicolon,
            Stmt::Return(rs) => &rs.semicolon,
            Stmt::Expr(es) => &es.semicolon,
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::TypeDef(td) => write!(f, "(type {} = {} ;)", td.name, td.def),
            Stmt::VarDef(vd) => write!(f, "(let {} = {} ;)", vd.target, vd.value),
            Stmt::VarSet(vs) => write!(f, "(set {} = {} ;)", vs.target, vs.value),
            Stmt::Return(rs) => match &rs.value {
                Some(value) => write!(f, "(return {value} ;)"),
                None => f.write_str("(return ;)"),
            },
            Stmt::Expr(es) => write!(f, "({} ;)", es.expr),
        }
    }
}

/// `type Name[T] = struct[T] { ... };`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDef {
    pub type_kw: Token,
    pub name: Type,
    pub eq: Token,
    pub def: StructDef,
    pub semicolon: Token,
}

/// `let lvalue = expr;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarDef {
    pub let_kw: Token,
    pub target: Lvalue,
    pub eq: Token,
    pub value: Expr,
    pub semicolon: Token,
}

/// `set lvalue = expr;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarSet {
    pub set_kw: Token,
    pub target: Lvalue,
    pub eq: Token,
    pub value: Expr,
    pub semicolon: Token,
}

/// `return [expr];`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReturnStmt {
    pub return_kw: Token,
    pub value: Option<Expr>,
    pub semicolon: Token,
}

/// `expr;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub semicolon: Token,
}

// Types

/// A type reference: `Name` or `Name[Arg, ...]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Type {
    pub name: Ident,
    pub args: Option<TypeArgs>,
}

impl Type {
    pub fn first_token(&self) -> &Token {
        &self.name.name
    }

    pub fn last_token(&self) -> &Token {
        match &self.args {
            Some(args) => &args.rbracket,
            None => &self.name.name,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.args {
            Some(args) => {
                write!(f, "{}[", self.name)?;
                join(f, args.types.items(), ",")?;
                f.write_str("]")
            }
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeArgs {
    pub lbracket: Token,
    pub types: SeparatedList<Type>,
    pub rbracket: Token,
}

/// `struct[T, U] { a, b T; c U }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDef {
    pub struct_kw: Token,
    pub params: Option<TypeParams>,
    pub lbrace: Token,
    pub fields: Vec<StructField>,
    pub rbrace: Token,
}

impl fmt::Display for StructDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(struct ")?;
        if let Some(params) = &self.params {
            f.write_str("[")?;
            join(f, params.names.items(), ",")?;
            f.write_str("] ")?;
        }
        f.write_str("{")?;
        join(f, self.fields.iter(), " ")?;
        f.write_str("})")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParams {
    pub lbracket: Token,
    pub names: SeparatedList<Ident>,
    pub rbracket: Token,
}

/// One `names Type;` group inside a struct definition. The final group may
/// omit its semicolon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    pub names: SeparatedList<Ident>,
    pub ty: Type,
    pub semicolon: Option<Token>,
}

impl fmt::Display for StructField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        join(f, self.names.items(), " ")?;
        write!(f, " {})", self.ty)
    }
}

// Expressions

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: Token,
}

impl Ident {
    pub fn as_str(&self) -> &str {
        &self.name.lexeme
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name.lexeme)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Literal(Literal),
    Ident(Ident),
    StructLiteral(Box<StructLiteral>),
    FieldAccess(Box<FieldAccess>),
    Prefix(Box<PrefixExpr>),
    Infix(Box<InfixExpr>),
    Grouping(Box<Grouping>),
    Call(Box<CallExpr>),
    FuncDef(Box<FuncDef>),
}

impl Expr {
    pub fn first_token(&self) -> &Token {
        match self {
            Expr::Literal(lit) => &lit.token,
            Expr::Ident(ident) => &ident.name,
            Expr::StructLiteral(sl) => sl.ty.first_token(),
            Expr::FieldAccess(fa) => fa.first_token(),
            Expr::Prefix(pe) => &pe.op_token,
            Expr::Infix(ie) => ie.left.first_token(),
            Expr::Grouping(g) => &g.lparen,
            Expr::Call(call) => call.callee.first_token(),
            Expr::FuncDef(fd) => &fd.func_kw,
        }
    }

    pub fn last_token(&self) -> &Token {
        match self {
            Expr::Literal(lit) => &lit.token,
            Expr::Ident(ident) => &ident.name,
            Expr::StructLiteral(sl) => &sl.rbrace,
            Expr::FieldAccess(fa) => &fa.field.name,
            Expr::Prefix(pe) => pe.operand.last_token(),
            Expr::Infix(ie) => ie.right.last_token(),
            Expr::Grouping(g) => &g.rparen,
            Expr::Call(call) => &call.rparen,
            Expr::FuncDef(fd) => &fd.rbrace,
        }
    }

    /// Reinterpret this expression as an assignment target, if it has that
    /// shape.
    pub fn into_lvalue(self) -> Result<Lvalue, Expr> {
        match self {
            Expr::Ident(ident) => Ok(Lvalue::Ident(ident)),
            Expr::FieldAccess(fa) => Ok(Lvalue::FieldAccess(fa)),
            other => Err(other),
        }
    }
}

impl From<Lvalue> for Expr {
    fn from(lvalue: Lvalue) -> Self {
        match lvalue {
            Lvalue::Ident(ident) => Expr::Ident(ident),
            Lvalue::FieldAccess(fa) => Expr::FieldAccess(fa),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => f.write_str(&lit.token.lexeme),
            Expr::Ident(ident) => write!(f, "{ident}"),
            Expr::StructLiteral(sl) => {
                write!(f, "({} {{", sl.ty)?;
                join(f, sl.fields.items(), " ")?;
                f.write_str("})")
            }
            Expr::FieldAccess(fa) => write!(f, "{fa}"),
            Expr::Prefix(pe) => write!(f, "({} {})", pe.op_token.lexeme, pe.operand),
            Expr::Infix(ie) => write!(f, "({} {} {})", ie.op_token.lexeme, ie.left, ie.right),
            Expr::Grouping(g) => write!(f, "({})", g.inner),
            Expr::Call(call) => {
                write!(f, "({} (", call.callee)?;
                join(f, call.args.items(), " ")?;
                f.write_str("))")
            }
            Expr::FuncDef(fd) => {
                f.write_str("(func (")?;
                join(f, fd.params.items(), " ")?;
                f.write_str(")")?;
                if let Some(ret) = &fd.return_type {
                    write!(f, " {ret}")?;
                }
                f.write_str(" {")?;
                join(f, fd.body.iter(), " ")?;
                f.write_str("})")
            }
        }
    }
}

/// Assignment target: a bare identifier or a field-access chain rooted in one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lvalue {
    Ident(Ident),
    FieldAccess(Box<FieldAccess>),
}

impl Lvalue {
    pub fn first_token(&self) -> &Token {
        match self {
            Lvalue::Ident(ident) => &ident.name,
            Lvalue::FieldAccess(fa) => fa.first_token(),
        }
    }

    pub fn last_token(&self) -> &Token {
        match self {
            Lvalue::Ident(ident) => &ident.name,
            Lvalue::FieldAccess(fa) => &fa.field.name,
        }
    }
}

impl fmt::Display for Lvalue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lvalue::Ident(ident) => write!(f, "{ident}"),
            Lvalue::FieldAccess(fa) => write!(f, "{fa}"),
        }
    }
}

/// `base->field`. Chains lean left: `a->b->c` is `(a->b)->c`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldAccess {
    pub base: Lvalue,
    pub arrow: Token,
    pub field: Ident,
}

impl FieldAccess {
    pub fn first_token(&self) -> &Token {
        self.base.first_token()
    }
}

impl fmt::Display for FieldAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(-> {} {})", self.base, self.field)
    }
}

/// `Type { name: expr, ... }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructLiteral {
    pub ty: Type,
    pub lbrace: Token,
    pub fields: SeparatedList<FieldInit>,
    pub rbrace: Token,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInit {
    pub name: Ident,
    pub colon: Token,
    pub value: Expr,
}

impl fmt::Display for FieldInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.name, self.value)
    }
}

/// A literal token, classified when the literal parselet accepted it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub token: Token,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixExpr {
    pub op: PrefixOp,
    pub op_token: Token,
    pub operand: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfixExpr {
    pub left: Expr,
    pub op: InfixOp,
    pub op_token: Token,
    pub right: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grouping {
    pub lparen: Token,
    pub inner: Expr,
    pub rparen: Token,
}

/// `callee(arg, ...)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallExpr {
    pub callee: Lvalue,
    pub lparen: Token,
    pub args: SeparatedList<Expr>,
    pub rparen: Token,
}

/// `func(name Type, ...) [Type] { stmts }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncDef {
    pub func_kw: Token,
    pub lparen: Token,
    pub params: SeparatedList<Param>,
    pub rparen: Token,
    pub return_type: Option<Type>,
    pub lbrace: Token,
    pub body: Vec<Stmt>,
    pub rbrace: Token,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: Ident,
    pub ty: Type,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.name, self.ty)
    }
}
