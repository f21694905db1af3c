//! Statement parsing.
//!
//! Every statement ends in a `;` that is consumed explicitly; a missing
//! terminator is an error, never inferred.

use structlang_ir::parse_tree::{
    ExprStmt, FieldAccess, Ident, Lvalue, Program, ReturnStmt, Stmt, TypeDef, VarDef, VarSet,
};
use structlang_ir::{Precedence, TokenKind};

use crate::{ErrorContext, ParseError, Parser};

impl Parser<'_> {
    /// Parse a whole program up to `Eof`.
    ///
    /// A buffer without a trailing `Eof` is accepted; parsing then stops when
    /// the tokens run out.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut stmts = Vec::new();
        let mut eof = None;
        while self.cursor.has_more() {
            let next = self.cursor.peek()?;
            match next.kind {
                TokenKind::Eof => {
                    eof = Some(self.cursor.advance()?.clone());
                    break;
                }
                TokenKind::RBrace => {
                    return Err(ParseError::unexpected_described("a statement", next));
                }
                _ => stmts.push(self.parse_stmt()?),
            }
        }
        tracing::debug!(stmts = stmts.len(), "parsed program");
        Ok(Program { stmts, eof })
    }

    /// Parse statements until the closing `}` of a block, leaving the `}`
    /// unconsumed.
    pub(crate) fn parse_block_stmts(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !self.cursor.check(TokenKind::RBrace)? {
            if self.cursor.check(TokenKind::Eof)? {
                let eof = self.cursor.peek()?;
                return Err(ParseError::unexpected(&[TokenKind::RBrace], eof));
            }
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    pub fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.in_context(ErrorContext::Stmt, |p| match p.cursor.peek()?.kind {
            TokenKind::Type => p.parse_type_def().map(Stmt::TypeDef),
            TokenKind::Let => p.parse_var_def().map(Stmt::VarDef),
            TokenKind::Set => p.parse_var_set().map(Stmt::VarSet),
            TokenKind::Return => p.parse_return().map(Stmt::Return),
            _ => p.parse_expr_stmt().map(Stmt::Expr),
        })
    }

    /// `type Type = StructDef ;`
    fn parse_type_def(&mut self) -> Result<TypeDef, ParseError> {
        self.in_context(ErrorContext::TypeDef, |p| {
            let type_kw = p.cursor.expect(TokenKind::Type)?;
            let name = p.parse_type()?;
            let eq = p.cursor.expect(TokenKind::Eq)?;
            let def = p.parse_struct_def()?;
            let semicolon = p.cursor.expect(TokenKind::Semicolon)?;
            Ok(TypeDef {
                type_kw,
                name,
                eq,
                def,
                semicolon,
            })
        })
    }

    /// `let Lvalue = Expr ;`
    fn parse_var_def(&mut self) -> Result<VarDef, ParseError> {
        self.in_context(ErrorContext::VarDef, |p| {
            let let_kw = p.cursor.expect(TokenKind::Let)?;
            let target = p.parse_lvalue()?;
            let eq = p.cursor.expect(TokenKind::Eq)?;
            let value = p.parse_expr(Precedence::Bottom)?;
            let semicolon = p.cursor.expect(TokenKind::Semicolon)?;
            Ok(VarDef {
                let_kw,
                target,
                eq,
                value,
                semicolon,
            })
        })
    }

    /// `set Lvalue = Expr ;`
    fn parse_var_set(&mut self) -> Result<VarSet, ParseError> {
        self.in_context(ErrorContext::VarSet, |p| {
            let set_kw = p.cursor.expect(TokenKind::Set)?;
            let target = p.parse_lvalue()?;
            let eq = p.cursor.expect(TokenKind::Eq)?;
            let value = p.parse_expr(Precedence::Bottom)?;
            let semicolon = p.cursor.expect(TokenKind::Semicolon)?;
            Ok(VarSet {
                set_kw,
                target,
                eq,
                value,
                semicolon,
            })
        })
    }

    /// `return [Expr] ;`
    fn parse_return(&mut self) -> Result<ReturnStmt, ParseError> {
        self.in_context(ErrorContext::ReturnStmt, |p| {
            let return_kw = p.cursor.expect(TokenKind::Return)?;
            let value = if p.cursor.check(TokenKind::Semicolon)? {
                None
            } else {
                Some(p.parse_expr(Precedence::Bottom)?)
            };
            let semicolon = p.cursor.expect(TokenKind::Semicolon)?;
            Ok(ReturnStmt {
                return_kw,
                value,
                semicolon,
            })
        })
    }

    /// `Expr ;`
    fn parse_expr_stmt(&mut self) -> Result<ExprStmt, ParseError> {
        self.in_context(ErrorContext::ExprStmt, |p| {
            let expr = p.parse_expr(Precedence::Bottom)?;
            let semicolon = p.cursor.expect(TokenKind::Semicolon)?;
            Ok(ExprStmt { expr, semicolon })
        })
    }

    /// An identifier, or a field-access chain rooted in one.
    fn parse_lvalue(&mut self) -> Result<Lvalue, ParseError> {
        self.in_context(ErrorContext::Lvalue, |p| {
            let name = p.cursor.expect(TokenKind::Ident)?;
            if p.cursor.check(TokenKind::Arrow)? {
                p.cursor.put_back();
                p.parse_field_access()
            } else {
                Ok(Lvalue::Ident(Ident { name }))
            }
        })
    }

    /// `ident { -> ident }`, folded to the left.
    pub(crate) fn parse_field_access(&mut self) -> Result<Lvalue, ParseError> {
        self.in_context(ErrorContext::FieldAccess, |p| {
            let root = p.cursor.expect(TokenKind::Ident)?;
            let mut lvalue = Lvalue::Ident(Ident { name: root });
            while p.cursor.check(TokenKind::Arrow)? {
                let arrow = p.cursor.expect(TokenKind::Arrow)?;
                let field = p.cursor.expect(TokenKind::Ident)?;
                lvalue = Lvalue::FieldAccess(Box::new(FieldAccess {
                    base: lvalue,
                    arrow,
                    field: Ident { name: field },
                }));
            }
            Ok(lvalue)
        })
    }
}
