//! Expression parsing by precedence climbing.
//!
//! `parse_expr(min)` takes one token, runs its prefix parselet, then keeps
//! folding infix parselets whose precedence is strictly greater than `min`.
//! Left associativity falls out of that strict comparison.

use structlang_ir::ast::{InfixOp, LiteralKind, PrefixOp};
use structlang_ir::parse_tree::{
    CallExpr, Expr, FieldInit, FuncDef, Grouping, Ident, InfixExpr, Literal, Param, PrefixExpr,
    SeparatedList, StructLiteral,
};
use structlang_ir::{Precedence, Token, TokenKind};
use structlang_stack::ensure_sufficient_stack;

use crate::parselet::{InfixParselet, PrefixParselet};
use crate::{ErrorContext, ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    /// Parse an expression whose infix operators all bind tighter than
    /// `min`.
    pub fn parse_expr(&mut self, min: Precedence) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_expr_inner(min))
    }

    fn parse_expr_inner(&mut self, min: Precedence) -> Result<Expr, ParseError> {
        let token = self.cursor.advance()?;
        let Some(prefix) = self.table.prefix(token.kind) else {
            return Err(ParseError::no_prefix_rule(token));
        };
        tracing::trace!(?prefix, lexeme = %token.lexeme, "prefix parselet");
        let mut left = self.parse_prefix(prefix, token.clone())?;

        loop {
            let next = self.cursor.peek()?;
            let Some(infix) = self.table.infix(next.kind) else {
                break;
            };
            if infix.precedence() <= min {
                break;
            }
            let op = self.cursor.advance()?.clone();
            tracing::trace!(?infix, lexeme = %op.lexeme, "infix parselet");
            left = self.parse_infix(infix, left, op)?;
        }
        Ok(left)
    }

    fn parse_prefix(&mut self, parselet: PrefixParselet, token: Token) -> Result<Expr, ParseError> {
        match parselet {
            PrefixParselet::Literal => {
                let Some(kind) = LiteralKind::from_token(token.kind) else {
                    return Err(ParseError::no_prefix_rule(&token));
                };
                Ok(Expr::Literal(Literal { kind, token }))
            }
            PrefixParselet::Ident => {
                self.cursor.put_back();
                self.parse_ident_expr()
            }
            PrefixParselet::Grouping => self.in_context(ErrorContext::Grouping, |p| {
                let inner = p.parse_expr(Precedence::Bottom)?;
                let rparen = p.cursor.expect(TokenKind::RParen)?;
                Ok(Expr::Grouping(Box::new(Grouping {
                    lparen: token,
                    inner,
                    rparen,
                })))
            }),
            PrefixParselet::Operator(precedence) => {
                let Some(op) = PrefixOp::from_token(token.kind) else {
                    return Err(ParseError::no_prefix_rule(&token));
                };
                self.in_context(ErrorContext::PrefixOperator, |p| {
                    let operand = p.parse_expr(precedence)?;
                    Ok(Expr::Prefix(Box::new(PrefixExpr {
                        op,
                        op_token: token,
                        operand,
                    })))
                })
            }
            PrefixParselet::FuncDef => self.in_context(ErrorContext::FuncDef, |p| {
                p.parse_func_def(token).map(|def| Expr::FuncDef(Box::new(def)))
            }),
        }
    }

    fn parse_infix(
        &mut self,
        parselet: InfixParselet,
        left: Expr,
        op_token: Token,
    ) -> Result<Expr, ParseError> {
        match parselet {
            InfixParselet::Binary {
                precedence,
                right_assoc,
            } => {
                let Some(op) = InfixOp::from_token(op_token.kind) else {
                    return Err(ParseError::no_infix_rule(&op_token));
                };
                let rhs_precedence = if right_assoc {
                    precedence.weaker()
                } else {
                    precedence
                };
                self.in_context(ErrorContext::InfixOperator, |p| {
                    let right = p.parse_expr(rhs_precedence)?;
                    Ok(Expr::Infix(Box::new(InfixExpr {
                        left,
                        op,
                        op_token,
                        right,
                    })))
                })
            }
            InfixParselet::Call => self.in_context(ErrorContext::Call, |p| {
                let callee = left.into_lvalue().map_err(|_| {
                    ParseError::new(
                        ParseErrorKind::CalleeNotLvalue,
                        Some(op_token.position.clone()),
                    )
                })?;
                let mut args = SeparatedList::new();
                if !p.cursor.check(TokenKind::RParen)? {
                    loop {
                        let arg = p.parse_expr(Precedence::Bottom)?;
                        if p.cursor.check(TokenKind::RParen)? {
                            args.push(arg, None);
                            break;
                        }
                        let comma = p.cursor.expect(TokenKind::Comma)?;
                        args.push(arg, Some(comma));
                    }
                }
                let rparen = p.cursor.expect(TokenKind::RParen)?;
                Ok(Expr::Call(Box::new(CallExpr {
                    callee,
                    lparen: op_token,
                    args,
                    rparen,
                })))
            }),
        }
    }

    /// An identifier decides by lookahead: `{` or `[` starts a struct
    /// literal, `->` a field-access chain, anything else ends a bare name.
    fn parse_ident_expr(&mut self) -> Result<Expr, ParseError> {
        let name = self.cursor.expect(TokenKind::Ident)?;
        if self
            .cursor
            .check_any(&[TokenKind::LBrace, TokenKind::LBracket])?
        {
            self.cursor.put_back();
            return self
                .parse_struct_literal()
                .map(|sl| Expr::StructLiteral(Box::new(sl)));
        }
        if self.cursor.check(TokenKind::Arrow)? {
            self.cursor.put_back();
            return self.parse_field_access().map(Expr::from);
        }
        Ok(Expr::Ident(Ident { name }))
    }

    /// `Type '{' [ident ':' Expr {',' ident ':' Expr} [',']] '}'`
    fn parse_struct_literal(&mut self) -> Result<StructLiteral, ParseError> {
        self.in_context(ErrorContext::StructLiteral, |p| {
            let ty = p.parse_type()?;
            let lbrace = p.cursor.expect(TokenKind::LBrace)?;
            let fields = p.in_context(ErrorContext::StructLiteralFields, |p| {
                let mut fields = SeparatedList::new();
                while !p.cursor.check(TokenKind::RBrace)? {
                    let name = Ident {
                        name: p.cursor.expect(TokenKind::Ident)?,
                    };
                    let colon = p.cursor.expect(TokenKind::Colon)?;
                    let value = p.parse_expr(Precedence::Bottom)?;
                    let field = FieldInit { name, colon, value };
                    if p.cursor.check(TokenKind::RBrace)? {
                        fields.push(field, None);
                        break;
                    }
                    let comma = p.cursor.expect(TokenKind::Comma)?;
                    fields.push(field, Some(comma));
                }
                Ok(fields)
            })?;
            let rbrace = p.cursor.expect(TokenKind::RBrace)?;
            Ok(StructLiteral {
                ty,
                lbrace,
                fields,
                rbrace,
            })
        })
    }

    /// After `func`: `'(' [Param {',' Param}] ')' [Type] '{' Stmt* '}'`
    fn parse_func_def(&mut self, func_kw: Token) -> Result<FuncDef, ParseError> {
        let lparen = self.cursor.expect(TokenKind::LParen)?;
        let params = self.in_context(ErrorContext::FuncParams, |p| {
            let mut params = SeparatedList::new();
            if p.cursor.check(TokenKind::RParen)? {
                return Ok(params);
            }
            loop {
                let name = Ident {
                    name: p.cursor.expect(TokenKind::Ident)?,
                };
                let ty = p.parse_type()?;
                let param = Param { name, ty };
                if p.cursor.check(TokenKind::RParen)? {
                    params.push(param, None);
                    return Ok(params);
                }
                let comma = p.cursor.expect(TokenKind::Comma)?;
                params.push(param, Some(comma));
            }
        })?;
        let rparen = self.cursor.expect(TokenKind::RParen)?;
        let return_type = if self.cursor.check(TokenKind::LBrace)? {
            None
        } else {
            Some(self.parse_type()?)
        };
        let lbrace = self.cursor.expect(TokenKind::LBrace)?;
        let body = self.in_context(ErrorContext::FuncBody, Parser::parse_block_stmts)?;
        let rbrace = self.cursor.expect(TokenKind::RBrace)?;
        Ok(FuncDef {
            func_kw,
            lparen,
            params,
            rparen,
            return_type,
            lbrace,
            body,
            rbrace,
        })
    }
}
