//! Type references and struct definitions.

use structlang_ir::parse_tree::{
    Ident, SeparatedList, StructDef, StructField, Type, TypeArgs, TypeParams,
};
use structlang_ir::TokenKind;

use crate::{ErrorContext, ParseError, ParseErrorKind, Parser};

/// `nil` doubles as a type name.
const TYPE_NAME: [TokenKind; 2] = [TokenKind::Ident, TokenKind::Nil];

impl Parser<'_> {
    /// `Ident [ '[' Type {',' Type} ']' ]`
    pub(crate) fn parse_type(&mut self) -> Result<Type, ParseError> {
        self.in_context(ErrorContext::Type, |p| {
            let name = Ident {
                name: p.cursor.expect_any(&TYPE_NAME)?,
            };
            let args = if p.cursor.check(TokenKind::LBracket)? {
                Some(p.parse_type_args()?)
            } else {
                None
            };
            Ok(Type { name, args })
        })
    }

    fn parse_type_args(&mut self) -> Result<TypeArgs, ParseError> {
        self.in_context(ErrorContext::TypeArgs, |p| {
            let lbracket = p.cursor.expect(TokenKind::LBracket)?;
            let mut types = SeparatedList::new();
            loop {
                let ty = p.parse_type()?;
                if !p.cursor.check(TokenKind::Comma)? {
                    types.push(ty, None);
                    break;
                }
                let comma = p.cursor.expect(TokenKind::Comma)?;
                types.push(ty, Some(comma));
            }
            let rbracket = p.cursor.expect(TokenKind::RBracket)?;
            Ok(TypeArgs {
                lbracket,
                types,
                rbracket,
            })
        })
    }

    /// `struct [ '[' Ident {',' Ident} ']' ] '{' fields '}'`
    pub(crate) fn parse_struct_def(&mut self) -> Result<StructDef, ParseError> {
        self.in_context(ErrorContext::StructDef, |p| {
            let struct_kw = p.cursor.expect(TokenKind::Struct)?;
            let params = if p.cursor.check(TokenKind::LBracket)? {
                Some(p.parse_type_params()?)
            } else {
                None
            };
            let lbrace = p.cursor.expect(TokenKind::LBrace)?;
            let fields = p.parse_struct_fields()?;
            let rbrace = p.cursor.expect(TokenKind::RBrace)?;
            Ok(StructDef {
                struct_kw,
                params,
                lbrace,
                fields,
                rbrace,
            })
        })
    }

    fn parse_type_params(&mut self) -> Result<TypeParams, ParseError> {
        self.in_context(ErrorContext::TypeParams, |p| {
            let lbracket = p.cursor.expect(TokenKind::LBracket)?;
            let names = p.parse_name_list()?;
            let rbracket = p.cursor.expect(TokenKind::RBracket)?;
            Ok(TypeParams {
                lbracket,
                names,
                rbracket,
            })
        })
    }

    /// `{ NameList Type ';' }`, where the last group may omit its `;`.
    fn parse_struct_fields(&mut self) -> Result<Vec<StructField>, ParseError> {
        self.in_context(ErrorContext::StructFields, |p| {
            let mut fields = Vec::new();
            while !p.cursor.check(TokenKind::RBrace)? {
                let names = p.parse_name_list()?;
                let ty = p.parse_type()?;
                if p.cursor.check(TokenKind::RBrace)? {
                    fields.push(StructField {
                        names,
                        ty,
                        semicolon: None,
                    });
                    break;
                }
                let semicolon = Some(p.cursor.expect(TokenKind::Semicolon)?);
                fields.push(StructField {
                    names,
                    ty,
                    semicolon,
                });
            }
            Ok(fields)
        })
    }

    /// `Ident {',' Ident}`, at least one name, no trailing comma.
    fn parse_name_list(&mut self) -> Result<SeparatedList<Ident>, ParseError> {
        self.in_context(ErrorContext::NameList, |p| {
            let first = p.cursor.peek()?;
            if first.kind != TokenKind::Ident {
                return Err(ParseError::new(
                    ParseErrorKind::EmptyNameList,
                    Some(first.position.clone()),
                ));
            }

            let mut names = SeparatedList::new();
            loop {
                let name = Ident {
                    name: p.cursor.expect(TokenKind::Ident)?,
                };
                if !p.cursor.check(TokenKind::Comma)? {
                    names.push(name, None);
                    return Ok(names);
                }
                let comma = p.cursor.expect(TokenKind::Comma)?;
                names.push(name, Some(comma));
            }
        })
    }
}
