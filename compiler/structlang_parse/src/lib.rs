//! Parser for structlang.
//!
//! Precedence-climbing over a prefix/infix operator table, producing a
//! concrete [`parse_tree::Program`]. Statements are parsed by recursive
//! descent; the first error aborts the parse with the rule chain that led to
//! it, and no partial tree is returned.
//!
//! [`build_ast`] then turns the parse tree into the semantic AST.
//!
//! [`parse_tree::Program`]: structlang_ir::parse_tree::Program

mod cursor;
mod error;
mod grammar;
mod lower;
pub mod parselet;

use structlang_ir::parse_tree;
use structlang_ir::Token;

pub use cursor::Cursor;
pub use error::{ErrorContext, ParseError, ParseErrorKind};
pub use lower::build_ast;
pub use parselet::{InfixParselet, OperatorTable, PrefixParselet};

/// Parser state: a cursor over the token buffer and the operator table.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    table: OperatorTable,
}

impl<'a> Parser<'a> {
    /// Parser with the standard operator table.
    ///
    /// `tokens` must already have comments filtered out.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_table(tokens, OperatorTable::standard())
    }

    pub fn with_table(tokens: &'a [Token], table: OperatorTable) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            table,
        }
    }

    /// Run `f`, tagging any error it returns with `ctx`.
    #[inline]
    fn in_context<T>(
        &mut self,
        ctx: ErrorContext,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        f(self).map_err(|err| err.in_context(ctx))
    }
}

/// Parse a comment-free token buffer into a parse tree.
pub fn parse(tokens: &[Token]) -> Result<parse_tree::Program, ParseError> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests;
