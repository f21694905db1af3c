//! Token cursor for navigating the token buffer.
//!
//! The parser reads from a finite slice, so it can peek any distance ahead
//! and put back the token it just took.

use structlang_ir::{Token, TokenKind};

use crate::error::{ParseError, ParseErrorKind};

pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn has_more(&self) -> bool {
        self.pos < self.tokens.len()
    }

    /// Position of the last token in the buffer, for errors at the end.
    fn last_position(&self) -> Option<structlang_ir::Position> {
        self.tokens.last().map(|tok| tok.position.clone())
    }

    #[cold]
    fn out_of_tokens(&self) -> ParseError {
        ParseError::new(ParseErrorKind::OutOfTokens, self.last_position())
    }

    /// The next token, without consuming it.
    pub fn peek(&self) -> Result<&'a Token, ParseError> {
        self.tokens
            .get(self.pos)
            .ok_or_else(|| self.out_of_tokens())
    }

    /// Consume and return the next token.
    pub fn advance(&mut self) -> Result<&'a Token, ParseError> {
        let tok = self.peek()?;
        self.pos += 1;
        tracing::trace!(kind = ?tok.kind, lexeme = %tok.lexeme, "advance");
        Ok(tok)
    }

    /// Un-consume the token most recently returned by `advance`.
    pub fn put_back(&mut self) {
        debug_assert!(self.pos > 0, "put_back at start of token buffer");
        self.pos = self.pos.saturating_sub(1);
    }

    /// Whether the next token has kind `kind`.
    pub fn check(&self, kind: TokenKind) -> Result<bool, ParseError> {
        Ok(self.peek()?.kind == kind)
    }

    pub fn check_any(&self, kinds: &[TokenKind]) -> Result<bool, ParseError> {
        let next = self.peek()?.kind;
        Ok(kinds.contains(&next))
    }

    /// Consume the next token, which must have kind `kind`.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.expect_any(&[kind])
    }

    /// Consume the next token, which must have one of `kinds`.
    pub fn expect_any(&mut self, kinds: &[TokenKind]) -> Result<Token, ParseError> {
        let tok = self.advance()?;
        if kinds.contains(&tok.kind) {
            Ok(tok.clone())
        } else {
            Err(ParseError::unexpected(kinds, tok))
        }
    }
}
