//! Source spans for AST nodes.
//!
//! A span records the first and last token a node was built from, so
//! diagnostics can point at either end of a construct.

use std::fmt;

use crate::token::{Position, Token};

/// First/last token positions of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[inline]
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Span covering exactly one token.
    pub fn of(token: &Token) -> Self {
        Span::new(token.position.clone(), token.position.clone())
    }

    /// Span running from the first token to the last token.
    pub fn between(first: &Token, last: &Token) -> Self {
        Span::new(first.position.clone(), last.position.clone())
    }

    /// Merge two spans; the result starts where `self` starts and ends where
    /// `other` ends.
    #[must_use]
    pub fn to(&self, other: &Span) -> Self {
        Span::new(self.start.clone(), other.end.clone())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}:{}", self.start, self.end.line, self.end.col)
        }
    }
}
