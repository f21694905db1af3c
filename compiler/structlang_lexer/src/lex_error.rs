use structlang_ir::Position;
use thiserror::Error;

/// A lexer error: what went wrong and where.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
#[error("{kind} at {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

impl LexError {
    #[cold]
    pub fn new(kind: LexErrorKind, position: Position) -> Self {
        LexError { kind, position }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum LexErrorKind {
    /// A character that starts no token.
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    /// Missing closing `"` for a string literal.
    #[error("unterminated string literal")]
    UnterminatedString,
}
