//! Tokens produced by the lexer and consumed by the parser.
//!
//! A token is immutable once produced: its kind, the exact source text it
//! covers, and where that text starts.

use std::fmt;
use std::sync::Arc;

/// Token kinds.
///
/// Keywords and symbols each get their own variant so the parser's operator
/// table can key directly on the kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // Bookkeeping
    Comment,
    Eof,

    // Names and literals
    Ident,
    Int,
    Float,
    String,

    // Keywords
    Struct,
    Type,
    Let,
    Set,
    True,
    False,
    Nil,
    Func,
    Return,
    And,
    Or,
    Not,

    // Symbols
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Period,
    Comma,
    Semicolon,
    Colon,
    Eq,
    EqEq,
    Arrow,
    Plus,
    Minus,
    Star,
    Slash,
    Gt,
    GtEq,
    Lt,
    LtEq,
}

impl TokenKind {
    /// Every keyword, paired with its spelling.
    pub const KEYWORDS: [(&'static str, TokenKind); 12] = [
        ("struct", TokenKind::Struct),
        ("type", TokenKind::Type),
        ("let", TokenKind::Let),
        ("set", TokenKind::Set),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("nil", TokenKind::Nil),
        ("func", TokenKind::Func),
        ("return", TokenKind::Return),
        ("and", TokenKind::And),
        ("or", TokenKind::Or),
        ("not", TokenKind::Not),
    ];

    /// Kinds that the literal parselet accepts.
    pub const LITERALS: [TokenKind; 6] = [
        TokenKind::Int,
        TokenKind::Float,
        TokenKind::String,
        TokenKind::True,
        TokenKind::False,
        TokenKind::Nil,
    ];

    /// Look up a keyword by its spelling.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        Self::KEYWORDS
            .iter()
            .find(|(spelling, _)| *spelling == text)
            .map(|(_, kind)| *kind)
    }

    /// Whether this kind is one of the literal kinds.
    #[inline]
    pub fn is_literal(self) -> bool {
        Self::LITERALS.contains(&self)
    }

    /// Human-readable name used in diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of file",
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::String => "string literal",
            TokenKind::Struct => "struct",
            TokenKind::Type => "type",
            TokenKind::Let => "let",
            TokenKind::Set => "set",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Nil => "nil",
            TokenKind::Func => "func",
            TokenKind::Return => "return",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Period => ".",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::Arrow => "->",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Where a token starts in its source file.
///
/// `line` and `col` are 1-based; `col` counts characters, `offset` counts
/// bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub file: Arc<str>,
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn new(file: Arc<str>, offset: usize, line: u32, col: u32) -> Self {
        Position {
            file,
            offset,
            line,
            col,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "{}:{}", self.line, self.col)
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.col)
        }
    }
}

/// A lexed token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:?}, `{}`, {}}}", self.kind, self.lexeme, self.position)
    }
}
