//! Lexer for structlang using logos.
//!
//! Produces a flat `Vec<Token>` terminated by an `Eof` token. Comments are
//! kept as `Comment` tokens; the parser expects them removed with
//! [`filter_comments`] first.

mod escape;
mod lex_error;

use std::sync::Arc;

use logos::Logos;
use structlang_ir::{Position, Token, TokenKind};

pub use escape::unescape_string;
pub use lex_error::{LexError, LexErrorKind};

/// Raw token from logos, before positions are attached.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("struct")]
    Struct,
    #[token("type")]
    Type,
    #[token("let")]
    Let,
    #[token("set")]
    Set,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,
    #[token("func")]
    Func,
    #[token("return")]
    Return,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(".")]
    Period,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("->")]
    Arrow,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,

    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+\.[0-9]+")]
    Float,
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    // A string that never closes; the terminated form always matches longer.
    #[regex(r#""([^"\\]|\\.)*"#)]
    UnterminatedString,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

impl RawToken {
    fn kind(self) -> TokenKind {
        match self {
            RawToken::LineComment => TokenKind::Comment,
            RawToken::Struct => TokenKind::Struct,
            RawToken::Type => TokenKind::Type,
            RawToken::Let => TokenKind::Let,
            RawToken::Set => TokenKind::Set,
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,
            RawToken::Nil => TokenKind::Nil,
            RawToken::Func => TokenKind::Func,
            RawToken::Return => TokenKind::Return,
            RawToken::And => TokenKind::And,
            RawToken::Or => TokenKind::Or,
            RawToken::Not => TokenKind::Not,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::Period => TokenKind::Period,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Colon => TokenKind::Colon,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Gt => TokenKind::Gt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Int => TokenKind::Int,
            RawToken::Float => TokenKind::Float,
            RawToken::String | RawToken::UnterminatedString => TokenKind::String,
            RawToken::Ident => TokenKind::Ident,
        }
    }
}

/// Converts byte offsets to 1-based line/column positions.
///
/// Offsets must be requested in ascending order; the tracker only walks
/// forward.
struct LineTracker<'src> {
    source: &'src str,
    file: Arc<str>,
    offset: usize,
    line: u32,
    col: u32,
}

impl<'src> LineTracker<'src> {
    fn new(source: &'src str, file: Arc<str>) -> Self {
        LineTracker {
            source,
            file,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    fn position_at(&mut self, target: usize) -> Position {
        let target = target.min(self.source.len());
        if target > self.offset {
            for c in self.source[self.offset..target].chars() {
                if c == '\n' {
                    self.line += 1;
                    self.col = 1;
                } else {
                    self.col += 1;
                }
            }
            self.offset = target;
        }
        Position::new(Arc::clone(&self.file), self.offset, self.line, self.col)
    }
}

/// Lex `source` into tokens, ending with `Eof`.
///
/// `file` names the source in positions; pass `""` for anonymous input.
#[tracing::instrument(level = "debug", skip_all, fields(file = file))]
pub fn lex(source: &str, file: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lines = LineTracker::new(source, Arc::from(file));
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let span = logos.span();
        let slice = logos.slice();
        let position = lines.position_at(span.start);
        match result {
            Ok(RawToken::UnterminatedString) => {
                return Err(LexError::new(LexErrorKind::UnterminatedString, position));
            }
            Ok(raw) => tokens.push(Token::new(raw.kind(), slice, position)),
            Err(()) => {
                let found = slice.chars().next().unwrap_or('\0');
                return Err(LexError::new(LexErrorKind::UnexpectedChar(found), position));
            }
        }
    }

    let eof = lines.position_at(source.len());
    tokens.push(Token::new(TokenKind::Eof, "", eof));
    tracing::debug!(count = tokens.len(), "lexed");
    Ok(tokens)
}

/// Drop every `Comment` token, keeping the rest in order.
pub fn filter_comments(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|tok| tok.kind != TokenKind::Comment)
        .collect()
}
