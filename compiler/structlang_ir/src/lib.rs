//! structlang IR
//!
//! Data shared between the lexer, parser and evaluator:
//! - Tokens and source positions
//! - Operator precedence levels
//! - The concrete parse tree, which keeps every token
//! - The semantic AST, which keeps only first/last token spans
//!
//! The two trees are deliberately separate types; `structlang_parse` joins
//! them with a single pure transform.

pub mod ast;
pub mod parse_tree;
mod precedence;
mod span;
mod token;

pub use precedence::Precedence;
pub use span::Span;
pub use token::{Position, Token, TokenKind};
