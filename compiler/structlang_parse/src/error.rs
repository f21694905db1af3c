//! Parse errors.
//!
//! A parse error is a cause (`ParseErrorKind`), the position of the token
//! that triggered it, and the chain of grammar rules that were active. Rules
//! add themselves to the chain as the error propagates outward, so the
//! innermost rule is recorded first.

use std::fmt;

use structlang_ir::{Position, Token, TokenKind};
use thiserror::Error;

/// Grammar rule that was being parsed when an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    // Statements
    Stmt,
    TypeDef,
    VarDef,
    VarSet,
    ReturnStmt,
    ExprStmt,
    Lvalue,

    // Types
    Type,
    TypeArgs,
    TypeParams,
    StructDef,
    StructFields,
    NameList,

    // Expressions
    PrefixOperator,
    InfixOperator,
    Grouping,
    StructLiteral,
    StructLiteralFields,
    FieldAccess,
    Call,
    FuncDef,
    FuncParams,
    FuncBody,
}

impl ErrorContext {
    /// Short rule name, used as "in {description}".
    pub fn description(self) -> &'static str {
        match self {
            Self::Stmt => "stmt",
            Self::TypeDef => "typedef",
            Self::VarDef => "vardef",
            Self::VarSet => "varset",
            Self::ReturnStmt => "return stmt",
            Self::ExprStmt => "expr stmt",
            Self::Lvalue => "lvalue",

            Self::Type => "type",
            Self::TypeArgs => "type arguments",
            Self::TypeParams => "type parameters",
            Self::StructDef => "structdef",
            Self::StructFields => "struct fields",
            Self::NameList => "name list",

            Self::PrefixOperator => "prefix operator",
            Self::InfixOperator => "infix operator",
            Self::Grouping => "grouping",
            Self::StructLiteral => "struct literal",
            Self::StructLiteralFields => "struct literal fields",
            Self::FieldAccess => "field access",
            Self::Call => "function call",
            Self::FuncDef => "function literal",
            Self::FuncParams => "function parameters",
            Self::FuncBody => "function body",
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in {}", self.description())
    }
}

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found `{found}`")]
    UnexpectedToken { expected: String, found: String },

    #[error("no prefix rule for token `{found}`")]
    NoPrefixRule { found: String },

    #[error("no infix rule for token `{found}`")]
    NoInfixRule { found: String },

    #[error("expected an identifier or field access as the callee of a call")]
    CalleeNotLvalue,

    #[error("a struct field needs at least one name")]
    EmptyNameList,

    #[error("out of tokens")]
    OutOfTokens,
}

/// A parse failure with its rule chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Option<Position>,
    /// Active rules, innermost first.
    pub context: Vec<ErrorContext>,
}

impl ParseError {
    #[cold]
    pub fn new(kind: ParseErrorKind, position: Option<Position>) -> Self {
        ParseError {
            kind,
            position,
            context: Vec::new(),
        }
    }

    #[cold]
    pub fn unexpected(expected: &[TokenKind], found: &Token) -> Self {
        let expected = match expected {
            [single] => format!("`{single}`"),
            many => many
                .iter()
                .map(|kind| format!("`{kind}`"))
                .collect::<Vec<_>>()
                .join(" or "),
        };
        Self::unexpected_described(expected, found)
    }

    #[cold]
    pub fn unexpected_described(expected: impl Into<String>, found: &Token) -> Self {
        ParseError::new(
            ParseErrorKind::UnexpectedToken {
                expected: expected.into(),
                found: found_text(found),
            },
            Some(found.position.clone()),
        )
    }

    #[cold]
    pub fn no_prefix_rule(found: &Token) -> Self {
        ParseError::new(
            ParseErrorKind::NoPrefixRule {
                found: found_text(found),
            },
            Some(found.position.clone()),
        )
    }

    #[cold]
    pub fn no_infix_rule(found: &Token) -> Self {
        ParseError::new(
            ParseErrorKind::NoInfixRule {
                found: found_text(found),
            },
            Some(found.position.clone()),
        )
    }

    /// Record that the error passed through `ctx`.
    #[must_use]
    pub fn in_context(mut self, ctx: ErrorContext) -> Self {
        self.context.push(ctx);
        self
    }

    /// Active rules, outermost first.
    pub fn context_chain(&self) -> impl Iterator<Item = ErrorContext> + '_ {
        self.context.iter().rev().copied()
    }
}

fn found_text(tok: &Token) -> String {
    if tok.kind == TokenKind::Eof {
        tok.kind.display_name().to_string()
    } else {
        tok.lexeme.clone()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ctx in self.context_chain() {
            write!(f, "{ctx}: ")?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(position) = &self.position {
            write!(f, " at {position}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
