//! Operator table for the precedence-climbing expression parser.
//!
//! Each token kind may have a prefix parselet (starts an expression) and an
//! infix parselet (continues one). The table is data; the parsing routines
//! the parselets name live in `grammar::expr`.

use rustc_hash::FxHashMap;
use structlang_ir::{Precedence, TokenKind};

/// Routine that begins an expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrefixParselet {
    /// int, float, string, bool and nil literals.
    Literal,
    /// Bare identifier, struct literal, or field-access chain.
    Ident,
    /// `( expr )`
    Grouping,
    /// Unary operator; the operand is parsed at the given precedence.
    Operator(Precedence),
    /// `func(params) [Type] { body }`
    FuncDef,
}

/// Routine that continues an expression given its left-hand side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InfixParselet {
    Binary {
        precedence: Precedence,
        right_assoc: bool,
    },
    /// Postfix `(args)`.
    Call,
}

impl InfixParselet {
    #[inline]
    pub fn precedence(self) -> Precedence {
        match self {
            InfixParselet::Binary { precedence, .. } => precedence,
            InfixParselet::Call => Precedence::Call,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct OperatorTable {
    prefix: FxHashMap<TokenKind, PrefixParselet>,
    infix: FxHashMap<TokenKind, InfixParselet>,
}

impl OperatorTable {
    /// A table with no rules at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The language's operator set.
    pub fn standard() -> Self {
        let mut table = Self::empty();

        table
            .prefix_operator(TokenKind::Plus, Precedence::Prefix)
            .prefix_operator(TokenKind::Minus, Precedence::Prefix)
            .prefix_operator(TokenKind::Not, Precedence::Prefix);

        table
            .infix_left(TokenKind::Plus, Precedence::Sum)
            .infix_left(TokenKind::Minus, Precedence::Sum)
            .infix_left(TokenKind::Star, Precedence::Product)
            .infix_left(TokenKind::Slash, Precedence::Product)
            .infix_left(TokenKind::Gt, Precedence::Comparison)
            .infix_left(TokenKind::GtEq, Precedence::Comparison)
            .infix_left(TokenKind::Lt, Precedence::Comparison)
            .infix_left(TokenKind::LtEq, Precedence::Comparison)
            .infix_left(TokenKind::EqEq, Precedence::Comparison)
            .infix_left(TokenKind::And, Precedence::Logical)
            .infix_left(TokenKind::Or, Precedence::Logical);

        for kind in TokenKind::LITERALS {
            table.register_prefix(kind, PrefixParselet::Literal);
        }
        table
            .register_prefix(TokenKind::Ident, PrefixParselet::Ident)
            .register_prefix(TokenKind::LParen, PrefixParselet::Grouping)
            .register_prefix(TokenKind::Func, PrefixParselet::FuncDef)
            .register_infix(TokenKind::LParen, InfixParselet::Call);

        table
    }

    pub fn register_prefix(&mut self, kind: TokenKind, parselet: PrefixParselet) -> &mut Self {
        self.prefix.insert(kind, parselet);
        self
    }

    pub fn register_infix(&mut self, kind: TokenKind, parselet: InfixParselet) -> &mut Self {
        self.infix.insert(kind, parselet);
        self
    }

    pub fn prefix_operator(&mut self, kind: TokenKind, precedence: Precedence) -> &mut Self {
        self.register_prefix(kind, PrefixParselet::Operator(precedence))
    }

    pub fn infix_left(&mut self, kind: TokenKind, precedence: Precedence) -> &mut Self {
        self.register_infix(
            kind,
            InfixParselet::Binary {
                precedence,
                right_assoc: false,
            },
        )
    }

    pub fn infix_right(&mut self, kind: TokenKind, precedence: Precedence) -> &mut Self {
        self.register_infix(
            kind,
            InfixParselet::Binary {
                precedence,
                right_assoc: true,
            },
        )
    }

    #[inline]
    pub fn prefix(&self, kind: TokenKind) -> Option<PrefixParselet> {
        self.prefix.get(&kind).copied()
    }

    #[inline]
    pub fn infix(&self, kind: TokenKind) -> Option<InfixParselet> {
        self.infix.get(&kind).copied()
    }

    /// Precedence of the infix rule for `kind`, or `Bottom` if none.
    pub fn infix_precedence(&self, kind: TokenKind) -> Precedence {
        self.infix(kind)
            .map_or(Precedence::Bottom, InfixParselet::precedence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_levels() {
        let table = OperatorTable::standard();
        assert_eq!(table.infix_precedence(TokenKind::Star), Precedence::Product);
        assert_eq!(table.infix_precedence(TokenKind::Minus), Precedence::Sum);
        assert_eq!(table.infix_precedence(TokenKind::EqEq), Precedence::Comparison);
        assert_eq!(table.infix_precedence(TokenKind::Or), Precedence::Logical);
        assert_eq!(table.infix_precedence(TokenKind::LParen), Precedence::Call);
        assert_eq!(table.infix_precedence(TokenKind::Semicolon), Precedence::Bottom);
    }

    #[test]
    fn a_token_can_be_both_prefix_and_infix() {
        let table = OperatorTable::standard();
        assert_eq!(
            table.prefix(TokenKind::Minus),
            Some(PrefixParselet::Operator(Precedence::Prefix))
        );
        assert!(table.infix(TokenKind::Minus).is_some());
        assert_eq!(table.prefix(TokenKind::LParen), Some(PrefixParselet::Grouping));
        assert_eq!(table.infix(TokenKind::LParen), Some(InfixParselet::Call));
    }

    #[test]
    fn literals_registered() {
        let table = OperatorTable::standard();
        for kind in TokenKind::LITERALS {
            assert_eq!(table.prefix(kind), Some(PrefixParselet::Literal));
        }
        assert_eq!(table.prefix(TokenKind::Semicolon), None);
    }
}
