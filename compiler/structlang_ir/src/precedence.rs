/// Binding strength of an operator, weakest first.
///
/// The derived `Ord` follows declaration order, so `Bottom < Logical <
/// Comparison < Sum < Product < Prefix < Call`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Precedence {
    Bottom,
    Logical,
    Comparison,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    /// One level weaker, saturating at `Bottom`.
    ///
    /// Right-associative operators parse their right operand at this level so
    /// an operator of the same strength binds again on the right.
    #[must_use]
    pub fn weaker(self) -> Precedence {
        match self {
            Precedence::Bottom | Precedence::Logical => Precedence::Bottom,
            Precedence::Comparison => Precedence::Logical,
            Precedence::Sum => Precedence::Comparison,
            Precedence::Product => Precedence::Sum,
            Precedence::Prefix => Precedence::Product,
            Precedence::Call => Precedence::Prefix,
        }
    }
}
