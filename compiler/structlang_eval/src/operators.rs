//! Prefix and infix operators.
//!
//! Each operator demands a capability from its operands, and each value kind
//! supports a fixed set of capabilities. Dispatch is a match on the
//! capability and the operand kinds; a combination with no arm is an
//! unsupported-operator error. Both operands of an infix operator must be of
//! the same kind.

use structlang_ir::ast::{InfixOp, PrefixOp};

use crate::errors::{integer_overflow, EvalError, EvalErrorKind};
use crate::value::Value;
use crate::EvalResult;

/// What an operator asks of its operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Unary `+` and `-`.
    Neg,
    /// `+` and `-`.
    Sum,
    /// `*` and `/`.
    Product,
    /// `>`, `>=`, `<`, `<=` and `==`.
    Cmp,
    /// `not`, `and` and `or`.
    Log,
}

impl Capability {
    pub fn of_prefix(op: PrefixOp) -> Capability {
        match op {
            PrefixOp::Pos | PrefixOp::Neg => Capability::Neg,
            PrefixOp::Not => Capability::Log,
        }
    }

    pub fn of_infix(op: InfixOp) -> Capability {
        match op {
            InfixOp::Add | InfixOp::Sub => Capability::Sum,
            InfixOp::Mul | InfixOp::Div => Capability::Product,
            InfixOp::Gt | InfixOp::GtEq | InfixOp::Lt | InfixOp::LtEq | InfixOp::Eq => {
                Capability::Cmp
            }
            InfixOp::And | InfixOp::Or => Capability::Log,
        }
    }

    /// Whether values of `value`'s kind support this capability.
    pub fn supported_by(self, value: &Value) -> bool {
        match value {
            Value::Int(_) | Value::Float(_) => !matches!(self, Capability::Log),
            Value::Str(_) => matches!(self, Capability::Sum | Capability::Cmp),
            Value::Bool(_) => matches!(self, Capability::Log),
            Value::Nil | Value::Struct(_) | Value::Func(_) => false,
        }
    }
}

#[cold]
fn unsupported_prefix(op: PrefixOp, operand: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedPrefix {
        op: op.as_symbol().to_string(),
        operand: operand.type_name(),
    })
}

#[cold]
fn unsupported_infix(op: InfixOp, left: &Value, right: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedInfix {
        op: op.as_symbol().to_string(),
        left: left.type_name(),
        right: right.type_name(),
    })
}

pub fn evaluate_prefix(op: PrefixOp, operand: &Value) -> EvalResult {
    match (Capability::of_prefix(op), operand) {
        (Capability::Neg, Value::Int(n)) => match op {
            PrefixOp::Neg => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| integer_overflow("-")),
            _ => Ok(Value::Int(*n)),
        },
        (Capability::Neg, Value::Float(x)) => match op {
            PrefixOp::Neg => Ok(Value::Float(-x)),
            _ => Ok(Value::Float(*x)),
        },
        (Capability::Log, Value::Bool(b)) => Ok(Value::Bool(!b)),
        _ => Err(unsupported_prefix(op, operand)),
    }
}

pub fn evaluate_infix(op: InfixOp, left: &Value, right: &Value) -> EvalResult {
    let capability = Capability::of_infix(op);
    if !capability.supported_by(left) || !capability.supported_by(right) {
        return Err(unsupported_infix(op, left, right));
    }
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => Ok(eval_float(op, *a, *b)),
        (Value::Str(a), Value::Str(b)) => Ok(eval_str(op, a, b)),
        (Value::Bool(a), Value::Bool(b)) => Ok(eval_bool(op, *a, *b)),
        _ => Err(unsupported_infix(op, left, right)),
    }
}

fn checked(result: Option<i64>, op: InfixOp) -> EvalResult {
    result
        .map(Value::Int)
        .ok_or_else(|| integer_overflow(op.as_symbol()))
}

fn eval_int(op: InfixOp, a: i64, b: i64) -> EvalResult {
    match op {
        InfixOp::Add => checked(a.checked_add(b), op),
        InfixOp::Sub => checked(a.checked_sub(b), op),
        InfixOp::Mul => checked(a.checked_mul(b), op),
        // Division by zero is defined as zero.
        InfixOp::Div if b == 0 => Ok(Value::Int(0)),
        InfixOp::Div => checked(a.checked_div(b), op),
        _ => Ok(Value::Bool(compare(op, &a, &b))),
    }
}

fn eval_float(op: InfixOp, a: f64, b: f64) -> Value {
    match op {
        InfixOp::Add => Value::Float(a + b),
        InfixOp::Sub => Value::Float(a - b),
        InfixOp::Mul => Value::Float(a * b),
        InfixOp::Div => Value::Float(a / b),
        _ => Value::Bool(compare(op, &a, &b)),
    }
}

fn eval_str(op: InfixOp, a: &str, b: &str) -> Value {
    match op {
        InfixOp::Add => Value::from(format!("{a}{b}")),
        InfixOp::Sub if b.is_empty() => Value::from(a),
        InfixOp::Sub => Value::from(a.replace(b, "")),
        _ => Value::Bool(compare(op, &a, &b)),
    }
}

/// Both operands are always evaluated before this is reached.
fn eval_bool(op: InfixOp, a: bool, b: bool) -> Value {
    match op {
        InfixOp::Or => Value::Bool(a || b),
        _ => Value::Bool(a && b),
    }
}

fn compare<T: PartialOrd>(op: InfixOp, a: &T, b: &T) -> bool {
    match op {
        InfixOp::Gt => a > b,
        InfixOp::GtEq => a >= b,
        InfixOp::Lt => a < b,
        InfixOp::LtEq => a <= b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

    use pretty_assertions::assert_eq;

    use super::*;

    fn ints(op: InfixOp, a: i64, b: i64) -> EvalResult {
        evaluate_infix(op, &Value::Int(a), &Value::Int(b))
    }

    fn strs(op: InfixOp, a: &str, b: &str) -> EvalResult {
        evaluate_infix(op, &Value::from(a), &Value::from(b))
    }

    fn bools(op: InfixOp, a: bool, b: bool) -> EvalResult {
        evaluate_infix(op, &Value::Bool(a), &Value::Bool(b))
    }

    mod int {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn arithmetic() {
            assert_eq!(ints(InfixOp::Add, 2, 3).unwrap(), Value::Int(5));
            assert_eq!(ints(InfixOp::Sub, 2, 3).unwrap(), Value::Int(-1));
            assert_eq!(ints(InfixOp::Mul, 4, 3).unwrap(), Value::Int(12));
            assert_eq!(ints(InfixOp::Div, 7, 2).unwrap(), Value::Int(3));
        }

        #[test]
        fn division_by_zero_is_zero() {
            assert_eq!(ints(InfixOp::Div, 10, 0).unwrap(), Value::Int(0));
        }

        #[test]
        fn overflow_is_an_error() {
            let err = ints(InfixOp::Add, i64::MAX, 1).unwrap_err();
            assert_eq!(
                err.kind,
                EvalErrorKind::IntegerOverflow { op: "+".to_string() }
            );
            assert!(ints(InfixOp::Div, i64::MIN, -1).is_err());
            assert!(evaluate_prefix(PrefixOp::Neg, &Value::Int(i64::MIN)).is_err());
        }

        #[test]
        fn comparisons() {
            assert_eq!(ints(InfixOp::Gt, 2, 1).unwrap(), Value::Bool(true));
            assert_eq!(ints(InfixOp::LtEq, 2, 2).unwrap(), Value::Bool(true));
            assert_eq!(ints(InfixOp::Eq, 2, 3).unwrap(), Value::Bool(false));
        }

        #[test]
        fn prefix() {
            assert_eq!(
                evaluate_prefix(PrefixOp::Neg, &Value::Int(4)).unwrap(),
                Value::Int(-4)
            );
            assert_eq!(
                evaluate_prefix(PrefixOp::Pos, &Value::Int(4)).unwrap(),
                Value::Int(4)
            );
        }
    }

    mod float {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn arithmetic_follows_ieee() {
            let v = evaluate_infix(InfixOp::Div, &Value::Float(1.0), &Value::Float(0.0)).unwrap();
            assert_eq!(v, Value::Float(f64::INFINITY));
            let v = evaluate_infix(InfixOp::Mul, &Value::Float(1.5), &Value::Float(2.0)).unwrap();
            assert_eq!(v, Value::Float(3.0));
        }

        #[test]
        fn mixed_with_int_is_unsupported() {
            let err = evaluate_infix(InfixOp::Add, &Value::Int(1), &Value::Float(1.0)).unwrap_err();
            assert_eq!(
                err.kind,
                EvalErrorKind::UnsupportedInfix {
                    op: "+".to_string(),
                    left: "int".to_string(),
                    right: "float".to_string(),
                }
            );
        }
    }

    mod string {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn concatenation_and_removal() {
            assert_eq!(strs(InfixOp::Add, "ab", "cd").unwrap(), Value::from("abcd"));
            assert_eq!(strs(InfixOp::Sub, "banana", "an").unwrap(), Value::from("ba"));
            assert_eq!(strs(InfixOp::Sub, "abc", "").unwrap(), Value::from("abc"));
        }

        #[test]
        fn lexicographic_comparison() {
            assert_eq!(strs(InfixOp::Lt, "apple", "banana").unwrap(), Value::Bool(true));
            assert_eq!(strs(InfixOp::Eq, "a", "a").unwrap(), Value::Bool(true));
        }

        #[test]
        fn no_product_or_negation() {
            assert!(strs(InfixOp::Mul, "a", "b").is_err());
            assert!(evaluate_prefix(PrefixOp::Neg, &Value::from("a")).is_err());
        }
    }

    mod logic {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn and_or_not() {
            assert_eq!(bools(InfixOp::And, true, false).unwrap(), Value::Bool(false));
            assert_eq!(bools(InfixOp::Or, true, false).unwrap(), Value::Bool(true));
            assert_eq!(
                evaluate_prefix(PrefixOp::Not, &Value::Bool(false)).unwrap(),
                Value::Bool(true)
            );
        }

        #[test]
        fn bools_do_not_compare() {
            assert!(bools(InfixOp::Eq, true, true).is_err());
            assert!(bools(InfixOp::Add, true, true).is_err());
        }

        #[test]
        fn ints_are_not_logical() {
            assert!(ints(InfixOp::And, 1, 0).is_err());
            assert!(evaluate_prefix(PrefixOp::Not, &Value::Int(1)).is_err());
        }
    }

    #[test]
    fn nil_supports_nothing() {
        for cap in [
            Capability::Neg,
            Capability::Sum,
            Capability::Product,
            Capability::Cmp,
            Capability::Log,
        ] {
            assert!(!cap.supported_by(&Value::Nil));
        }
    }
}
