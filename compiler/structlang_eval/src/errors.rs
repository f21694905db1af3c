//! Evaluation errors.
//!
//! `EvalErrorKind` names what went wrong; `EvalError` adds the span of the
//! node being evaluated and, inside function calls, a snapshot of the call
//! stack. Kinds are grouped into type errors and runtime errors.

use std::fmt;

use structlang_ir::Span;
use thiserror::Error;

/// Broad class of an evaluation error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A runtime value did not have the type a construct requires, or a name
    /// did not resolve.
    Type,
    /// Evaluation could not continue for a reason unrelated to types.
    Runtime,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    // Type errors
    #[error("type `{name}` not found")]
    UndefinedType { name: String },

    #[error("variable `{name}` not defined")]
    UndefinedVariable { name: String },

    #[error("type `{type_name}` takes {expected} type argument(s), got {found}")]
    TypeArgumentArity {
        type_name: String,
        expected: usize,
        found: usize,
    },

    #[error("field `{field}` not found in type `{type_name}`")]
    UnknownField { type_name: String, field: String },

    #[error("unexpected type for field `{field}`: got `{found}`, want `{expected}`")]
    FieldTypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("struct literal for `{type_name}` is missing field `{field}`")]
    MissingField { type_name: String, field: String },

    #[error("cannot set `{name}` of type `{expected}` to a value of type `{found}`")]
    SetTypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("unsupported operator `{op}` for operand type `{operand}`")]
    UnsupportedPrefix { op: String, operand: String },

    #[error("unsupported operator `{op}` for operand types `{left}` and `{right}`")]
    UnsupportedInfix {
        op: String,
        left: String,
        right: String,
    },

    #[error("function `{callee}` takes {expected} argument(s), got {found}")]
    ArgumentCount {
        callee: String,
        expected: usize,
        found: usize,
    },

    #[error("argument `{param}` of `{callee}` wants `{expected}`, got `{found}`")]
    ArgumentType {
        callee: String,
        param: String,
        expected: String,
        found: String,
    },

    #[error("`{name}` is a `{type_name}`, not a function")]
    NotCallable { name: String, type_name: String },

    #[error("cannot set field `{field}` on a value of type `{type_name}`")]
    InvalidAssignmentTarget { field: String, type_name: String },

    // Runtime errors
    #[error("integer overflow in `{op}`")]
    IntegerOverflow { op: String },

    #[error("maximum recursion depth exceeded (limit: {limit})")]
    RecursionLimitExceeded { limit: usize },

    #[error("invalid literal `{lexeme}`")]
    InvalidLiteral { lexeme: String },
}

impl EvalErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IntegerOverflow { .. }
            | Self::RecursionLimitExceeded { .. }
            | Self::InvalidLiteral { .. } => ErrorCategory::Runtime,
            _ => ErrorCategory::Type,
        }
    }
}

/// A single frame in a captured backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Name the function was called through.
    pub name: String,
    /// Location of the call site.
    pub span: Option<Span>,
}

/// Snapshot of the call stack at an error site, most recent call first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(span) = &frame.span {
                write!(f, " at {span}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Span of the innermost node that failed.
    pub span: Option<Span>,
    /// Active calls when the error was raised, if any.
    pub backtrace: Option<EvalBacktrace>,
}

impl EvalError {
    #[cold]
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            span: None,
            backtrace: None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Attach `span` unless a more precise one is already set.
    #[must_use]
    pub fn with_span(mut self, span: &Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span.clone());
        }
        self
    }

    /// Attach a backtrace unless one was captured deeper in the stack.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.backtrace.is_none() && !backtrace.is_empty() {
            self.backtrace = Some(backtrace);
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(span) = &self.span {
            write!(f, " at {span}")?;
        }
        if let Some(backtrace) = &self.backtrace {
            write!(f, "\n{backtrace}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::from_kind(kind)
    }
}

// Factory functions

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_type(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedType {
        name: name.to_string(),
    })
}

#[cold]
pub fn recursion_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimitExceeded { limit })
}

#[cold]
pub fn integer_overflow(op: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { op: op.to_string() })
}
