//! Live call stack.
//!
//! Every user function call pushes a frame and pops it on return. The depth
//! limit is checked on push, and a snapshot of the frames becomes the
//! backtrace attached to errors raised inside calls.

use structlang_ir::Span;

use crate::errors::{recursion_limit_exceeded, BacktraceFrame, EvalBacktrace, EvalError};

#[derive(Clone, Debug)]
pub struct CallFrame {
    /// Name the callee was reached through, e.g. `fib` or `obj->method`.
    pub name: String,
    /// Location of the call expression.
    pub call_span: Option<Span>,
}

#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `None` means no depth limit.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame. Fails without pushing when the limit is reached.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Snapshot of the frames, most recent call first.
    pub fn capture(&self) -> EvalBacktrace {
        EvalBacktrace::new(
            self.frames
                .iter()
                .rev()
                .map(|frame| BacktraceFrame {
                    name: frame.name.clone(),
                    span: frame.call_span.clone(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EvalErrorKind;

    fn frame(name: &str) -> CallFrame {
        CallFrame {
            name: name.to_string(),
            call_span: None,
        }
    }

    #[test]
    fn push_pop_depth() {
        let mut stack = CallStack::new(None);
        assert!(stack.is_empty());
        assert!(stack.push(frame("a")).is_ok());
        assert!(stack.push(frame("b")).is_ok());
        assert_eq!(stack.depth(), 2);
        stack.pop();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn limit_is_enforced_before_push() {
        let mut stack = CallStack::new(Some(2));
        assert!(stack.push(frame("a")).is_ok());
        assert!(stack.push(frame("b")).is_ok());
        let err = stack.push(frame("c")).err();
        assert_eq!(
            err.map(|e| e.kind),
            Some(EvalErrorKind::RecursionLimitExceeded { limit: 2 })
        );
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn capture_is_most_recent_first() {
        let mut stack = CallStack::new(None);
        assert!(stack.push(frame("outer")).is_ok());
        assert!(stack.push(frame("inner")).is_ok());
        let names: Vec<String> = stack
            .capture()
            .frames()
            .iter()
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(names, vec!["inner".to_string(), "outer".to_string()]);
        assert!(CallStack::new(None).capture().is_empty());
    }
}
