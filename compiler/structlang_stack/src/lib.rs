//! Stack safety for the recursive parser and tree-walking evaluator.
//!
//! Parsing and evaluation both recurse once per level of expression and
//! block nesting, so a deeply nested program can exhaust the native stack
//! long before any semantic limit is reached. Wrapping the recursive entry
//! points in [`ensure_sufficient_stack`] grows the stack on demand instead.
//!
//! - **Native targets**: `stacker::maybe_grow` with a 128KB red zone and
//!   1MB segments.
//! - **WASM targets**: plain call.
//!
//! Call depth (as opposed to raw stack usage) is bounded separately by the
//! evaluator's call stack.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// ```text
/// fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
///     ensure_sufficient_stack(|| self.eval_expr_inner(expr))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
