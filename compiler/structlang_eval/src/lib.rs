#![allow(
    clippy::result_large_err,
    reason = "EvalError carries span and backtrace; boxing would add noise across the crate"
)]
//! Structlang Eval - tree-walking evaluator over the semantic AST.
//!
//! # Architecture
//!
//! - `Environment`: parent-linked lexical scopes holding types and variables
//! - `types`: type names, struct templates and `instantiate`
//! - `Value`: closed set of runtime values
//! - `evaluate_prefix` / `evaluate_infix`: operator dispatch by capability
//! - `Builtin`: `print` and `println`
//! - `Interpreter`: statement execution and the call protocol

mod builtins;
mod call_stack;
mod environment;
pub mod errors;
mod eval_config;
pub mod interpreter;
mod operators;
mod print_handler;
pub mod types;
mod value;

pub use builtins::Builtin;
pub use call_stack::{CallFrame, CallStack};
pub use environment::{AssignError, Environment, LocalScope};
pub use errors::{BacktraceFrame, ErrorCategory, EvalBacktrace, EvalError, EvalErrorKind};
pub use eval_config::EvalConfig;
pub use interpreter::{ExecOutcome, Interpreter, InterpreterBuilder};
pub use operators::{evaluate_infix, evaluate_prefix, Capability};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandlerImpl, SharedPrintHandler,
};
pub use types::{instantiate, Instantiation, StructType, TypeName};
pub use value::{FuncValue, StructValue, Value};

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;
