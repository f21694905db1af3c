#![allow(
    clippy::result_large_err,
    reason = "EvalError carries span and backtrace; boxing would add noise across the crate"
)]
//! Structlang - a small interpreted language with generic structs and
//! closures.
//!
//! This crate wires the pipeline together:
//!
//! ```text
//! source --lex--> tokens --filter_comments--> tokens --parse--> parse tree
//!        --build_ast--> AST --evaluate--> final environment
//! ```
//!
//! A [`Session`] keeps one root environment across runs, so types and
//! variables defined by one source text are visible to the next.

use std::sync::Once;

use structlang_eval::{buffer_handler, stdout_handler, Interpreter, SharedPrintHandler};
use structlang_ir::ast;
use thiserror::Error;

pub use structlang_eval::{
    Environment, ErrorCategory, EvalConfig, EvalError, EvalErrorKind, StructType, TypeName, Value,
};
pub use structlang_lexer::{LexError, LexErrorKind};
pub use structlang_parse::{ErrorContext, ParseError, ParseErrorKind};

/// Any failure along the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// File name recorded in token positions. Empty for anonymous input.
    pub file: String,
    /// Maximum nested user function calls; `None` for no limit.
    pub max_call_depth: Option<usize>,
    /// Reject struct literals that leave a declared field unset.
    pub strict_struct_literals: bool,
    /// Collect `print`/`println` output in memory instead of writing to
    /// stdout. Read it back with [`Session::output`].
    pub capture_output: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let eval = EvalConfig::default();
        SessionConfig {
            file: String::new(),
            max_call_depth: eval.max_call_depth,
            strict_struct_literals: eval.strict_struct_literals,
            capture_output: false,
        }
    }
}

impl SessionConfig {
    fn eval_config(&self) -> EvalConfig {
        EvalConfig {
            max_call_depth: self.max_call_depth,
            strict_struct_literals: self.strict_struct_literals,
        }
    }
}

/// An interpreter plus its configuration.
pub struct Session {
    config: SessionConfig,
    interpreter: Interpreter,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let handler: SharedPrintHandler = if config.capture_output {
            buffer_handler()
        } else {
            stdout_handler()
        };
        let interpreter = Interpreter::builder()
            .config(config.eval_config())
            .print_handler(handler)
            .build();
        Session {
            config,
            interpreter,
        }
    }

    /// Run `source` against the session's root environment.
    ///
    /// Returns the value of a top-level `return`, if any. Nothing is
    /// evaluated when lexing or parsing fails.
    pub fn run_source(&mut self, source: &str) -> Result<Option<Value>, Error> {
        let program = parse_source(source, &self.config.file)?;
        Ok(self.interpreter.run(&program)?)
    }

    /// The root environment: everything defined so far.
    pub fn env(&self) -> &Environment {
        self.interpreter.global_env()
    }

    /// Captured program output. Empty unless `capture_output` is set.
    pub fn output(&self) -> String {
        self.interpreter.print_handler().output()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// Lex, filter comments, parse and build the AST.
#[tracing::instrument(level = "debug", skip(source))]
pub fn parse_source(source: &str, file: &str) -> Result<ast::Program, Error> {
    let tokens = structlang_lexer::filter_comments(structlang_lexer::lex(source, file)?);
    let tree = structlang_parse::parse(&tokens)?;
    Ok(structlang_parse::build_ast(&tree))
}

/// Run `source` once in a fresh session with default settings.
pub fn run_source(source: &str) -> Result<Session, Error> {
    let mut session = Session::default();
    session.run_source(source)?;
    Ok(session)
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
/// Enable with e.g. `RUST_LOG=structlang_eval=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the host.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
