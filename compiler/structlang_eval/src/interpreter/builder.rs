//! `InterpreterBuilder` for creating interpreters with non-default settings.

use super::Interpreter;
use crate::call_stack::CallStack;
use crate::{stdout_handler, Environment, EvalConfig, SharedPrintHandler};

/// Builder for [`Interpreter`].
///
/// ```text
/// let interp = InterpreterBuilder::new()
///     .max_call_depth(Some(64))
///     .print_handler(buffer_handler())
///     .build();
/// ```
#[derive(Default)]
pub struct InterpreterBuilder {
    config: EvalConfig,
    env: Option<Environment>,
    print_handler: Option<SharedPrintHandler>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, limit: Option<usize>) -> Self {
        self.config.max_call_depth = limit;
        self
    }

    #[must_use]
    pub fn strict_struct_literals(mut self, strict: bool) -> Self {
        self.config.strict_struct_literals = strict;
        self
    }

    /// Where `print` and `println` write. Defaults to stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Start from an existing root environment instead of an empty one.
    #[must_use]
    pub fn env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            env: self.env.unwrap_or_default(),
            call_stack: CallStack::new(self.config.max_call_depth),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            config: self.config,
        }
    }
}
