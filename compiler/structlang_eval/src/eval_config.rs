//! Evaluator configuration.

/// Call depth allowed when no limit is configured explicitly.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum number of nested user function calls. `None` disables the
    /// check; native stack growth still protects deep nesting.
    pub max_call_depth: Option<usize>,
    /// Require struct literals to supply every declared field.
    pub strict_struct_literals: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
            strict_struct_literals: false,
        }
    }
}
