// Error taxonomy for equivalence testing
//
// Two kinds only: the caller handed us something outside the preconditions,
// or the numbers went degenerate while computing. Neither is retried.

use thiserror::Error;

/// Errors produced by the equivalence test engine and its inputs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquivalenceError {
    /// A precondition on sizes, standard deviations, bounds or alpha was violated
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Standard error was zero/non-finite, or the t distribution could not be evaluated
    #[error("Numerical error: {0}")]
    Numerical(String),
}

impl EquivalenceError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn numerical(msg: impl Into<String>) -> Self {
        Self::Numerical(msg.into())
    }

    /// True for precondition violations
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type for equivalence operations
pub type Result<T> = std::result::Result<T, EquivalenceError>;
