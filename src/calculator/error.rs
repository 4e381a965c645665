//! Error types for expression evaluation and scientific functions.

use thiserror::Error;

/// A binary expression could not be evaluated.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("expression ends with a dangling operator")]
    UnexpectedEnd,

    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    /// Division by zero and overflow land here instead of producing
    /// `inf` or `NaN`.
    #[error("result is not a finite number")]
    NonFinite,
}

/// A scientific function was applied outside its domain.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("square root of negative number {0}")]
    NegativeRoot(f64),

    #[error("logarithm of non-positive number {0}")]
    NonPositiveLog(f64),

    #[error("{function} of {input} is not a finite number")]
    NonFinite { function: &'static str, input: f64 },

    #[error("'{0}' is not a number")]
    NotANumber(String),
}

/// Any failure that puts the calculator into its error state.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CalcError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CalcError {
    /// Check if this error came from a scientific function.
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}
