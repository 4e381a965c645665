//! Calculator core.
//!
//! This module provides functionality to:
//! - Track button input in a small state machine
//! - Evaluate arithmetic expressions with a recursive-descent parser
//! - Apply single-operand scientific functions
//! - Format results for the display

mod detection;
mod error;
mod evaluation;
mod keys;
mod parser;
mod scientific;
mod state;

pub use detection::{is_numeric_fragment, normalize_glyphs};
pub use error::{CalcError, DomainError, EvaluationError};
pub use evaluation::{DEFAULT_DECIMALS, Evaluation, evaluate_expression, format_result};
pub use keys::{Constant, Key, Operator};
pub use scientific::ScientificFn;
pub use state::{
    CalcMode, Calculator, DEFAULT_ERROR_INDICATOR, InputState, Outcome, ResetTicket, Settings,
};
