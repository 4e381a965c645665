//! MathFlow: a standard and scientific calculator core.
//!
//! The [`calculator`] module holds the input state machine and the safe
//! arithmetic evaluator, [`history`] the rolling list of results, and
//! [`session`] ties the two together with the timed reset that follows a
//! failed calculation.

pub mod calculator;
pub mod config;
pub mod history;
pub mod session;

pub use calculator::{CalcError, CalcMode, Calculator, InputState, Key, Outcome};
pub use config::{Config, load_config};
pub use history::{HistoryEntry, HistoryLog};
pub use session::{Session, SessionOptions};
