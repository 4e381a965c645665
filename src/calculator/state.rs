//! The calculator's input state machine.
//!
//! Tracks the operand being typed, the pending left-hand side of the
//! expression and whether the next digit starts a new number. Every key
//! press is a synchronous transition; the only deferred behavior (the
//! auto-clear after a failure) is handed back to the caller as a
//! [`ResetTicket`] that goes stale as soon as another key is pressed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::detection::{has_decimal_point, is_numeric_fragment};
use super::error::CalcError;
use super::evaluation::{DEFAULT_DECIMALS, evaluate_expression, format_result};
use super::keys::{Constant, Key, Operator};
use super::scientific::ScientificFn;

/// Text shown on the display while in the error state.
pub const DEFAULT_ERROR_INDICATOR: &str = "Error";

/// Which set of keys is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalcMode {
    #[default]
    Standard,
    Scientific,
}

impl fmt::Display for CalcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Scientific => write!(f, "scientific"),
        }
    }
}

impl FromStr for CalcMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "std" => Ok(Self::Standard),
            "scientific" | "sci" => Ok(Self::Scientific),
            _ => Err(format!("unknown mode: {}", s)),
        }
    }
}

/// Formatting options for the state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Fractional digits kept for non-integer results.
    pub decimals: usize,
    /// Display text while in the error state.
    pub error_indicator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            error_indicator: DEFAULT_ERROR_INDICATOR.to_string(),
        }
    }
}

/// A snapshot of the visible calculator state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputState {
    /// The operand being typed, or the last result. Never empty.
    pub display: String,
    /// Left-hand side plus trailing operator glyph, e.g. `"2 + "`.
    pub equation: String,
    /// Whether the next digit replaces the display.
    pub is_new_number: bool,
    pub mode: CalcMode,
    /// Whether the display shows the error indicator.
    pub error: bool,
}

impl InputState {
    /// Check if this is the cleared state.
    pub fn is_cleared(&self) -> bool {
        self.display == "0" && self.equation.is_empty() && self.is_new_number && !self.error
    }
}

/// Permission to auto-clear the error state raised at one generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetTicket {
    generation: u64,
}

impl ResetTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What a key press did.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The state changed.
    Updated,
    /// The key had no effect.
    Ignored,
    /// A calculation completed. This is the `on_result` event.
    Evaluated { expression: String, result: String },
    /// The calculation failed and the display shows the error indicator.
    Failed { error: CalcError, reset: ResetTicket },
}

impl Outcome {
    /// Check if a calculation completed.
    pub fn is_evaluated(&self) -> bool {
        matches!(self, Self::Evaluated { .. })
    }

    /// Check if the key put the calculator into its error state.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// The calculator input state machine.
#[derive(Clone, Debug)]
pub struct Calculator {
    display: String,
    equation: String,
    is_new_number: bool,
    mode: CalcMode,
    error: bool,
    generation: u64,
    settings: Settings,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            display: "0".to_string(),
            equation: String::new(),
            is_new_number: true,
            mode: CalcMode::Standard,
            error: false,
            generation: 0,
            settings,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn equation(&self) -> &str {
        &self.equation
    }

    pub fn is_new_number(&self) -> bool {
        self.is_new_number
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn mode(&self) -> CalcMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CalcMode) {
        if self.mode != mode {
            debug!(%mode, "mode changed");
            self.mode = mode;
        }
    }

    /// Number of transitions applied so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Take a snapshot of the visible state.
    pub fn state(&self) -> InputState {
        InputState {
            display: self.display.clone(),
            equation: self.equation.clone(),
            is_new_number: self.is_new_number,
            mode: self.mode,
            error: self.error,
        }
    }

    /// Apply a key press.
    pub fn press(&mut self, key: Key) -> Outcome {
        match key {
            Key::Digit(d) => self.press_digit(d),
            Key::Operator(op) => self.press_operator(op),
            Key::Clear => self.press_clear(),
            Key::Delete => self.press_delete(),
            Key::Equals => self.press_equals(),
            Key::Scientific(function) => self.press_scientific(function),
            Key::Constant(constant) => self.press_constant(constant),
        }
    }

    /// Type a digit or the decimal point.
    pub fn press_digit(&mut self, digit: char) -> Outcome {
        if !(digit.is_ascii_digit() || digit == '.') {
            debug!(%digit, "not a digit");
            return Outcome::Ignored;
        }
        if digit == '.' && !self.is_new_number && has_decimal_point(&self.display) {
            return Outcome::Ignored;
        }
        self.begin();

        let mut buf = [0u8; 4];
        self.enter(digit.encode_utf8(&mut buf));
        Outcome::Updated
    }

    /// Choose a binary operator. A second operator replaces the first.
    pub fn press_operator(&mut self, op: Operator) -> Outcome {
        self.begin();
        self.equation = format!("{} {} ", self.display, op.glyph());
        self.is_new_number = true;
        debug!(equation = %self.equation, "operator");
        Outcome::Updated
    }

    /// Return to the cleared state.
    pub fn press_clear(&mut self) -> Outcome {
        self.generation += 1;
        self.reset();
        Outcome::Updated
    }

    /// Drop the last character of the display.
    pub fn press_delete(&mut self) -> Outcome {
        self.begin();

        if self.display.chars().count() > 1 {
            self.display.pop();
        } else {
            self.display = "0".to_string();
            self.is_new_number = true;
        }

        // Never leave a bare sign behind.
        if self.display == "-" {
            self.display = "0".to_string();
            self.is_new_number = true;
        }
        Outcome::Updated
    }

    /// Evaluate `equation + display`.
    ///
    /// With no pending operator the display is left untouched, so pressing
    /// equals twice shows the same result. The operand being typed is
    /// still finished: the next digit starts a new number.
    pub fn press_equals(&mut self) -> Outcome {
        if self.equation.is_empty() && !self.error {
            if self.is_new_number {
                return Outcome::Ignored;
            }
            self.begin();
            self.is_new_number = true;
            return Outcome::Updated;
        }
        self.begin();

        // Leaving the error state dropped the pending equation.
        if self.equation.is_empty() {
            return Outcome::Updated;
        }

        let full = format!("{}{}", self.equation, self.display);
        match evaluate_expression(&full, self.settings.decimals) {
            Ok(evaluation) => {
                debug!(expression = %evaluation.expression, result = %evaluation.display_result, "evaluated");
                self.display = evaluation.display_result.clone();
                self.equation.clear();
                self.is_new_number = true;
                Outcome::Evaluated {
                    expression: evaluation.expression,
                    result: evaluation.display_result,
                }
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Apply a scientific function to the display. Scientific mode only.
    pub fn press_scientific(&mut self, function: ScientificFn) -> Outcome {
        if !self.accepts(&Key::Scientific(function)) {
            debug!(%function, "scientific key in standard mode");
            return Outcome::Ignored;
        }
        self.begin();

        match function.apply_to_display(&self.display) {
            Ok(value) => {
                let expression = format!("{}({})", function.label(), self.display);
                let result = format_result(value, self.settings.decimals);
                debug!(%expression, %result, "scientific");
                self.display = result.clone();
                self.is_new_number = true;
                Outcome::Evaluated { expression, result }
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Type a constant's literal. Scientific mode only.
    pub fn press_constant(&mut self, constant: Constant) -> Outcome {
        if !self.accepts(&Key::Constant(constant)) {
            debug!(?constant, "constant in standard mode");
            return Outcome::Ignored;
        }
        self.begin();

        // Appending a literal to an operand with a point would give two.
        if !self.is_new_number && has_decimal_point(&self.display) {
            self.is_new_number = true;
        }
        self.enter(constant.literal());
        Outcome::Updated
    }

    /// Put a number on the display as a fresh operand, e.g. a result
    /// recalled from history.
    pub fn load_operand(&mut self, value: &str) -> Outcome {
        if !is_numeric_fragment(value) {
            return Outcome::Ignored;
        }
        self.begin();
        self.display = value.to_string();
        self.is_new_number = true;
        Outcome::Updated
    }

    /// Perform the deferred auto-clear if nothing happened since the
    /// failure that issued `ticket`. Returns whether the state was reset.
    pub fn expire(&mut self, ticket: ResetTicket) -> bool {
        if !self.error || ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "stale reset ignored"
            );
            return false;
        }
        self.reset();
        true
    }

    /// Check if the key is available in the current mode.
    fn accepts(&self, key: &Key) -> bool {
        !key.is_scientific() || self.mode == CalcMode::Scientific
    }

    /// Start a transition: bump the generation and leave the error state.
    fn begin(&mut self) {
        self.generation += 1;
        if self.error {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.display = "0".to_string();
        self.equation.clear();
        self.is_new_number = true;
        self.error = false;
    }

    fn enter(&mut self, text: &str) {
        let text = if text == "." { "0." } else { text };
        if self.is_new_number || self.display == "0" {
            self.display = text.to_string();
            self.is_new_number = false;
        } else {
            self.display.push_str(text);
        }
    }

    fn fail(&mut self, error: CalcError) -> Outcome {
        warn!(%error, equation = %self.equation, display = %self.display, "calculation failed");
        self.display = self.settings.error_indicator.clone();
        self.error = true;
        self.is_new_number = true;
        Outcome::Failed {
            error,
            reset: ResetTicket {
                generation: self.generation,
            },
        }
    }
}

impl fmt::Display for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.equation, self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::error::{DomainError, EvaluationError};

    fn press_all(calc: &mut Calculator, keys: &str) -> Outcome {
        let mut last = Outcome::Ignored;
        for key in keys.split_whitespace() {
            last = calc.press(key.parse().unwrap());
        }
        last
    }

    fn scientific() -> Calculator {
        let mut calc = Calculator::new();
        calc.set_mode(CalcMode::Scientific);
        calc
    }

    #[test]
    fn test_initial_state_is_cleared() {
        assert!(Calculator::new().state().is_cleared());
    }

    #[test]
    fn test_digits_concatenate() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "1 2 3");
        assert_eq!(calc.display(), "123");
        assert!(!calc.is_new_number());
    }

    #[test]
    fn test_leading_zero_replaced() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "0 5");
        assert_eq!(calc.display(), "5");

        press_all(&mut calc, "C 0 0 7");
        assert_eq!(calc.display(), "7");
    }

    #[test]
    fn test_decimal_point() {
        let mut calc = Calculator::new();
        press_all(&mut calc, ". 5");
        assert_eq!(calc.display(), "0.5");

        press_all(&mut calc, "C 1 . 2 . 3");
        assert_eq!(calc.display(), "1.23");

        press_all(&mut calc, "C 0 . 0 1");
        assert_eq!(calc.display(), "0.01");
    }

    #[test]
    fn test_operator_builds_equation() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "1 2 ×");
        assert_eq!(calc.equation(), "12 × ");
        assert_eq!(calc.display(), "12");
        assert!(calc.is_new_number());

        press_all(&mut calc, "3");
        assert_eq!(calc.display(), "3");
    }

    #[test]
    fn test_second_operator_overwrites() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "8 + -");
        assert_eq!(calc.equation(), "8 - ");
        assert_eq!(
            press_all(&mut calc, "3 ="),
            Outcome::Evaluated {
                expression: "8 - 3".into(),
                result: "5".into()
            }
        );
    }

    #[test]
    fn test_operators_do_not_chain() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "2 + 3 × 4");
        assert_eq!(calc.equation(), "3 × ");
        assert_eq!(
            press_all(&mut calc, "="),
            Outcome::Evaluated {
                expression: "3 × 4".into(),
                result: "12".into()
            }
        );
    }

    #[test]
    fn test_addition() {
        let mut calc = Calculator::new();
        let outcome = press_all(&mut calc, "2 + 3 =");
        assert_eq!(
            outcome,
            Outcome::Evaluated {
                expression: "2 + 3".into(),
                result: "5".into()
            }
        );
        assert_eq!(calc.display(), "5");
        assert_eq!(calc.equation(), "");
        assert!(calc.is_new_number());
    }

    #[test]
    fn test_division_fraction() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "7 ÷ 2 =");
        assert_eq!(calc.display(), "3.5");
    }

    #[test]
    fn test_percent_is_remainder() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "5 0 % 8 =");
        assert_eq!(calc.display(), "2");
    }

    #[test]
    fn test_result_feeds_next_operation() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "2 - 5 = × 3 =");
        assert_eq!(calc.display(), "-9");
    }

    #[test]
    fn test_operator_without_new_number_reuses_display() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "4 + =");
        assert_eq!(calc.display(), "8");
    }

    #[test]
    fn test_equals_twice_is_noop() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "2 + 3 =");
        let before = calc.state();
        assert_eq!(calc.press_equals(), Outcome::Ignored);
        assert_eq!(calc.state(), before);
    }

    #[test]
    fn test_redundant_point_is_not_a_transition() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "1 . 5");
        let generation = calc.generation();
        assert_eq!(calc.press_digit('.'), Outcome::Ignored);
        assert_eq!(calc.display(), "1.5");
        assert_eq!(calc.generation(), generation);
    }

    #[test]
    fn test_equals_finishes_typed_operand() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "4 2");
        assert_eq!(calc.press_equals(), Outcome::Updated);
        assert_eq!(calc.display(), "42");
        assert!(calc.is_new_number());

        press_all(&mut calc, "7");
        assert_eq!(calc.display(), "7");
    }

    #[test]
    fn test_equals_during_error_clears() {
        let mut calc = Calculator::new();
        let Outcome::Failed { reset, .. } = press_all(&mut calc, "1 ÷ 0 =") else {
            panic!("expected failure");
        };
        assert_eq!(calc.press_equals(), Outcome::Updated);
        assert!(calc.state().is_cleared());
        assert!(!calc.expire(reset));
    }

    #[test]
    fn test_ignored_keys_leave_generation() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "2 + 3 =");
        let generation = calc.generation();
        assert_eq!(calc.press_equals(), Outcome::Ignored);
        assert_eq!(calc.press_digit('x'), Outcome::Ignored);
        assert_eq!(calc.generation(), generation);
    }

    #[test]
    fn test_clear_from_any_state() {
        let mut calc = scientific();
        press_all(&mut calc, "1 2 + 3");
        calc.press_clear();
        assert_eq!(calc.display(), "0");
        assert_eq!(calc.equation(), "");
        assert!(calc.is_new_number());

        press_all(&mut calc, "1 ÷ 0 =");
        assert!(calc.is_error());
        calc.press_clear();
        assert!(calc.state().is_cleared());
    }

    #[test]
    fn test_delete() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "1 2 3 del");
        assert_eq!(calc.display(), "12");

        press_all(&mut calc, "del del");
        assert_eq!(calc.display(), "0");
        assert!(calc.is_new_number());

        press_all(&mut calc, "4");
        assert_eq!(calc.display(), "4");
    }

    #[test]
    fn test_delete_never_leaves_bare_sign() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "2 - 5 =");
        assert_eq!(calc.display(), "-3");
        calc.press_delete();
        assert_eq!(calc.display(), "0");
        assert!(calc.is_new_number());
    }

    #[test]
    fn test_point_then_delete() {
        let mut calc = Calculator::new();
        calc.press_operator(Operator::Add);
        press_all(&mut calc, ". del");
        assert_eq!(calc.display(), "0");
        assert!(press_all(&mut calc, "=").is_evaluated());
    }

    #[test]
    fn test_division_by_zero_fails() {
        let mut calc = Calculator::new();
        let outcome = press_all(&mut calc, "1 ÷ 0 =");
        assert!(matches!(
            outcome,
            Outcome::Failed {
                error: CalcError::Evaluation(EvaluationError::NonFinite),
                ..
            }
        ));
        assert_eq!(calc.display(), DEFAULT_ERROR_INDICATOR);
        assert!(calc.is_error());
    }

    #[test]
    fn test_key_after_error_starts_fresh() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "1 ÷ 0 =");
        press_all(&mut calc, "7");
        assert_eq!(calc.display(), "7");
        assert_eq!(calc.equation(), "");
        assert!(!calc.is_error());
    }

    #[test]
    fn test_expire_resets_error() {
        let mut calc = Calculator::new();
        let Outcome::Failed { reset, .. } = press_all(&mut calc, "1 ÷ 0 =") else {
            panic!("expected failure");
        };
        assert!(calc.expire(reset));
        assert!(calc.state().is_cleared());
    }

    #[test]
    fn test_stale_ticket_ignored() {
        let mut calc = Calculator::new();
        let Outcome::Failed { reset, .. } = press_all(&mut calc, "1 ÷ 0 =") else {
            panic!("expected failure");
        };
        press_all(&mut calc, "4 2");
        assert!(!calc.expire(reset));
        assert_eq!(calc.display(), "42");
    }

    #[test]
    fn test_scientific_sqrt() {
        let mut calc = scientific();
        let outcome = press_all(&mut calc, "1 6 sqrt");
        assert_eq!(
            outcome,
            Outcome::Evaluated {
                expression: "sqrt(16)".into(),
                result: "4".into()
            }
        );
        assert_eq!(calc.display(), "4");
        assert!(calc.is_new_number());
    }

    #[test]
    fn test_scientific_domain_error() {
        let mut calc = scientific();
        press_all(&mut calc, "0 - 1 =");
        assert_eq!(calc.display(), "-1");
        let outcome = calc.press_scientific(ScientificFn::Sqrt);
        assert!(matches!(
            outcome,
            Outcome::Failed {
                error: CalcError::Domain(DomainError::NegativeRoot(_)),
                ..
            }
        ));
        assert_eq!(calc.display(), DEFAULT_ERROR_INDICATOR);
    }

    #[test]
    fn test_scientific_keeps_pending_equation() {
        let mut calc = scientific();
        press_all(&mut calc, "9 + 1 6 sqrt");
        assert_eq!(calc.equation(), "9 + ");
        press_all(&mut calc, "=");
        assert_eq!(calc.display(), "13");
    }

    #[test]
    fn test_square_and_log() {
        let mut calc = scientific();
        press_all(&mut calc, "1 . 5 sq");
        assert_eq!(calc.display(), "2.25");

        press_all(&mut calc, "C 1 0 0 log");
        assert_eq!(calc.display(), "2");
    }

    #[test]
    fn test_scientific_ignored_in_standard_mode() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "1 6");
        let generation = calc.generation();
        assert_eq!(calc.press_scientific(ScientificFn::Sqrt), Outcome::Ignored);
        assert_eq!(calc.press_constant(Constant::Pi), Outcome::Ignored);
        assert_eq!(calc.display(), "16");
        assert_eq!(calc.generation(), generation);
    }

    #[test]
    fn test_constants() {
        let mut calc = scientific();
        press_all(&mut calc, "pi");
        assert_eq!(calc.display(), "3.14159");

        press_all(&mut calc, "C 2 e");
        assert_eq!(calc.display(), "22.71828");

        press_all(&mut calc, "C 1 . 5 pi");
        assert_eq!(calc.display(), "3.14159");
    }

    #[test]
    fn test_custom_settings() {
        let mut calc = Calculator::with_settings(Settings {
            decimals: 2,
            error_indicator: "Oops".into(),
        });
        press_all(&mut calc, "1 ÷ 3 =");
        assert_eq!(calc.display(), "0.33");
        press_all(&mut calc, "÷ 0 =");
        assert_eq!(calc.display(), "Oops");
    }

    #[test]
    fn test_load_operand() {
        let mut calc = Calculator::new();
        assert_eq!(calc.load_operand("3.5"), Outcome::Updated);
        assert_eq!(calc.display(), "3.5");
        assert!(calc.is_new_number());
        assert_eq!(calc.load_operand("Error"), Outcome::Ignored);
        assert_eq!(calc.display(), "3.5");
    }

    #[test]
    fn test_display_shows_full_expression() {
        let mut calc = Calculator::new();
        press_all(&mut calc, "6 × 7");
        assert_eq!(calc.to_string(), "6 × 7");
    }
}
