//! Text checks shared by the input state machine and the evaluator.
//!
//! Normalizes display glyphs into evaluator tokens and decides whether a
//! display string is a plausible numeric operand.

use lazy_static::lazy_static;
use regex::Regex;

use super::keys::Operator;

lazy_static! {
    /// Matches a complete or partially typed number: "12", "12.", ".5",
    /// "-3.25". A lone sign or a lone dot does not match.
    static ref NUMERIC_FRAGMENT: Regex = Regex::new(
        r"^-?(\d+\.?\d*|\.\d+)$"
    ).unwrap();
}

/// Replace every display glyph with its evaluator token.
pub fn normalize_glyphs(input: &str) -> String {
    input
        .chars()
        .map(|c| Operator::from_glyph(c).map_or(c, |op| op.token()))
        .collect()
}

/// Check if the text is a numeric operand the display may hold.
pub fn is_numeric_fragment(input: &str) -> bool {
    NUMERIC_FRAGMENT.is_match(input)
}

/// Check if the operand already holds a decimal point.
pub fn has_decimal_point(input: &str) -> bool {
    input.contains('.')
}
