//! Expression evaluation and result formatting.
//!
//! Wraps the recursive-descent parser to provide a simple interface for
//! evaluating display expressions and formatting results.

use super::detection::normalize_glyphs;
use super::error::EvaluationError;
use super::parser;

/// Fractional digits kept when a result is not an integer.
pub const DEFAULT_DECIMALS: usize = 8;

/// Result of successfully evaluating a calculator expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// The expression as typed, with display glyphs.
    pub expression: String,
    /// The numeric value.
    pub value: f64,
    /// Formatted for display.
    pub display_result: String,
}

/// Evaluate a display expression such as `"6 × 7"`.
///
/// Glyphs are normalized to evaluator tokens first; the returned
/// [`Evaluation`] keeps the expression as it was typed.
pub fn evaluate_expression(input: &str, decimals: usize) -> Result<Evaluation, EvaluationError> {
    let expression = input.trim().to_string();
    let value = parser::evaluate(&normalize_glyphs(&expression))?;

    Ok(Evaluation {
        display_result: format_result(value, decimals),
        expression,
        value,
    })
}

/// Format a number for the display.
///
/// Integers print without a decimal point. Everything else is rounded to
/// `decimals` places with trailing zeros and a dangling point removed.
pub fn format_result(value: f64, decimals: usize) -> String {
    let formatted = if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        let fixed = format!("{:.*}", decimals, value);
        if fixed.contains('.') {
            fixed
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        } else {
            fixed
        }
    };

    // Rounding can leave "-0" behind for tiny negatives.
    if formatted == "-0" {
        "0".to_string()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_evaluation() {
        let result = evaluate_expression("2 + 3", DEFAULT_DECIMALS).unwrap();
        assert_eq!(result.expression, "2 + 3");
        assert_eq!(result.value, 5.0);
        assert_eq!(result.display_result, "5");
    }

    #[test]
    fn test_glyph_expression() {
        let result = evaluate_expression("6 × 7", DEFAULT_DECIMALS).unwrap();
        assert_eq!(result.expression, "6 × 7");
        assert_eq!(result.display_result, "42");

        let result = evaluate_expression("7 ÷ 2", DEFAULT_DECIMALS).unwrap();
        assert_eq!(result.display_result, "3.5");
    }

    #[test]
    fn test_decimal_result() {
        let result = evaluate_expression("1 ÷ 3", DEFAULT_DECIMALS).unwrap();
        assert_eq!(result.display_result, "0.33333333");
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            evaluate_expression("1 ÷ 0", DEFAULT_DECIMALS),
            Err(EvaluationError::NonFinite)
        );
    }

    #[test]
    fn test_invalid_expression() {
        assert_eq!(
            evaluate_expression("2 + ", DEFAULT_DECIMALS),
            Err(EvaluationError::UnexpectedEnd)
        );
    }

    #[test]
    fn test_many_leading_signs() {
        let input = format!("{}5 × 2", "-".repeat(100_000));
        let result = evaluate_expression(&input, DEFAULT_DECIMALS).unwrap();
        assert_eq!(result.display_result, "10");
    }

    #[test]
    fn test_format_integers() {
        assert_eq!(format_result(5.0, 8), "5");
        assert_eq!(format_result(-12.0, 8), "-12");
        assert_eq!(format_result(0.0, 8), "0");
        assert_eq!(format_result(-0.0, 8), "0");
        assert_eq!(format_result(1e16, 8), "10000000000000000");
    }

    #[test]
    fn test_format_fractions() {
        assert_eq!(format_result(3.5, 8), "3.5");
        assert_eq!(format_result(0.1 + 0.2, 8), "0.3");
        assert_eq!(format_result(2.0_f64.sqrt(), 8), "1.41421356");
        assert_eq!(format_result(1e-9, 8), "0");
        assert_eq!(format_result(-1e-9, 8), "0");
        assert_eq!(format_result(2.0_f64.sqrt(), 3), "1.414");
    }

    #[test]
    fn test_format_zero_decimals() {
        assert_eq!(format_result(2.25, 0), "2");
        assert_eq!(format_result(3.7, 0), "4");
    }
}
