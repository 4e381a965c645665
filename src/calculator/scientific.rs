//! Single-operand scientific functions.

use std::fmt;
use std::str::FromStr;

use super::detection::is_numeric_fragment;
use super::error::DomainError;

/// A function applied directly to the value on the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScientificFn {
    Sin,
    Cos,
    Tan,
    /// Base-10 logarithm.
    Log,
    Sqrt,
    Square,
}

impl ScientificFn {
    pub const ALL: [ScientificFn; 6] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Log,
        Self::Sqrt,
        Self::Square,
    ];

    /// Name used when the call is written to history, e.g. `sqrt(16)`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Log => "log",
            Self::Sqrt => "sqrt",
            Self::Square => "sq",
        }
    }

    /// Apply the function. Trigonometry works in radians.
    pub fn apply(&self, input: f64) -> Result<f64, DomainError> {
        let value = match self {
            Self::Sin => input.sin(),
            Self::Cos => input.cos(),
            Self::Tan => input.tan(),
            Self::Log => {
                if input <= 0.0 {
                    return Err(DomainError::NonPositiveLog(input));
                }
                input.log10()
            }
            Self::Sqrt => {
                if input < 0.0 {
                    return Err(DomainError::NegativeRoot(input));
                }
                input.sqrt()
            }
            Self::Square => input.powi(2),
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(DomainError::NonFinite {
                function: self.label(),
                input,
            })
        }
    }

    /// Parse the display text and apply the function to it.
    pub fn apply_to_display(&self, display: &str) -> Result<f64, DomainError> {
        if !is_numeric_fragment(display) {
            return Err(DomainError::NotANumber(display.to_string()));
        }
        let input: f64 = display
            .parse()
            .map_err(|_| DomainError::NotANumber(display.to_string()))?;
        self.apply(input)
    }
}

impl fmt::Display for ScientificFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScientificFn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sin" => Ok(Self::Sin),
            "cos" => Ok(Self::Cos),
            "tan" => Ok(Self::Tan),
            "log" => Ok(Self::Log),
            "sqrt" | "√" => Ok(Self::Sqrt),
            "sq" | "square" | "x²" => Ok(Self::Square),
            _ => Err(format!("unknown function: {}", s)),
        }
    }
}
