//! Input events understood by the calculator.

use std::fmt;
use std::str::FromStr;

use super::scientific::ScientificFn;

/// A binary operator button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Remainder, with the same precedence as multiply and divide.
    Percent,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Percent,
    ];

    /// Look up the operator shown as `c`. The typographic minus counts as
    /// subtraction.
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '−' => Some(Self::Subtract),
            c => Self::ALL.into_iter().find(|op| op.glyph() == c),
        }
    }

    /// Symbol shown on the display and stored in the equation.
    pub fn glyph(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
            Self::Percent => '%',
        }
    }

    /// Symbol the evaluator understands.
    pub fn token(&self) -> char {
        match self {
            Self::Multiply => '*',
            Self::Divide => '/',
            other => other.glyph(),
        }
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Add),
            "-" | "−" => Ok(Self::Subtract),
            "*" | "×" | "x" => Ok(Self::Multiply),
            "/" | "÷" => Ok(Self::Divide),
            "%" => Ok(Self::Percent),
            _ => Err(format!("unknown operator: {}", s)),
        }
    }
}

/// A constant button. Entering one types its literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    /// Decimal literal typed into the display.
    pub fn literal(&self) -> &'static str {
        match self {
            Self::Pi => "3.14159",
            Self::E => "2.71828",
        }
    }
}

/// A single key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A digit `0`-`9` or the decimal point.
    Digit(char),
    Operator(Operator),
    Clear,
    Delete,
    Equals,
    Scientific(ScientificFn),
    Constant(Constant),
}

impl Key {
    /// Build a digit key, rejecting anything but `0`-`9` and `.`.
    pub fn digit(c: char) -> Option<Self> {
        (c.is_ascii_digit() || c == '.').then_some(Self::Digit(c))
    }

    /// Check if this key is only available in scientific mode.
    pub fn is_scientific(&self) -> bool {
        matches!(self, Self::Scientific(_) | Self::Constant(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(c) => write!(f, "{}", c),
            Self::Operator(op) => write!(f, "{}", op.glyph()),
            Self::Clear => write!(f, "C"),
            Self::Delete => write!(f, "DEL"),
            Self::Equals => write!(f, "="),
            Self::Scientific(function) => write!(f, "{}", function),
            Self::Constant(Constant::Pi) => write!(f, "π"),
            Self::Constant(Constant::E) => write!(f, "e"),
        }
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && let Some(key) = Self::digit(c)
        {
            return Ok(key);
        }

        if let Ok(op) = s.parse::<Operator>() {
            return Ok(Self::Operator(op));
        }

        match s.to_lowercase().as_str() {
            "c" | "ac" | "clear" => return Ok(Self::Clear),
            "del" | "delete" | "backspace" | "bs" => return Ok(Self::Delete),
            "=" | "equals" | "enter" => return Ok(Self::Equals),
            "pi" | "π" => return Ok(Self::Constant(Constant::Pi)),
            "e" => return Ok(Self::Constant(Constant::E)),
            _ => {}
        }

        s.parse::<ScientificFn>()
            .map(Self::Scientific)
            .map_err(|_| format!("unknown key: {}", s))
    }
}
