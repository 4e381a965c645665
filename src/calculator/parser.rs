//! Recursive-descent evaluator for the calculator's arithmetic grammar.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/' | '%') unary)*
//! unary  := ('-' | '+') unary | number
//! number := digits ['.' digits*] | '.' digits
//! ```
//!
//! There are no variables, parentheses or function calls. Display glyphs
//! must be normalized before calling [`evaluate`].

use std::fmt;
use std::iter::Peekable;

use super::error::EvaluationError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    /// '+'
    Plus,

    /// '-'
    Minus,

    /// '*'
    Star,

    /// '/'
    Slash,

    /// '%'
    Percent,

    /// 'int(.int)'
    Num(f64),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::Num(n) => write!(f, "{}", n),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvaluationError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, ch)) = chars.peek() {
        let token = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '0'..='9' | '.' => {
                let mut end = position;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(parse_number(&input[position..end])?);
                continue;
            }
            ch => return Err(EvaluationError::UnexpectedChar { ch, position }),
        };
        chars.next();
        tokens.push(token);
    }

    Ok(tokens)
}

fn parse_number(literal: &str) -> Result<Token, EvaluationError> {
    // Rust's float parser accepts "5." and ".5" but we still have to
    // reject a lone dot and anything with two decimal points.
    if literal == "." || literal.matches('.').count() > 1 {
        return Err(EvaluationError::InvalidNumber(literal.to_string()));
    }
    literal
        .parse()
        .map(Token::Num)
        .map_err(|_| EvaluationError::InvalidNumber(literal.to_string()))
}

/// Evaluate a normalized arithmetic expression.
///
/// Multiplication, division and remainder bind tighter than addition and
/// subtraction; all binary operators are left associative. A non-finite
/// result (division by zero, overflow) is reported as
/// [`EvaluationError::NonFinite`].
pub fn evaluate(input: &str) -> Result<f64, EvaluationError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvaluationError::Empty);
    }

    let mut tokens = tokens.into_iter().peekable();
    let value = parse_expr(&mut tokens)?;

    if let Some(extra) = tokens.next() {
        return Err(EvaluationError::UnexpectedToken(extra.to_string()));
    }

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationError::NonFinite)
    }
}

fn parse_expr(tokens: &mut Peekable<impl Iterator<Item = Token>>) -> Result<f64, EvaluationError> {
    let mut lhs = parse_term(tokens)?;

    while let Some(Token::Plus | Token::Minus) = tokens.peek() {
        let is_plus = tokens.next() == Some(Token::Plus);
        let rhs = parse_term(tokens)?;

        lhs = if is_plus { lhs + rhs } else { lhs - rhs };
    }

    Ok(lhs)
}

fn parse_term(tokens: &mut Peekable<impl Iterator<Item = Token>>) -> Result<f64, EvaluationError> {
    let mut lhs = parse_unary(tokens)?;

    while let Some(op @ (Token::Star | Token::Slash | Token::Percent)) = tokens.peek().copied() {
        tokens.next();
        let rhs = parse_unary(tokens)?;

        lhs = match op {
            Token::Star => lhs * rhs,
            Token::Slash => lhs / rhs,
            _ => lhs % rhs,
        };
    }

    Ok(lhs)
}

fn parse_unary(tokens: &mut Peekable<impl Iterator<Item = Token>>) -> Result<f64, EvaluationError> {
    // Signs are folded in a loop so a long run of them cannot exhaust the stack.
    let mut negative = false;
    loop {
        match tokens.next() {
            Some(Token::Minus) => negative = !negative,
            Some(Token::Plus) => {}
            Some(Token::Num(n)) => return Ok(if negative { -n } else { n }),
            Some(other) => return Err(EvaluationError::UnexpectedToken(other.to_string())),
            None => return Err(EvaluationError::UnexpectedEnd),
        }
    }
}
