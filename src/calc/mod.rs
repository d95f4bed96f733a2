//! Manual calculation mode.
//!
//! Parsing and evaluation of keypad expressions delegates to the external
//! `evalexpr` engine; this module owns the input short-circuit, the value
//! model, and its canonical string form. The symbolic capability handle of
//! the sandbox routes through the same entry point.

use crate::error::{CalcError, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calculation result value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CalcValue {
    /// Integer value.
    Integer(i64),

    /// Floating point value.
    Number(f64),

    /// Boolean value.
    Boolean(bool),

    /// String value.
    Text(String),

    /// Tuple of values.
    Tuple(Vec<Self>),

    /// No value (empty expression result).
    Empty,
}

impl From<evalexpr::Value> for CalcValue {
    fn from(value: evalexpr::Value) -> Self {
        match value {
            evalexpr::Value::String(s) => Self::Text(s),
            evalexpr::Value::Float(f) => Self::Number(f),
            evalexpr::Value::Int(i) => Self::Integer(i),
            evalexpr::Value::Boolean(b) => Self::Boolean(b),
            evalexpr::Value::Tuple(items) => {
                Self::Tuple(items.into_iter().map(Self::from).collect())
            }
            evalexpr::Value::Empty => Self::Empty,
        }
    }
}

impl fmt::Display for CalcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Self::Empty => write!(f, "()"),
        }
    }
}

/// Evaluates a manual calculator expression.
///
/// Empty or whitespace-only input short-circuits with
/// [`Error::EmptyInput`] before any processing.
///
/// # Arguments
///
/// * `expression` - The expression text as typed.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] for blank input, or
/// [`CalcError::Evaluation`] when the expression cannot be parsed or
/// evaluated.
///
/// # Examples
///
/// ```
/// use abacus_rs::calc;
///
/// let value = calc::evaluate("2 + 2").unwrap();
/// assert_eq!(value.to_string(), "4");
/// ```
pub fn evaluate(expression: &str) -> Result<CalcValue> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyInput);
    }

    let value = evalexpr::eval(trimmed).map_err(CalcError::from)?;
    Ok(CalcValue::from(value))
}
