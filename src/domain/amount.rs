//! Numeric policies for monetary amounts.
//!
//! Two policies coexist. Input boundaries are strict ([`parse_amount`]) and reject
//! anything that is not a finite, non-negative number. Aggregation is permissive
//! ([`coerce_amount`]) so a single malformed stored value degrades to zero instead of
//! blocking a whole month or year of totals.

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::FinanceError;

/// A raw amount as it may arrive from a form field or a stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
    Missing,
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(value: String) -> Self {
        AmountInput::Text(value)
    }
}

impl<T: Into<AmountInput>> From<Option<T>> for AmountInput {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AmountInput::Missing)
    }
}

/// Permissive coercion: unparseable, missing, negative or non-finite values become 0.
pub fn coerce_amount(input: impl Into<AmountInput>) -> f64 {
    let value = match input.into() {
        AmountInput::Number(value) => value,
        AmountInput::Text(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        AmountInput::Missing => 0.0,
    };
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Coerces a planned figure where only finiteness matters.
pub fn coerce_finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Coercion for stored planned figures: numeric text is parsed, anything unreadable or
/// non-finite becomes 0. Signs are kept.
pub fn coerce_planned(input: impl Into<AmountInput>) -> f64 {
    match input.into() {
        AmountInput::Number(value) => coerce_finite(value),
        AmountInput::Text(text) => text.trim().parse::<f64>().map(coerce_finite).unwrap_or(0.0),
        AmountInput::Missing => 0.0,
    }
}

/// Strict parsing used before a value is accepted into storage.
pub fn parse_amount(input: impl Into<AmountInput>) -> Result<f64, FinanceError> {
    let value = match input.into() {
        AmountInput::Number(value) => value,
        AmountInput::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(FinanceError::InvalidInput("amount is required".into()));
            }
            trimmed.parse::<f64>().map_err(|_| {
                FinanceError::InvalidInput(format!("amount `{trimmed}` is not a number"))
            })?
        }
        AmountInput::Missing => {
            return Err(FinanceError::InvalidInput("amount is required".into()));
        }
    };
    if !value.is_finite() {
        return Err(FinanceError::InvalidInput(
            "amount must be a finite number".into(),
        ));
    }
    if value < 0.0 {
        return Err(FinanceError::InvalidInput(format!(
            "amount must not be negative, got {value}"
        )));
    }
    Ok(value)
}

/// Serde adapter that accepts numbers, numeric strings, or null and coerces them.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<AmountInput>::deserialize(deserializer)?;
    Ok(coerce_amount(raw))
}
