//! Parsing and validation of raw user input.

use chrono::NaiveDate;

use crate::CoreError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a numeric amount typed by the user.
///
/// Rejects blank, non-numeric and non-finite input. Sign checks belong to
/// the operation consuming the amount.
pub fn parse_amount(raw: &str) -> Result<f64, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("amount is required"));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::validation(format!("amount `{trimmed}` is not a number")))?;
    ensure_finite(value)
}

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        CoreError::validation(format!("invalid date `{trimmed}` (use YYYY-MM-DD)"))
    })
}

pub fn ensure_finite(amount: f64) -> Result<f64, CoreError> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(CoreError::validation("amount must be a finite number"))
    }
}

/// Requires a present, finite, strictly positive amount.
pub fn require_positive(amount: Option<f64>) -> Result<f64, CoreError> {
    let amount = amount.ok_or_else(|| CoreError::validation("amount is required"))?;
    let amount = ensure_finite(amount)?;
    if amount <= 0.0 {
        return Err(CoreError::validation(format!(
            "amount must be greater than zero (got {amount})"
        )));
    }
    Ok(amount)
}
