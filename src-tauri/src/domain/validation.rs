//! Counter form validation
//!
//! Form inputs arrive as raw text. Digit filtering is left to the UI; here
//! anything that is not a positive integer is rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejections raised when creating or editing a counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("start must be > 0")]
    StartNotPositive,
    #[error("end must be > 0")]
    EndNotPositive,
    #[error("end must exceed start")]
    EndNotAfterStart,
    #[error("times must be > 0")]
    TimesNotPositive,
    #[error("rows must be > 0")]
    RowsNotPositive,
}

/// Parse a required positive integer. Malformed input counts as non-positive.
pub fn parse_positive(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|value| *value > 0)
}

/// Validated bounds of a row counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBounds {
    pub start_row: u32,
    pub end_row: Option<u32>,
}

/// Validate start/end inputs of the row counter form.
///
/// An empty end field means the counter has no upper bound.
pub fn validate_row_bounds(start_input: &str, end_input: &str) -> Result<RowBounds, ValidationError> {
    let start_row = parse_positive(start_input).ok_or(ValidationError::StartNotPositive)?;

    let end_input = end_input.trim();
    let end_row = if end_input.is_empty() {
        None
    } else {
        let end = parse_positive(end_input).ok_or(ValidationError::EndNotPositive)?;
        if end <= start_row {
            return Err(ValidationError::EndNotAfterStart);
        }
        Some(end)
    };

    Ok(RowBounds { start_row, end_row })
}

/// Validated maxima of a shape counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeBounds {
    pub max_times: u32,
    pub max_rows: u32,
}

/// Validate times/rows inputs of the shape counter form. Times is checked first.
pub fn validate_shape_bounds(times_input: &str, rows_input: &str) -> Result<ShapeBounds, ValidationError> {
    let max_times = parse_positive(times_input).ok_or(ValidationError::TimesNotPositive)?;
    let max_rows = parse_positive(rows_input).ok_or(ValidationError::RowsNotPositive)?;
    Ok(ShapeBounds { max_times, max_rows })
}
