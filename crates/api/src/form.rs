//! Helpers for reading action form fields.
//!
//! Form structs keep every field as `Option<String>`; these helpers turn the
//! raw values into typed ones. Required fields that are missing or blank are
//! a 400. Amounts are parsed leniently; payment and balance lines also
//! refuse negative values.

use axum::Json;
use kakeibo_core::input::{lenient_int, non_blank, optional_int};
use kakeibo_shared::types::YearMonth;
use serde::Serialize;

use crate::{ApiError, ApiResult};

/// Body returned by successful actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Success {
    /// Always `true`.
    pub success: bool,
}

/// `200 {"success": true}`.
#[must_use]
pub const fn success() -> Json<Success> {
    Json(Success { success: true })
}

/// A non-blank text field.
///
/// # Errors
///
/// Returns a validation error naming `field` when it is missing or blank.
pub fn required_text(value: Option<String>, field: &str) -> ApiResult<String> {
    non_blank(value).ok_or_else(|| ApiError::validation(format!("{field} is required")))
}

/// A row id field.
///
/// # Errors
///
/// Returns a validation error when the field is missing or not an id.
pub fn required_id(value: Option<&str>, field: &str) -> ApiResult<i32> {
    optional_id(value, field)?.ok_or_else(|| ApiError::validation(format!("{field} is required")))
}

/// An optional row id field; blank means `None`.
///
/// # Errors
///
/// Returns a validation error when the value does not fit an id.
pub fn optional_id(value: Option<&str>, field: &str) -> ApiResult<Option<i32>> {
    optional_int(value)
        .map(|id| i32::try_from(id).map_err(|_| ApiError::validation(format!("{field} is invalid"))))
        .transpose()
}

/// A payment or balance amount. Blank or unparsable is `0`.
///
/// # Errors
///
/// Returns a validation error naming `field` when the amount is negative.
pub fn line_amount(value: Option<&str>, field: &str) -> ApiResult<i64> {
    let amount = lenient_int(value.unwrap_or_default());
    if amount < 0 {
        return Err(ApiError::validation(format!("{field} must not be negative")));
    }
    Ok(amount)
}

/// A `YYYY-MM` field.
///
/// # Errors
///
/// Returns a validation error when the field is missing or malformed.
pub fn required_month(value: Option<String>, field: &str) -> ApiResult<YearMonth> {
    required_text(value, field)?
        .trim()
        .parse()
        .map_err(|_| ApiError::validation(format!("{field} must be YYYY-MM")))
}
