//! Lenient parsing of numeric form fields.
//!
//! Financial forms are typed by hand. A field like `"12,000"` or `"3.5 BTC"`
//! keeps its leading numeric prefix; anything without one (blank, `"abc"`)
//! becomes zero instead of failing the whole action.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Exchange rate applied when a crypto form leaves `jpy_rate` blank or zero.
pub const DEFAULT_JPY_RATE: Decimal = Decimal::from_parts(150, 0, 0, false, 0);

/// Returns the longest prefix of `s` (after leading whitespace) that looks
/// like an optionally signed integer.
fn integer_prefix(s: &str) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    &s[..end]
}

/// Returns the longest prefix of `s` (after leading whitespace) that looks
/// like an optionally signed decimal number.
fn decimal_prefix(s: &str) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        // "5." is still 5; only keep the dot when digits follow
        if frac_end > end + 1 {
            end = frac_end;
        }
    }
    &s[..end]
}

/// Parses an integer prefix, returning `None` when there is none.
///
/// Values that overflow `i64` are treated as absent.
#[must_use]
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let prefix = integer_prefix(s);
    let digits = prefix.trim_start_matches(['+', '-']);
    if digits.is_empty() {
        return None;
    }
    prefix.strip_prefix('+').unwrap_or(prefix).parse().ok()
}

/// Parses a yen amount, falling back to zero.
///
/// ```
/// use kakeibo_core::input::lenient_int;
///
/// assert_eq!(lenient_int("12,000"), 12);
/// assert_eq!(lenient_int(" -300yen"), -300);
/// assert_eq!(lenient_int(""), 0);
/// ```
#[must_use]
pub fn lenient_int(s: &str) -> i64 {
    parse_int_prefix(s).unwrap_or(0)
}

/// Parses an optional id or day field: blank means `None`.
///
/// A non-blank value with no numeric prefix is also `None`.
#[must_use]
pub fn optional_int(s: Option<&str>) -> Option<i64> {
    s.filter(|v| !v.trim().is_empty()).and_then(parse_int_prefix)
}

/// Parses a decimal prefix, returning `None` when there is none.
#[must_use]
pub fn parse_decimal_prefix(s: &str) -> Option<Decimal> {
    let prefix = decimal_prefix(s);
    let digits = prefix.trim_start_matches(['+', '-']);
    if digits.is_empty() {
        return None;
    }
    let negative = prefix.starts_with('-');
    let value = if digits.starts_with('.') {
        Decimal::from_str(&format!("0{digits}")).ok()?
    } else {
        Decimal::from_str(digits).ok()?
    };
    Some(if negative { -value } else { value })
}

/// Parses a quantity or price, falling back to zero.
#[must_use]
pub fn lenient_decimal(s: &str) -> Decimal {
    parse_decimal_prefix(s).unwrap_or(Decimal::ZERO)
}

/// Parses a USD to JPY rate, falling back to [`DEFAULT_JPY_RATE`] when the
/// field is blank, unparseable or zero.
#[must_use]
pub fn lenient_jpy_rate(s: &str) -> Decimal {
    match parse_decimal_prefix(s) {
        Some(rate) if !rate.is_zero() => rate,
        _ => DEFAULT_JPY_RATE,
    }
}

/// Treats a blank text field as absent.
///
/// Optional memo fields are stored as `NULL` rather than an empty string.
#[must_use]
pub fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}
