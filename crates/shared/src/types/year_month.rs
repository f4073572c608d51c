//! Calendar month key (`YYYY-MM`).
//!
//! Monthly records and asset snapshots are keyed per user by month. The
//! canonical text form sorts chronologically, so it is stored as-is.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing a [`YearMonth`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YearMonthError {
    /// Input is not shaped like `YYYY-MM`.
    #[error("expected YYYY-MM, got {0:?}")]
    Format(String),
    /// Month outside 1..=12.
    #[error("month out of range: {0}")]
    MonthOutOfRange(u32),
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month, validating the month number.
    ///
    /// # Errors
    ///
    /// Returns `YearMonthError::MonthOutOfRange` if `month` is not in 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, YearMonthError> {
        if month == 0 || month > 12 {
            return Err(YearMonthError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// The current month in UTC.
    #[must_use]
    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    /// The month containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Year component.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month component (1..=12).
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let format_err = || YearMonthError::Format(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(format_err)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(format_err());
        }

        let year: i32 = year.parse().map_err(|_| format_err())?;
        let month: u32 = month.parse().map_err(|_| format_err())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = YearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}
