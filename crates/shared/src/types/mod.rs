//! Common types used across the application.

pub mod year_month;

pub use year_month::{YearMonth, YearMonthError};
