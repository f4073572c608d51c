//! Repository implementations for database access.
//!
//! Every query on user data is scoped by the acting user's id. Child rows
//! (monthly lines, asset lines) are reached through a parent record owned by
//! that user.

pub mod asset;
pub mod document;
pub mod monthly;
pub mod payment_source;
pub mod session;
pub mod user;

pub use asset::{AssetError, AssetRepository};
pub use document::{DocumentError, DocumentOrder, DocumentRepository, DocumentSummary};
pub use monthly::{MonthlyError, MonthlyRepository};
pub use payment_source::{PaymentSourceError, PaymentSourceRepository};
pub use session::SessionRepository;
pub use user::UserRepository;

use sea_orm::{DbErr, SqlErr};

/// Returns true if `err` is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
