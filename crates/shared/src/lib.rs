//! Shared types, errors, and configuration for Kakeibo.
//!
//! This crate provides common types used across all other crates:
//! - The authenticated caller identity
//! - The `YYYY-MM` month key
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod identity;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use identity::CurrentUser;
