//! Core business logic for Kakeibo.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing, session tokens and lifetimes
//! - `monthly` - Monthly burden and balance calculations
//! - `assets` - Asset categories, valuation and month-over-month change
//! - `documents` - Document defaults
//! - `input` - Lenient parsing of numeric form fields

pub mod assets;
pub mod auth;
pub mod documents;
pub mod input;
pub mod monthly;
