//! Authentication primitives.
//!
//! This module provides:
//! - Password hashing with Argon2id, plus verification of legacy digests
//! - Session token generation
//! - Session lifetime policy

mod password;
mod session;
mod token;

#[cfg(test)]
mod password_props;

pub use password::{PasswordError, PasswordScheme, hash_password, legacy_digest, verify_password};
pub use session::{
    EXTENDED_TTL_DAYS, STANDARD_TTL_DAYS, SessionLifetime, SessionTtl, is_active,
};
pub use token::{SESSION_ID_LEN, generate_session_id, is_session_id};
