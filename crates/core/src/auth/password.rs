//! Password hashing.
//!
//! New hashes use Argon2id with secure defaults. Accounts migrated from the
//! previous deployment still carry an unsalted SHA-256 hex digest; those are
//! verified through [`PasswordScheme::LegacySha256`] and never produced for
//! new passwords unless explicitly requested.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of a legacy hex digest.
const LEGACY_DIGEST_LEN: usize = 64;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// Storage format of a password hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordScheme {
    /// Salted Argon2id, PHC string format.
    #[default]
    Argon2,
    /// Unsalted SHA-256, lowercase hex.
    LegacySha256,
}

impl PasswordScheme {
    /// Detects the scheme a stored hash was produced with.
    #[must_use]
    pub fn detect(stored: &str) -> Option<Self> {
        if stored.starts_with("$argon2") {
            Some(Self::Argon2)
        } else if stored.len() == LEGACY_DIGEST_LEN
            && stored
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            Some(Self::LegacySha256)
        } else {
            None
        }
    }

    /// Hashes `password` with this scheme.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::HashError` if hashing fails.
    pub fn hash(self, password: &str) -> Result<String, PasswordError> {
        match self {
            Self::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| PasswordError::HashError(e.to_string()))
            }
            Self::LegacySha256 => Ok(legacy_digest(password)),
        }
    }

    /// Verifies `password` against a hash produced by this scheme.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidHash` if the hash format is invalid.
    /// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
    pub fn verify(self, password: &str, stored: &str) -> Result<bool, PasswordError> {
        match self {
            Self::Argon2 => {
                let parsed_hash =
                    PasswordHash::new(stored).map_err(|_| PasswordError::InvalidHash)?;

                match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
                    Ok(()) => Ok(true),
                    Err(argon2::password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(PasswordError::VerifyError(e.to_string())),
                }
            }
            Self::LegacySha256 => Ok(legacy_digest(password) == stored),
        }
    }
}

/// Unsalted SHA-256 digest of `password` as lowercase hex.
#[must_use]
pub fn legacy_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hashes a password using Argon2id.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use kakeibo_core::auth::hash_password;
///
/// let hash = hash_password("my_secure_password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    PasswordScheme::Argon2.hash(password)
}

/// Verifies a password against a stored hash of either scheme.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored value matches no known
/// scheme.
///
/// # Example
///
/// ```
/// use kakeibo_core::auth::{hash_password, legacy_digest, verify_password};
///
/// let hash = hash_password("my_password").unwrap();
/// assert!(verify_password("my_password", &hash).unwrap());
/// assert!(!verify_password("wrong_password", &hash).unwrap());
///
/// assert!(verify_password("old", &legacy_digest("old")).unwrap());
/// ```
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    PasswordScheme::detect(stored)
        .ok_or(PasswordError::InvalidHash)?
        .verify(password, stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "test_password_123!";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, password);
    }

    #[test]
    fn test_verify_correct_password() {
        let hash = hash_password("correct_password").unwrap();
        assert!(verify_password("correct_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("correct_password").unwrap();
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_hashes() {
        let hash1 = hash_password("password1").unwrap();
        let hash2 = hash_password("password1").unwrap();

        // Random salt per hash
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_legacy_digest_known_vector() {
        assert_eq!(
            legacy_digest("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_legacy_digest_is_unsalted() {
        assert_eq!(legacy_digest("same"), legacy_digest("same"));
    }

    #[test]
    fn test_verify_legacy_digest() {
        let stored = legacy_digest("hunter2");
        assert!(verify_password("hunter2", &stored).unwrap());
        assert!(!verify_password("hunter3", &stored).unwrap());
    }

    #[test]
    fn test_detect_scheme() {
        let argon = hash_password("x").unwrap();
        assert_eq!(PasswordScheme::detect(&argon), Some(PasswordScheme::Argon2));
        assert_eq!(
            PasswordScheme::detect(&legacy_digest("x")),
            Some(PasswordScheme::LegacySha256)
        );
        // Uppercase hex was never produced by the legacy scheme
        assert_eq!(
            PasswordScheme::detect(&legacy_digest("x").to_uppercase()),
            None
        );
        assert_eq!(PasswordScheme::detect("plaintext"), None);
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }
}
