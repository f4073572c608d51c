//! Property-based tests for password hashing and session tokens.

use proptest::prelude::*;

use super::password::{PasswordScheme, hash_password, legacy_digest, verify_password};
use super::token::{generate_session_id, is_session_id};

/// Strategy for printable passwords of realistic length.
fn password() -> impl Strategy<Value = String> {
    "[ -~]{1,32}"
}

proptest! {
    // Argon2 is deliberately slow; keep the case count low.
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// A password always verifies against its own Argon2 hash.
    #[test]
    fn prop_argon2_roundtrip(pw in password()) {
        let hash = hash_password(&pw).unwrap();
        prop_assert!(verify_password(&pw, &hash).unwrap());
    }

    /// Any other password is rejected by an Argon2 hash.
    #[test]
    fn prop_argon2_rejects_other(pw in password(), other in password()) {
        prop_assume!(pw != other);
        let hash = hash_password(&pw).unwrap();
        prop_assert!(!verify_password(&other, &hash).unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Legacy digests verify their own password and nothing else.
    #[test]
    fn prop_legacy_roundtrip(pw in password(), other in password()) {
        let stored = legacy_digest(&pw);
        prop_assert_eq!(PasswordScheme::detect(&stored), Some(PasswordScheme::LegacySha256));
        prop_assert!(verify_password(&pw, &stored).unwrap());
        if pw != other {
            prop_assert!(!verify_password(&other, &stored).unwrap());
        }
    }

    /// Generated tokens always pass the shape check.
    #[test]
    fn prop_session_id_shape(_seed in any::<u8>()) {
        prop_assert!(is_session_id(&generate_session_id()));
    }
}
