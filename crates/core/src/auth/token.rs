//! Session token generation.

use std::fmt::Write;

use argon2::password_hash::rand_core::{OsRng, RngCore};

/// Number of random bytes in a session token.
pub const SESSION_ID_BYTES: usize = 32;

/// Length of the hex-encoded session token.
pub const SESSION_ID_LEN: usize = SESSION_ID_BYTES * 2;

/// Generates an unguessable session token.
///
/// 256 bits from the operating system CSPRNG, lowercase hex encoded.
#[must_use]
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    to_hex(&bytes)
}

/// Returns true if `value` has the shape of a token from [`generate_session_id`].
///
/// Lets the request gate skip a store round-trip for garbage cookies.
#[must_use]
pub fn is_session_id(value: &str) -> bool {
    value.len() == SESSION_ID_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_session_id_shape() {
        let id = generate_session_id();
        assert_eq!(id.len(), SESSION_ID_LEN);
        assert!(is_session_id(&id));
    }

    #[test]
    fn test_session_ids_are_distinct() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_session_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_session_id_bytes_roughly_uniform() {
        // 4096 tokens * 32 bytes = 131072 samples, 512 expected per byte value.
        let mut counts = [0u32; 256];
        for _ in 0..4096 {
            let mut bytes = [0u8; SESSION_ID_BYTES];
            OsRng.fill_bytes(&mut bytes);
            for b in bytes {
                counts[usize::from(b)] += 1;
            }
        }

        // Chi-square with 255 degrees of freedom; 400 is far beyond p=0.001.
        let expected: u64 = 512;
        let chi_square: u64 = counts
            .iter()
            .map(|&c| {
                let diff = u64::from(c).abs_diff(expected);
                diff * diff
            })
            .sum::<u64>()
            / expected;
        assert!(chi_square < 400, "chi-square too high: {chi_square}");
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(to_hex(&[0x00, 0x0f, 0xab, 0xff]), "000fabff");
    }

    #[test]
    fn test_is_session_id_rejects_malformed() {
        assert!(!is_session_id(""));
        assert!(!is_session_id("abc"));
        assert!(!is_session_id(&"A".repeat(SESSION_ID_LEN)));
        assert!(!is_session_id(&"g".repeat(SESSION_ID_LEN)));
        assert!(!is_session_id(&"a".repeat(SESSION_ID_LEN + 2)));
        assert!(is_session_id(&"0".repeat(SESSION_ID_LEN)));
    }
}
