//! Session lifetime policy.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default lifetime for sessions created without an explicit policy.
pub const STANDARD_TTL_DAYS: i64 = 7;

/// Lifetime used by the login form when the user asks to be remembered.
pub const EXTENDED_TTL_DAYS: i64 = 30;

/// How long a new session stays valid.
///
/// Both variants resolve to a day count through [`SessionTtl`], so deployments
/// can tune them without touching the call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionLifetime {
    /// Short-lived session.
    #[default]
    Standard,
    /// Long-lived "remember me" session.
    Extended,
}

impl SessionLifetime {
    /// Picks the lifetime from the login form's `remember` field.
    ///
    /// Absent means remember; only an explicit `off`, `false` or `0` opts out.
    #[must_use]
    pub fn from_remember_flag(flag: Option<&str>) -> Self {
        match flag.map(|f| f.trim().to_ascii_lowercase()) {
            Some(f) if matches!(f.as_str(), "off" | "false" | "0") => Self::Standard,
            _ => Self::Extended,
        }
    }
}

/// Day counts backing each [`SessionLifetime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTtl {
    /// Days for [`SessionLifetime::Standard`].
    pub standard_days: i64,
    /// Days for [`SessionLifetime::Extended`].
    pub extended_days: i64,
}

impl Default for SessionTtl {
    fn default() -> Self {
        Self {
            standard_days: STANDARD_TTL_DAYS,
            extended_days: EXTENDED_TTL_DAYS,
        }
    }
}

impl SessionTtl {
    /// Duration of a session with the given lifetime.
    #[must_use]
    pub fn duration(&self, lifetime: SessionLifetime) -> Duration {
        match lifetime {
            SessionLifetime::Standard => Duration::days(self.standard_days),
            SessionLifetime::Extended => Duration::days(self.extended_days),
        }
    }

    /// Expiry instant for a session created at `now`.
    #[must_use]
    pub fn expires_at(&self, lifetime: SessionLifetime, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.duration(lifetime)
    }

    /// Cookie `Max-Age` in seconds for the given lifetime.
    #[must_use]
    pub fn max_age_secs(&self, lifetime: SessionLifetime) -> i64 {
        self.duration(lifetime).num_seconds()
    }
}

/// A session is valid strictly before its expiry instant.
#[must_use]
pub fn is_active(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at > now
}
