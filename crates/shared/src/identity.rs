//! The authenticated caller.

use serde::{Deserialize, Serialize};

/// Identity resolved from a valid session.
///
/// Attached once per request by the session gate and passed to handlers by
/// value; it is never mutated after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID.
    pub id: i32,
    /// Login email.
    pub email: String,
}

impl CurrentUser {
    /// Creates a new identity.
    #[must_use]
    pub fn new(id: i32, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}
