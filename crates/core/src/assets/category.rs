//! Asset categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a category key is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown asset category: {0}")]
pub struct UnknownCategory(pub String);

/// Bucket an asset line is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    /// Cash and deposits.
    Cash,
    /// Loyalty points.
    Points,
    /// Physical assets such as gold.
    RealAssets,
    /// Brokerage accounts.
    Securities,
    /// Crypto currencies.
    Crypto,
}

impl AssetCategory {
    /// All categories in reporting order.
    pub const ALL: [Self; 5] = [
        Self::Cash,
        Self::Points,
        Self::RealAssets,
        Self::Securities,
        Self::Crypto,
    ];

    /// Storage key of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Points => "points",
            Self::RealAssets => "real_assets",
            Self::Securities => "securities",
            Self::Crypto => "crypto",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
