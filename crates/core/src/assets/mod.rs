//! Asset snapshots: categories, valuation and month-over-month change.
//!
//! A snapshot (asset record) holds three kinds of lines: manual item amounts
//! in yen, crypto holdings priced in USD, and precious metal holdings priced
//! in yen. Reports fold all three into a [`CategoryBreakdown`].

mod category;
mod change;
mod valuation;

#[cfg(test)]
mod valuation_props;

pub use category::{AssetCategory, UnknownCategory};
pub use change::{AssetComparisonRow, BreakdownChanges, percent_change, with_changes};
pub use valuation::{CategoryBreakdown, crypto_value, gold_value, round_yen};

use rust_decimal::Decimal;
use serde::Deserialize;

/// A manual asset line to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssetItem {
    /// Category key.
    pub category: String,
    /// Display name.
    pub name: String,
    /// Amount in yen.
    pub amount: i64,
    /// Optional memo.
    pub memo: Option<String>,
}

/// A crypto holding to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCryptoHolding {
    /// Coin name.
    pub name: String,
    /// Units held.
    pub quantity: Decimal,
    /// Price per unit in USD.
    pub usd_price: Decimal,
    /// USD to JPY rate.
    pub jpy_rate: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

/// A precious metal holding to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoldHolding {
    /// Holding name.
    pub name: String,
    /// Units held (grams).
    pub quantity: Decimal,
    /// Price per unit in yen.
    pub jpy_price: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

/// Amount change for one asset item in a bulk update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ItemAmountUpdate {
    /// Asset item id.
    pub id: i32,
    /// New amount in yen.
    pub amount: i64,
}

/// Price change for one crypto holding in a bulk or single update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CryptoUpdate {
    /// Crypto holding id.
    pub id: i32,
    /// Units held.
    pub quantity: Decimal,
    /// Price per unit in USD.
    pub usd_price: Decimal,
    /// USD to JPY rate.
    pub jpy_rate: Decimal,
}

/// Price change for one gold holding in a bulk update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GoldUpdate {
    /// Gold holding id.
    pub id: i32,
    /// Units held.
    pub quantity: Decimal,
    /// Price per unit in yen.
    pub jpy_price: Decimal,
}

/// Finds the snapshot preceding the current one.
///
/// `records` must be ordered newest first, the order the records list is
/// displayed in. Returns `None` for the oldest snapshot or when the current
/// one is not in the list.
pub fn previous_record<T>(records: &[T], is_current: impl Fn(&T) -> bool) -> Option<&T> {
    let index = records.iter().position(is_current)?;
    records.get(index + 1)
}
