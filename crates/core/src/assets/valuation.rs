//! Yen valuation of asset holdings and per-category breakdowns.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::category::AssetCategory;

/// Yen value of a crypto holding: quantity × USD price × USD/JPY rate.
#[must_use]
pub fn crypto_value(quantity: Decimal, usd_price: Decimal, jpy_rate: Decimal) -> Decimal {
    quantity.saturating_mul(usd_price).saturating_mul(jpy_rate)
}

/// Yen value of a precious metal holding: quantity × yen price.
#[must_use]
pub fn gold_value(quantity: Decimal, jpy_price: Decimal) -> Decimal {
    quantity.saturating_mul(jpy_price)
}

/// Rounds a yen value to whole yen, halves away from zero.
///
/// Values beyond `i64` clamp to the nearest bound.
#[must_use]
pub fn round_yen(value: Decimal) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Asset totals of one snapshot, split by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    /// Cash and deposits.
    pub cash: i64,
    /// Loyalty points.
    pub points: i64,
    /// Physical assets (gold holdings plus manual lines).
    pub real_assets: i64,
    /// Brokerage accounts.
    pub securities: i64,
    /// Crypto holdings plus manual lines.
    pub crypto: i64,
    /// Sum of all categories.
    pub total: i64,
}

impl CategoryBreakdown {
    /// Builds a breakdown from manual item lines and holding valuations.
    ///
    /// `items` yields `(category key, amount)`; lines with an unknown key are
    /// ignored. Gold and crypto valuations are rounded once per snapshot,
    /// after summing.
    #[must_use]
    pub fn build<'a>(
        items: impl IntoIterator<Item = (&'a str, i64)>,
        crypto_total: Decimal,
        gold_total: Decimal,
    ) -> Self {
        let mut breakdown = Self {
            real_assets: round_yen(gold_total),
            crypto: round_yen(crypto_total),
            ..Self::default()
        };

        for (key, amount) in items {
            let Ok(category) = key.parse::<AssetCategory>() else {
                continue;
            };
            let slot = breakdown.slot_mut(category);
            *slot = slot.saturating_add(amount);
        }

        breakdown.total = breakdown
            .values()
            .into_iter()
            .fold(0, i64::saturating_add);
        breakdown
    }

    /// Amount in a single category.
    #[must_use]
    pub const fn get(&self, category: AssetCategory) -> i64 {
        match category {
            AssetCategory::Cash => self.cash,
            AssetCategory::Points => self.points,
            AssetCategory::RealAssets => self.real_assets,
            AssetCategory::Securities => self.securities,
            AssetCategory::Crypto => self.crypto,
        }
    }

    const fn slot_mut(&mut self, category: AssetCategory) -> &mut i64 {
        match category {
            AssetCategory::Cash => &mut self.cash,
            AssetCategory::Points => &mut self.points,
            AssetCategory::RealAssets => &mut self.real_assets,
            AssetCategory::Securities => &mut self.securities,
            AssetCategory::Crypto => &mut self.crypto,
        }
    }

    fn values(&self) -> [i64; 5] {
        AssetCategory::ALL.map(|c| self.get(c))
    }
}
