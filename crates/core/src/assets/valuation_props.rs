//! Property-based tests for asset valuation and change.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::category::AssetCategory;
use super::change::percent_change;
use super::valuation::{CategoryBreakdown, crypto_value, round_yen};

/// Strategy for yen amounts in a realistic household range.
fn yen() -> impl Strategy<Value = i64> {
    -10_000_000i64..1_000_000_000i64
}

/// Strategy for decimal quantities with up to 8 fractional digits.
fn quantity() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000i64).prop_map(|units| Decimal::new(units, 8))
}

/// Strategy for a category key, including one that is not recognised.
fn category_key() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(AssetCategory::Cash.as_str()),
        Just(AssetCategory::Points.as_str()),
        Just(AssetCategory::RealAssets.as_str()),
        Just(AssetCategory::Securities.as_str()),
        Just(AssetCategory::Crypto.as_str()),
        Just("other"),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Rounding never moves a value by more than half a yen.
    #[test]
    fn prop_round_yen_within_half(q in quantity(), price in 0i64..10_000_000i64) {
        let value = crypto_value(q, Decimal::from(price), Decimal::ONE);
        let rounded = Decimal::from(round_yen(value));
        prop_assert!((rounded - value).abs() <= Decimal::new(5, 1));
    }

    /// The total is always the sum of the five category buckets.
    #[test]
    fn prop_breakdown_total_is_sum(
        items in prop::collection::vec((category_key(), yen()), 0..20),
        crypto in quantity(),
        gold in quantity(),
    ) {
        let breakdown = CategoryBreakdown::build(items.iter().copied(), crypto, gold);
        let sum: i64 = AssetCategory::ALL.iter().map(|c| breakdown.get(*c)).sum();
        prop_assert_eq!(breakdown.total, sum);
    }

    /// Unknown category lines never change the breakdown.
    #[test]
    fn prop_unknown_lines_ignored(
        items in prop::collection::vec((category_key(), yen()), 0..20),
        noise in yen(),
    ) {
        let base = CategoryBreakdown::build(items.iter().copied(), Decimal::ZERO, Decimal::ZERO);
        let mut noisy = items.clone();
        noisy.push(("unlisted", noise));
        let with_noise = CategoryBreakdown::build(noisy.iter().copied(), Decimal::ZERO, Decimal::ZERO);
        prop_assert_eq!(base, with_noise);
    }

    /// Growth from a positive baseline is positive, decline is negative.
    #[test]
    fn prop_change_sign_follows_direction(previous in 1i64..1_000_000_000, current in yen()) {
        let change = percent_change(current, previous);
        prop_assert_eq!(change.is_sign_positive() && !change.is_zero(), current > previous);
        prop_assert_eq!(change.is_zero(), current == previous);
    }
}
