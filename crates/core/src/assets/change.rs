//! Snapshot-over-snapshot percentage change.

use rust_decimal::Decimal;
use serde::Serialize;

use super::valuation::CategoryBreakdown;

/// Percentage change from `previous` to `current`.
///
/// A zero baseline has no meaningful ratio: growth from zero reads as 100%,
/// anything else as 0%.
///
/// ```
/// use kakeibo_core::assets::percent_change;
/// use rust_decimal::Decimal;
///
/// assert_eq!(percent_change(150, 200), Decimal::from(-25));
/// assert_eq!(percent_change(50, 0), Decimal::ONE_HUNDRED);
/// ```
#[must_use]
pub fn percent_change(current: i64, previous: i64) -> Decimal {
    if previous == 0 {
        return if current > 0 {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }

    let current = Decimal::from(current);
    let previous = Decimal::from(previous);
    ((current - previous) / previous * Decimal::ONE_HUNDRED).normalize()
}

/// Per-category change against the preceding snapshot.
///
/// Every field is `None` for the first snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BreakdownChanges {
    /// Cash change in percent.
    pub cash: Option<Decimal>,
    /// Points change in percent.
    pub points: Option<Decimal>,
    /// Real assets change in percent.
    pub real_assets: Option<Decimal>,
    /// Securities change in percent.
    pub securities: Option<Decimal>,
    /// Crypto change in percent.
    pub crypto: Option<Decimal>,
    /// Total change in percent.
    pub total: Option<Decimal>,
}

impl BreakdownChanges {
    /// Changes from `previous` to `current`.
    #[must_use]
    pub fn between(current: &CategoryBreakdown, previous: &CategoryBreakdown) -> Self {
        Self {
            cash: Some(percent_change(current.cash, previous.cash)),
            points: Some(percent_change(current.points, previous.points)),
            real_assets: Some(percent_change(current.real_assets, previous.real_assets)),
            securities: Some(percent_change(current.securities, previous.securities)),
            crypto: Some(percent_change(current.crypto, previous.crypto)),
            total: Some(percent_change(current.total, previous.total)),
        }
    }
}

/// One snapshot of the asset comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetComparisonRow {
    /// Snapshot month (`YYYY-MM`).
    pub record_date: String,
    /// Category totals.
    #[serde(flatten)]
    pub breakdown: CategoryBreakdown,
    /// Change against the preceding snapshot.
    pub changes: BreakdownChanges,
}

/// Attaches changes to chronologically ordered snapshots.
///
/// Input must be oldest first; the first row gets empty changes.
#[must_use]
pub fn with_changes(snapshots: Vec<(String, CategoryBreakdown)>) -> Vec<AssetComparisonRow> {
    let mut previous: Option<CategoryBreakdown> = None;
    snapshots
        .into_iter()
        .map(|(record_date, breakdown)| {
            let changes = previous
                .as_ref()
                .map(|prev| BreakdownChanges::between(&breakdown, prev))
                .unwrap_or_default();
            previous = Some(breakdown);
            AssetComparisonRow {
                record_date,
                breakdown,
                changes,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(50, 0, dec!(100))]
    #[case(0, 0, dec!(0))]
    #[case(-10, 0, dec!(0))]
    #[case(150, 200, dec!(-25))]
    #[case(300, 200, dec!(50))]
    #[case(0, 200, dec!(-100))]
    #[case(-50, -100, dec!(-50))]
    fn test_percent_change(#[case] current: i64, #[case] previous: i64, #[case] expected: Decimal) {
        assert_eq!(percent_change(current, previous), expected);
    }

    #[test]
    fn test_percent_change_keeps_fraction() {
        let change = percent_change(1, 3);
        assert!(change < dec!(-66.66) && change > dec!(-66.67), "got {change}");
    }

    #[test]
    fn test_first_snapshot_has_no_changes() {
        let a = CategoryBreakdown::build([("cash", 100)], dec!(0), dec!(0));
        let b = CategoryBreakdown::build([("cash", 150)], dec!(0), dec!(0));
        let rows = with_changes(vec![("2024-01".into(), a), ("2024-02".into(), b)]);

        assert_eq!(rows[0].changes, BreakdownChanges::default());
        assert_eq!(rows[1].changes.cash, Some(dec!(50)));
        assert_eq!(rows[1].changes.points, Some(dec!(0)));
        assert_eq!(rows[1].changes.total, Some(dec!(50)));
    }

    #[test]
    fn test_with_changes_empty() {
        assert!(with_changes(Vec::new()).is_empty());
    }
}
