//! Monthly income and expense summaries.
//!
//! A month's burden is what the credit cards will pull minus what is already
//! parked in the linked bank accounts. Only a positive burden eats into the
//! expected income.

use serde::Serialize;

/// Summed payments and balances for one monthly record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    /// Sum of card payment amounts.
    pub total_payments: i64,
    /// Sum of bank balances.
    pub total_balances: i64,
}

impl MonthlyTotals {
    /// Sums raw payment and balance amounts.
    #[must_use]
    pub fn from_amounts(
        payments: impl IntoIterator<Item = i64>,
        balances: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            total_payments: payments.into_iter().fold(0, i64::saturating_add),
            total_balances: balances.into_iter().fold(0, i64::saturating_add),
        }
    }

    /// Card payments minus bank balances. May be negative.
    #[must_use]
    pub const fn net_burden(&self) -> i64 {
        self.total_payments.saturating_sub(self.total_balances)
    }

    /// Net burden floored at zero.
    #[must_use]
    pub fn floored_net_burden(&self) -> i64 {
        self.net_burden().max(0)
    }

    /// Disposable balance once the burden is covered from income.
    #[must_use]
    pub fn balance(&self, expected_income: i64) -> i64 {
        expected_income.saturating_sub(self.floored_net_burden())
    }
}

/// One row of the month-over-month comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    /// Monthly record id.
    pub id: i32,
    /// Month key (`YYYY-MM`).
    pub year_month: String,
    /// Expected take-home income.
    pub expected_income: i64,
    /// Sum of card payments.
    pub total_payments: i64,
    /// Sum of bank balances.
    pub total_balances: i64,
    /// Raw net burden (not floored).
    pub net_burden: i64,
    /// Free-form notes, empty when unset.
    pub notes: String,
}

impl ComparisonRow {
    /// Builds a comparison row from a record and its totals.
    #[must_use]
    pub fn new(
        id: i32,
        year_month: String,
        expected_income: i64,
        notes: Option<String>,
        totals: MonthlyTotals,
    ) -> Self {
        Self {
            id,
            year_month,
            expected_income,
            total_payments: totals.total_payments,
            total_balances: totals.total_balances,
            net_burden: totals.net_burden(),
            notes: notes.unwrap_or_default(),
        }
    }
}

/// One income row of the reports page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeReportRow {
    /// Month key (`YYYY-MM`).
    pub year_month: String,
    /// Expected take-home income.
    pub expected_income: i64,
    /// Sum of card payments.
    pub total_payments: i64,
    /// Sum of bank balances.
    pub total_balances: i64,
    /// Net burden floored at zero.
    pub net_burden: i64,
    /// Income left after the burden.
    pub balance: i64,
}

impl IncomeReportRow {
    /// Builds a report row from a record and its totals.
    #[must_use]
    pub fn new(year_month: String, expected_income: i64, totals: MonthlyTotals) -> Self {
        Self {
            year_month,
            expected_income,
            total_payments: totals.total_payments,
            total_balances: totals.total_balances,
            net_burden: totals.floored_net_burden(),
            balance: totals.balance(expected_income),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[50_000, 30_000], &[60_000], 20_000, 20_000, 280_000)]
    #[case(&[10_000], &[25_000], -15_000, 0, 300_000)]
    #[case(&[], &[], 0, 0, 300_000)]
    #[case(&[100_000, 250_000], &[], 350_000, 350_000, -50_000)]
    fn test_burden_and_balance(
        #[case] payments: &[i64],
        #[case] balances: &[i64],
        #[case] net: i64,
        #[case] floored: i64,
        #[case] balance: i64,
    ) {
        let totals = MonthlyTotals::from_amounts(payments.iter().copied(), balances.iter().copied());
        assert_eq!(totals.net_burden(), net);
        assert_eq!(totals.floored_net_burden(), floored);
        assert_eq!(totals.balance(300_000), balance);
    }

    #[test]
    fn test_comparison_row_keeps_raw_burden() {
        let totals = MonthlyTotals::from_amounts([1_000], [4_000]);
        let row = ComparisonRow::new(7, "2024-05".into(), 200_000, None, totals);
        assert_eq!(row.net_burden, -3_000);
        assert_eq!(row.notes, "");
    }

    #[test]
    fn test_report_row_floors_burden() {
        let totals = MonthlyTotals::from_amounts([1_000], [4_000]);
        let row = IncomeReportRow::new("2024-05".into(), 200_000, totals);
        assert_eq!(row.net_burden, 0);
        assert_eq!(row.balance, 200_000);
    }

    #[test]
    fn test_totals_saturate() {
        let totals = MonthlyTotals::from_amounts([i64::MAX, 1], [i64::MIN]);
        assert_eq!(totals.total_payments, i64::MAX);
        assert_eq!(totals.net_burden(), i64::MAX);
    }
}
