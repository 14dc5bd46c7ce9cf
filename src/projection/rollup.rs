//! Monthly and yearly totals over planned figures, and the running savings line.

use serde::{Deserialize, Serialize};

use crate::domain::PredictionRecord;

/// One month past December; the cumulative value there is the year-end projection.
pub const YEAR_END_MONTH: u32 = 13;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthTotals {
    pub income_total: f64,
    pub expense_total: f64,
    pub balance: f64,
}

pub fn month_totals(record: &PredictionRecord) -> MonthTotals {
    let income_total = record.income.total();
    let expense_total = record.expense.total();
    MonthTotals {
        income_total,
        expense_total,
        balance: income_total - expense_total,
    }
}

/// Totals for a calendar month, zero when the month has no record.
pub fn totals_for_month(records: &[PredictionRecord], month: u32) -> MonthTotals {
    records
        .iter()
        .find(|record| record.period.month == month)
        .map(month_totals)
        .unwrap_or_default()
}

/// Savings entering `month`: `current_saving` plus the balances of every earlier month.
///
/// The target month's own balance is not included. `month` may be
/// [`YEAR_END_MONTH`] to include December.
pub fn cumulative_saving_at_month(
    records: &[PredictionRecord],
    month: u32,
    current_saving: f64,
) -> f64 {
    (1..month.min(YEAR_END_MONTH)).fold(current_saving, |saving, earlier| {
        saving + totals_for_month(records, earlier).balance
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlyTotals {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub projected_saving: f64,
}

pub fn yearly_totals(records: &[PredictionRecord], current_saving: f64) -> YearlyTotals {
    let (total_income, total_expense) = (1..YEAR_END_MONTH)
        .map(|month| totals_for_month(records, month))
        .fold((0.0, 0.0), |(income, expense), totals| {
            (income + totals.income_total, expense + totals.expense_total)
        });
    YearlyTotals {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        projected_saving: cumulative_saving_at_month(records, YEAR_END_MONTH, current_saving),
    }
}

/// A row of the income / expense / cumulative saving chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub month: u32,
    pub label: String,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    pub cumulative: f64,
}

/// Chart rows for each record, in calendar order.
pub fn projection_series(
    records: &[PredictionRecord],
    current_saving: f64,
) -> Vec<ProjectionPoint> {
    let mut ordered: Vec<&PredictionRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.period);
    ordered
        .into_iter()
        .map(|record| {
            let totals = month_totals(record);
            ProjectionPoint {
                month: record.period.month,
                label: record.period.label(),
                income: totals.income_total,
                expense: totals.expense_total,
                balance: totals.balance,
                cumulative: cumulative_saving_at_month(
                    records,
                    record.period.month,
                    current_saving,
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OwnerId, Period};

    fn month(month: u32, income: f64, expense: f64) -> PredictionRecord {
        PredictionRecord::new(OwnerId::new("u1"), Period::new(2025, month).unwrap())
            .with_income("mumsSalary", income)
            .with_expense("home", expense)
    }

    fn year() -> Vec<PredictionRecord> {
        (1..=12)
            .map(|m| month(m, 1000.0 + m as f64 * 10.0, 600.0 + m as f64 * 25.0))
            .collect()
    }

    #[test]
    fn month_totals_coerce_bad_values() {
        let record = month(1, 500.0, 200.0).with_expense("water", f64::NAN);
        let totals = month_totals(&record);
        assert_eq!(totals.income_total, 500.0);
        assert_eq!(totals.expense_total, 200.0);
        assert_eq!(totals.balance, 300.0);
    }

    #[test]
    fn empty_year_keeps_current_saving() {
        let records: Vec<PredictionRecord> = (1..=12)
            .map(|m| PredictionRecord::new(OwnerId::new("u1"), Period::new(2025, m).unwrap()))
            .collect();
        for m in 1..=13 {
            assert_eq!(cumulative_saving_at_month(&records, m, 1000.0), 1000.0);
        }
        assert_eq!(yearly_totals(&records, 1000.0).projected_saving, 1000.0);
    }

    #[test]
    fn cumulative_follows_recurrence() {
        let records = year();
        assert_eq!(cumulative_saving_at_month(&records, 1, 250.0), 250.0);
        for m in 2..=13 {
            let expected = cumulative_saving_at_month(&records, m - 1, 250.0)
                + totals_for_month(&records, m - 1).balance;
            assert_eq!(cumulative_saving_at_month(&records, m, 250.0), expected);
        }
    }

    #[test]
    fn projected_saving_matches_year_end() {
        let records = year();
        let totals = yearly_totals(&records, 5000.0);
        assert_eq!(
            totals.projected_saving,
            cumulative_saving_at_month(&records, YEAR_END_MONTH, 5000.0)
        );
        let direct = 5000.0 + totals.total_income - totals.total_expense;
        assert!((totals.projected_saving - direct).abs() < 1e-6);
    }

    #[test]
    fn missing_months_count_as_zero() {
        let records = vec![month(3, 100.0, 40.0), month(1, 50.0, 0.0)];
        assert_eq!(cumulative_saving_at_month(&records, 3, 0.0), 50.0);
        assert_eq!(cumulative_saving_at_month(&records, 4, 0.0), 110.0);
    }

    #[test]
    fn series_is_ordered_and_labelled() {
        let records = vec![month(2, 100.0, 30.0), month(1, 200.0, 50.0)];
        let series = projection_series(&records, 10.0);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Jan 2025");
        assert_eq!(series[0].cumulative, 10.0);
        assert_eq!(series[1].label, "Feb 2025");
        assert_eq!(series[1].cumulative, 160.0);
        assert_eq!(series[1].balance, 70.0);
    }
}
