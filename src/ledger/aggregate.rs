//! Day, category and month rollups over monetary records.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{coerce_amount, MonetaryRecord, Period};

/// Records whose date falls inside `period`.
pub fn records_in_period<'a>(
    records: impl IntoIterator<Item = &'a MonetaryRecord>,
    period: Period,
) -> Vec<&'a MonetaryRecord> {
    records
        .into_iter()
        .filter(|record| period.contains(record.occurred_on))
        .collect()
}

/// Sum of coerced amounts.
pub fn total_amount<'a>(records: impl IntoIterator<Item = &'a MonetaryRecord>) -> f64 {
    records
        .into_iter()
        .map(|record| coerce_amount(record.amount))
        .sum()
}

/// Per-day sums for one month, zero-filled. Index 0 is day 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub period: Period,
    totals: Vec<f64>,
}

impl DailyTotals {
    pub fn empty(period: Period) -> Self {
        Self {
            period,
            totals: vec![0.0; period.days() as usize],
        }
    }

    /// Amount for a 1-based day; days outside the month read as zero.
    pub fn day(&self, day: u32) -> f64 {
        day.checked_sub(1)
            .and_then(|index| self.totals.get(index as usize))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// `(day, amount)` pairs in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.totals
            .iter()
            .enumerate()
            .map(|(index, amount)| (index as u32 + 1, *amount))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.totals
    }

    pub fn total(&self) -> f64 {
        self.totals.iter().sum()
    }

    fn add(&mut self, date: NaiveDate, amount: f64) {
        if let Some(slot) = self.totals.get_mut(date.day0() as usize) {
            *slot += amount;
        }
    }
}

pub fn group_by_day<'a>(
    records: impl IntoIterator<Item = &'a MonetaryRecord>,
    period: Period,
) -> DailyTotals {
    let mut daily = DailyTotals::empty(period);
    for record in records {
        if period.contains(record.occurred_on) {
            daily.add(record.occurred_on, coerce_amount(record.amount));
        }
    }
    daily
}

/// Sums per category label. Missing or blank categories land in
/// [`UNCATEGORIZED`](crate::domain::UNCATEGORIZED).
pub fn group_by_category<'a>(
    records: impl IntoIterator<Item = &'a MonetaryRecord>,
) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals
            .entry(record.category_label().to_string())
            .or_insert(0.0) += coerce_amount(record.amount);
    }
    totals
}

/// One slice of a category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub percent: f64,
}

/// Category sums with their share of the total, largest first.
pub fn category_breakdown<'a>(
    records: impl IntoIterator<Item = &'a MonetaryRecord>,
) -> Vec<CategoryShare> {
    let totals = group_by_category(records);
    let grand_total: f64 = totals.values().sum();
    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            percent: if grand_total > 0.0 {
                amount / grand_total * 100.0
            } else {
                0.0
            },
            category,
            amount,
        })
        .collect();
    shares.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    shares
}

/// Per-month sums for `year`; index 0 is January.
pub fn group_by_month<'a>(
    records: impl IntoIterator<Item = &'a MonetaryRecord>,
    year: i32,
) -> [f64; 12] {
    let mut months = [0.0; 12];
    for record in records {
        if record.occurred_on.year() == year {
            months[record.occurred_on.month0() as usize] += coerce_amount(record.amount);
        }
    }
    months
}

/// Number of distinct dates in `period` that have at least one record.
pub fn active_days<'a>(
    records: impl IntoIterator<Item = &'a MonetaryRecord>,
    period: Period,
) -> usize {
    records
        .into_iter()
        .map(|record| record.occurred_on)
        .filter(|date| period.contains(*date))
        .collect::<BTreeSet<_>>()
        .len()
}

/// Average spend per active day in `period`.
///
/// With no active days the total is spread over the whole month instead, which is
/// zero whenever there is nothing to spread.
pub fn average_daily_amount<'a>(
    records: impl IntoIterator<Item = &'a MonetaryRecord>,
    period: Period,
) -> f64 {
    let in_period = records_in_period(records, period);
    let total = total_amount(in_period.iter().copied());
    if total == 0.0 {
        return 0.0;
    }
    match active_days(in_period.iter().copied(), period) {
        0 => total / period.days() as f64,
        days => total / days as f64,
    }
}

/// Everything a monthly page shows for one record kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub period: Period,
    pub total: f64,
    pub average_daily: f64,
    pub record_count: usize,
    pub daily: DailyTotals,
    pub by_category: BTreeMap<String, f64>,
    pub breakdown: Vec<CategoryShare>,
}

impl MonthlySummary {
    pub fn build<'a>(
        records: impl IntoIterator<Item = &'a MonetaryRecord>,
        period: Period,
    ) -> Self {
        let in_period = records_in_period(records, period);
        Self {
            period,
            total: total_amount(in_period.iter().copied()),
            average_daily: average_daily_amount(in_period.iter().copied(), period),
            record_count: in_period.len(),
            daily: group_by_day(in_period.iter().copied(), period),
            by_category: group_by_category(in_period.iter().copied()),
            breakdown: category_breakdown(in_period.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OwnerId, RecordKind};

    fn expense(amount: f64, category: Option<&str>, date: (i32, u32, u32)) -> MonetaryRecord {
        MonetaryRecord::new(
            OwnerId::new("u1"),
            RecordKind::Expense,
            amount,
            category.map(str::to_string),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        )
    }

    fn march_2024() -> Vec<MonetaryRecord> {
        vec![
            expense(100.0, Some("Food"), (2024, 3, 1)),
            expense(50.0, Some("Food"), (2024, 3, 1)),
            expense(30.0, Some("Transport"), (2024, 3, 15)),
        ]
    }

    #[test]
    fn march_example_groups_by_day_and_category() {
        let period = Period::new(2024, 3).unwrap();
        let records = march_2024();

        let daily = group_by_day(&records, period);
        assert_eq!(daily.len(), 31);
        assert_eq!(daily.day(1), 150.0);
        assert_eq!(daily.day(15), 30.0);
        assert_eq!(daily.iter().filter(|(_, amount)| *amount == 0.0).count(), 29);

        let by_category = group_by_category(&records);
        assert_eq!(by_category.len(), 2);
        assert_eq!(by_category["Food"], 150.0);
        assert_eq!(by_category["Transport"], 30.0);

        assert_eq!(average_daily_amount(&records, period), 90.0);
    }

    #[test]
    fn daily_totals_match_month_length_and_sum() {
        for (year, month, days) in [(2024, 2, 29), (2023, 2, 28), (2025, 4, 30), (2025, 12, 31)] {
            let period = Period::new(year, month).unwrap();
            let records = vec![
                expense(12.5, None, (year, month, 1)),
                expense(7.5, None, (year, month, days)),
            ];
            let daily = group_by_day(&records, period);
            assert_eq!(daily.len(), days as usize);
            assert_eq!(daily.total(), total_amount(&records));
        }
    }

    #[test]
    fn out_of_period_records_are_ignored() {
        let period = Period::new(2024, 3).unwrap();
        let mut records = march_2024();
        records.push(expense(999.0, Some("Food"), (2024, 4, 1)));
        assert_eq!(group_by_day(&records, period).total(), 180.0);
        assert_eq!(records_in_period(&records, period).len(), 3);
    }

    #[test]
    fn blank_categories_are_uncategorized() {
        let records = vec![
            expense(10.0, None, (2024, 3, 2)),
            expense(5.0, Some("  "), (2024, 3, 3)),
        ];
        let by_category = group_by_category(&records);
        assert_eq!(by_category.get(crate::domain::UNCATEGORIZED), Some(&15.0));
    }

    #[test]
    fn breakdown_is_sorted_with_percentages() {
        let shares = category_breakdown(&march_2024());
        assert_eq!(shares[0].category, "Food");
        assert!((shares[0].percent - 150.0 / 180.0 * 100.0).abs() < 1e-9);
        assert_eq!(shares[1].category, "Transport");
        let sum: f64 = shares.iter().map(|share| share.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!(category_breakdown(&Vec::<MonetaryRecord>::new()).is_empty());
    }

    #[test]
    fn average_is_zero_without_records() {
        let period = Period::new(2024, 3).unwrap();
        assert_eq!(average_daily_amount(&Vec::<MonetaryRecord>::new(), period), 0.0);
    }

    #[test]
    fn average_divides_by_distinct_days() {
        let period = Period::new(2025, 6).unwrap();
        let records = vec![
            expense(10.0, None, (2025, 6, 1)),
            expense(20.0, None, (2025, 6, 2)),
            expense(30.0, None, (2025, 6, 2)),
            expense(40.0, None, (2025, 6, 30)),
        ];
        assert_eq!(active_days(&records, period), 3);
        assert_eq!(average_daily_amount(&records, period), 100.0 / 3.0);
    }

    #[test]
    fn groups_by_month_within_year() {
        let records = vec![
            expense(10.0, None, (2025, 1, 5)),
            expense(20.0, None, (2025, 1, 28)),
            expense(30.0, None, (2025, 12, 31)),
            expense(40.0, None, (2024, 12, 31)),
        ];
        let months = group_by_month(&records, 2025);
        assert_eq!(months[0], 30.0);
        assert_eq!(months[11], 30.0);
        assert_eq!(months.iter().sum::<f64>(), 60.0);
    }

    #[test]
    fn summary_collects_all_views() {
        let period = Period::new(2024, 3).unwrap();
        let summary = MonthlySummary::build(&march_2024(), period);
        assert_eq!(summary.total, 180.0);
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.average_daily, 90.0);
        assert_eq!(summary.daily.len(), 31);
        assert_eq!(summary.breakdown.len(), 2);
    }
}
