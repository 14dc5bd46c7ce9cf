//! Ledger aggregation: daily, per-category and per-month rollups of monetary records,
//! category filtering and daily budget checks.
//!
//! Every function here is pure over an in-memory slice of records. Amounts are read
//! through [`coerce_amount`], so a malformed value contributes zero instead of failing
//! the whole computation.

pub mod aggregate;
pub mod budget_status;
pub mod filter;

pub use crate::domain::{coerce_amount, days_in_month, AmountInput};
pub use aggregate::{
    active_days, average_daily_amount, category_breakdown, group_by_category, group_by_day,
    group_by_month, records_in_period, total_amount, CategoryShare, DailyTotals,
    MonthlySummary,
};
pub use budget_status::{budget_status, BudgetStatus, BudgetTier};
pub use filter::{filter_by_categories, CategorySelection, ALL_CATEGORIES};
