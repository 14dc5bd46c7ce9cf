//! Prediction rollup: monthly and yearly totals of planned income and expense, plus
//! the running savings balance seeded by the current saving.

pub mod plan;
pub mod rollup;

pub use crate::domain::prediction::{custom_field_key, field_label};
pub use plan::{complete_year, ensure_field_completeness, YearPlan};
pub use rollup::{
    cumulative_saving_at_month, month_totals, projection_series, totals_for_month,
    yearly_totals, MonthTotals, ProjectionPoint, YearlyTotals, YEAR_END_MONTH,
};
