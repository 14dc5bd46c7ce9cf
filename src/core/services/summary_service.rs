use crate::domain::{FieldCatalog, OwnerId, Period, RecordKind};
use crate::ledger::{filter_by_categories, group_by_month, CategorySelection, MonthlySummary};
use crate::projection::{ProjectionPoint, YearPlan, YearlyTotals};
use crate::storage::{RecordQuery, RecordStore};

use super::{PredictionService, ServiceResult};

/// Yearly prediction plan with its totals and chart rows.
#[derive(Debug, Clone)]
pub struct ProjectionReport {
    pub plan: YearPlan,
    pub current_saving: f64,
    pub totals: YearlyTotals,
    pub series: Vec<ProjectionPoint>,
}

pub struct SummaryService;

impl SummaryService {
    /// Monthly page data for one record kind, restricted to `selection`.
    pub fn monthly(
        store: &dyn RecordStore,
        owner: &OwnerId,
        kind: RecordKind,
        period: Period,
        selection: &CategorySelection,
    ) -> ServiceResult<MonthlySummary> {
        let records = store.list_records(owner, &RecordQuery::for_period(kind, period))?;
        let selected = filter_by_categories(&records, selection);
        Ok(MonthlySummary::build(selected, period))
    }

    /// Per-month totals of one record kind across `year`.
    pub fn yearly_by_month(
        store: &dyn RecordStore,
        owner: &OwnerId,
        kind: RecordKind,
        year: i32,
    ) -> ServiceResult<[f64; 12]> {
        let first = Period::new(year, 1).map_err(super::ServiceError::rejected)?;
        let last = Period::new(year, 12).map_err(super::ServiceError::rejected)?;
        let records = store.list_records(
            owner,
            &RecordQuery::between(kind, first.first_day(), last.last_day()),
        )?;
        Ok(group_by_month(&records, year))
    }

    /// Projection for `year` seeded with an externally computed `current_saving`.
    pub fn projection(
        store: &dyn RecordStore,
        owner: &OwnerId,
        year: i32,
        catalog: &FieldCatalog,
        current_saving: f64,
    ) -> ServiceResult<ProjectionReport> {
        let plan = PredictionService::load_year(store, owner, year, catalog)?;
        let totals = plan.totals(current_saving);
        let series = plan.series(current_saving);
        Ok(ProjectionReport {
            plan,
            current_saving,
            totals,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::RecordService;
    use crate::domain::{PredictionRecord, RecordDraft};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn seed(store: &MemoryStore, owner: &OwnerId) {
        let entries = [(100.0, "Food", 1), (50.0, "Food", 1), (30.0, "Transport", 15)];
        for (amount, category, day) in entries {
            RecordService::add(
                store,
                owner,
                RecordKind::Expense,
                RecordDraft::new(amount, NaiveDate::from_ymd_opt(2024, 3, day).unwrap())
                    .category(category),
            )
            .unwrap();
        }
    }

    #[test]
    fn monthly_summary_honours_selection() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("u1");
        seed(&store, &owner);
        let period = Period::new(2024, 3).unwrap();

        let all = SummaryService::monthly(
            &store,
            &owner,
            RecordKind::Expense,
            period,
            &CategorySelection::All,
        )
        .unwrap();
        assert_eq!(all.total, 180.0);
        assert_eq!(all.average_daily, 90.0);

        let transport = SummaryService::monthly(
            &store,
            &owner,
            RecordKind::Expense,
            period,
            &CategorySelection::only(["Transport"]),
        )
        .unwrap();
        assert_eq!(transport.total, 30.0);
        assert_eq!(transport.daily.day(15), 30.0);
        assert_eq!(transport.daily.len(), 31);
    }

    #[test]
    fn yearly_by_month_sums_each_month() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("u1");
        seed(&store, &owner);
        let months = SummaryService::yearly_by_month(&store, &owner, RecordKind::Expense, 2024)
            .unwrap();
        assert_eq!(months[2], 180.0);
        assert_eq!(months.iter().sum::<f64>(), 180.0);
    }

    #[test]
    fn projection_report_is_consistent() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("u1");
        PredictionService::save(
            &store,
            PredictionRecord::new(owner.clone(), Period::new(2025, 1).unwrap())
                .with_income("mumsSalary", 3000.0)
                .with_expense("home", 1000.0),
        )
        .unwrap();
        let report =
            SummaryService::projection(&store, &owner, 2025, &FieldCatalog::household(), 500.0)
                .unwrap();
        assert_eq!(report.series.len(), 12);
        assert_eq!(report.series[0].cumulative, 500.0);
        assert_eq!(report.series[1].cumulative, 2500.0);
        assert_eq!(report.totals.projected_saving, 2500.0);
    }
}
