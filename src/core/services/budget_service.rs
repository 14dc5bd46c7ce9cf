use crate::domain::{parse_amount, AmountInput, BudgetSetting, OwnerId, Period, RecordKind};
use crate::ledger::{average_daily_amount, budget_status, BudgetStatus};
use crate::storage::{RecordQuery, RecordStore};

use super::{ServiceError, ServiceResult};

/// Daily food budget per month.
pub struct BudgetService;

impl BudgetService {
    /// Creates or replaces the daily limit for `period`.
    pub fn set_daily_limit(
        store: &dyn RecordStore,
        owner: &OwnerId,
        period: Period,
        daily_limit: impl Into<AmountInput>,
    ) -> ServiceResult<BudgetSetting> {
        let daily_limit = parse_amount(daily_limit).map_err(ServiceError::rejected)?;
        if daily_limit <= 0.0 {
            return Err(ServiceError::Invalid(
                "Daily budget must be greater than zero".into(),
            ));
        }
        let budget = BudgetSetting::new(owner.clone(), period, daily_limit);
        store.upsert_budget(&budget)?;
        tracing::info!(%owner, %period, daily_limit, "daily budget saved");
        Ok(budget)
    }

    /// Daily limit for `period`, zero when none was set.
    pub fn daily_limit(
        store: &dyn RecordStore,
        owner: &OwnerId,
        period: Period,
    ) -> ServiceResult<f64> {
        Ok(store
            .get_budget(owner, period)?
            .map(|budget| budget.daily_limit)
            .unwrap_or(0.0))
    }

    /// Average daily food spend for `period` against its limit.
    pub fn food_status(
        store: &dyn RecordStore,
        owner: &OwnerId,
        period: Period,
    ) -> ServiceResult<BudgetStatus> {
        let query = RecordQuery::for_period(RecordKind::Food, period);
        let records = store.list_records(owner, &query)?;
        let average = average_daily_amount(&records, period);
        Ok(budget_status(average, Self::daily_limit(store, owner, period)?))
    }
}
