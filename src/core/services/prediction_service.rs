use crate::domain::{FieldCatalog, FieldMap, OwnerId, Period, PredictionRecord};
use crate::projection::{complete_year, YearPlan};
use crate::storage::RecordStore;

use super::{ServiceError, ServiceResult};

/// Which side of a prediction a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSide {
    Income,
    Expense,
}

pub struct PredictionService;

impl PredictionService {
    /// Stores `record`, replacing whatever was saved for its month.
    pub fn save(
        store: &dyn RecordStore,
        record: PredictionRecord,
    ) -> ServiceResult<PredictionRecord> {
        Self::validate_fields("income", &record.income)?;
        Self::validate_fields("expense", &record.expense)?;
        store.upsert_prediction(&record)?;
        tracing::debug!(owner = %record.owner_id, period = %record.period, "prediction saved");
        Ok(record)
    }

    pub fn get(
        store: &dyn RecordStore,
        owner: &OwnerId,
        period: Period,
    ) -> ServiceResult<Option<PredictionRecord>> {
        Ok(store.get_prediction(owner, period)?)
    }

    /// All twelve months of `year`, completed with zeroed months and fields.
    pub fn load_year(
        store: &dyn RecordStore,
        owner: &OwnerId,
        year: i32,
        catalog: &FieldCatalog,
    ) -> ServiceResult<YearPlan> {
        let records = store.list_predictions(owner, year)?;
        complete_year(owner, year, records, catalog).map_err(ServiceError::rejected)
    }

    /// Persists every month of a plan.
    pub fn save_year(store: &dyn RecordStore, plan: &YearPlan) -> ServiceResult<()> {
        for month in plan.months() {
            Self::validate_fields("income", &month.income)?;
            Self::validate_fields("expense", &month.expense)?;
            store.upsert_prediction(month)?;
        }
        Ok(())
    }

    /// Adds a custom field to the whole year and saves it. Returns the derived key.
    pub fn add_custom_field(
        store: &dyn RecordStore,
        owner: &OwnerId,
        year: i32,
        catalog: &FieldCatalog,
        side: FieldSide,
        label: &str,
    ) -> ServiceResult<String> {
        let mut plan = Self::load_year(store, owner, year, catalog)?;
        let key = match side {
            FieldSide::Income => plan.add_custom_income_field(label),
            FieldSide::Expense => plan.add_custom_expense_field(label),
        }
        .map_err(ServiceError::rejected)?;
        Self::save_year(store, &plan)?;
        Ok(key)
    }

    fn validate_fields(side: &str, fields: &FieldMap) -> ServiceResult<()> {
        if fields.keys().any(|key| key.trim().is_empty()) {
            return Err(ServiceError::Invalid(format!("{side} field name is required")));
        }
        match fields
            .raw_iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            Some((key, value)) => Err(ServiceError::Invalid(format!(
                "{side} `{key}` must be a non-negative number, got {value}"
            ))),
            None => Ok(()),
        }
    }
}
