//! Twelve-month prediction plans with a consistent field set.

use tracing::debug;

use crate::domain::prediction::custom_field_key;
use crate::domain::{FieldCatalog, OwnerId, Period, PredictionRecord};
use crate::errors::{FinanceError, Result};
use crate::projection::rollup::{
    cumulative_saving_at_month, projection_series, yearly_totals, ProjectionPoint, YearlyTotals,
};

/// Inserts a zero entry for every listed key a record lacks. Returns how many entries
/// were added; a second pass always adds none.
pub fn ensure_field_completeness<I, E>(
    records: &mut [PredictionRecord],
    income_keys: &[I],
    expense_keys: &[E],
) -> usize
where
    I: AsRef<str>,
    E: AsRef<str>,
{
    let mut inserted = 0;
    for record in records.iter_mut() {
        for key in income_keys {
            inserted += usize::from(record.income.ensure(key.as_ref()));
        }
        for key in expense_keys {
            inserted += usize::from(record.expense.ensure(key.as_ref()));
        }
    }
    inserted
}

/// Exactly twelve ordered months of predictions for one owner and year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearPlan {
    owner_id: OwnerId,
    year: i32,
    catalog: FieldCatalog,
    months: Vec<PredictionRecord>,
}

/// Builds a full [`YearPlan`] from whatever records exist.
///
/// Records for another owner or year are ignored. Missing months are created zeroed,
/// and every month gets every catalogued key.
pub fn complete_year(
    owner_id: &OwnerId,
    year: i32,
    records: Vec<PredictionRecord>,
    base: &FieldCatalog,
) -> Result<YearPlan> {
    let mut slots: Vec<Option<PredictionRecord>> = vec![None; 12];
    for record in records {
        if &record.owner_id != owner_id || record.period.year != year {
            debug!(period = %record.period, "skipping prediction outside the plan");
            continue;
        }
        let index = (record.period.month - 1) as usize;
        slots[index] = Some(record);
    }

    let mut catalog = FieldCatalog::discover(
        slots.iter().flatten(),
        &base.baseline_income,
        &base.baseline_expense,
    );
    for key in &base.custom_income {
        catalog.register_income(key);
    }
    for key in &base.custom_expense {
        catalog.register_expense(key);
    }

    let mut months = Vec::with_capacity(12);
    for (index, slot) in slots.into_iter().enumerate() {
        let record = match slot {
            Some(record) => record,
            None => PredictionRecord::new(owner_id.clone(), Period::new(year, index as u32 + 1)?),
        };
        months.push(record);
    }

    let mut plan = YearPlan {
        owner_id: owner_id.clone(),
        year,
        catalog,
        months,
    };
    plan.fill_fields();
    Ok(plan)
}

impl YearPlan {
    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn months(&self) -> &[PredictionRecord] {
        &self.months
    }

    pub fn month(&self, month: u32) -> Option<&PredictionRecord> {
        let index = month.checked_sub(1)? as usize;
        self.months.get(index)
    }

    pub fn month_mut(&mut self, month: u32) -> Option<&mut PredictionRecord> {
        let index = month.checked_sub(1)? as usize;
        self.months.get_mut(index)
    }

    /// Replaces one month wholesale, then re-applies the catalogued keys.
    pub fn replace_month(&mut self, record: PredictionRecord) -> Result<()> {
        if record.owner_id != self.owner_id || record.period.year != self.year {
            return Err(FinanceError::InvalidInput(format!(
                "prediction for {} does not belong to the {} plan",
                record.period, self.year
            )));
        }
        for key in record.income.keys() {
            self.catalog.register_income(key);
        }
        for key in record.expense.keys() {
            self.catalog.register_expense(key);
        }
        let index = (record.period.month - 1) as usize;
        self.months[index] = record;
        self.fill_fields();
        Ok(())
    }

    /// Registers a custom income field from a user label and adds it to every month.
    /// Returns the derived key.
    pub fn add_custom_income_field(&mut self, label: &str) -> Result<String> {
        let key = Self::custom_key(label)?;
        if self.catalog.register_income(&key) {
            debug!(%key, year = self.year, "added custom income field");
        }
        self.fill_fields();
        Ok(key)
    }

    pub fn add_custom_expense_field(&mut self, label: &str) -> Result<String> {
        let key = Self::custom_key(label)?;
        if self.catalog.register_expense(&key) {
            debug!(%key, year = self.year, "added custom expense field");
        }
        self.fill_fields();
        Ok(key)
    }

    pub fn totals(&self, current_saving: f64) -> YearlyTotals {
        yearly_totals(&self.months, current_saving)
    }

    pub fn cumulative_saving_at(&self, month: u32, current_saving: f64) -> f64 {
        cumulative_saving_at_month(&self.months, month, current_saving)
    }

    pub fn series(&self, current_saving: f64) -> Vec<ProjectionPoint> {
        projection_series(&self.months, current_saving)
    }

    pub fn into_months(self) -> Vec<PredictionRecord> {
        self.months
    }

    fn custom_key(label: &str) -> Result<String> {
        let key = custom_field_key(label);
        if key.is_empty() {
            return Err(FinanceError::InvalidInput(
                "custom field name is required".into(),
            ));
        }
        Ok(key)
    }

    fn fill_fields(&mut self) {
        let income: Vec<&str> = self.catalog.income_keys().collect();
        let expense: Vec<&str> = self.catalog.expense_keys().collect();
        ensure_field_completeness(&mut self.months, &income, &expense);
    }
}
