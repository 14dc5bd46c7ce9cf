use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    BudgetSetting, CategoryDefinition, CategoryKind, Identifiable, MonetaryRecord, Owned, OwnerId,
    Period, PredictionRecord, RecordKind, SavingsSnapshot,
};
use crate::errors::{FinanceError, Result};

pub const BOOK_SCHEMA_VERSION: u32 = 1;

/// Filter for record listings. Date bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub kind: RecordKind,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl RecordQuery {
    pub fn all(kind: RecordKind) -> Self {
        Self {
            kind,
            from: None,
            to: None,
        }
    }

    pub fn for_period(kind: RecordKind, period: Period) -> Self {
        Self {
            kind,
            from: Some(period.first_day()),
            to: Some(period.last_day()),
        }
    }

    pub fn between(kind: RecordKind, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            kind,
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn matches(&self, record: &MonetaryRecord) -> bool {
        record.kind == self.kind
            && self.from.map_or(true, |from| record.occurred_on >= from)
            && self.to.map_or(true, |to| record.occurred_on <= to)
    }
}

/// Everything stored for a single owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerBook {
    pub schema_version: u32,
    #[serde(default)]
    pub records: Vec<MonetaryRecord>,
    #[serde(default)]
    pub categories: Vec<CategoryDefinition>,
    #[serde(default)]
    pub budgets: Vec<BudgetSetting>,
    #[serde(default)]
    pub predictions: Vec<PredictionRecord>,
    #[serde(default)]
    pub savings: Vec<SavingsSnapshot>,
}

impl Default for OwnerBook {
    fn default() -> Self {
        Self {
            schema_version: BOOK_SCHEMA_VERSION,
            records: Vec::new(),
            categories: Vec::new(),
            budgets: Vec::new(),
            predictions: Vec::new(),
            savings: Vec::new(),
        }
    }
}

/// Index of the entry with `id` that belongs to `owner`.
fn position_of<T: Identifiable + Owned>(items: &[T], owner: &OwnerId, id: Uuid) -> Option<usize> {
    items
        .iter()
        .position(|item| item.id() == id && item.owner() == owner)
}

impl OwnerBook {
    /// Records of `owner` matching `query`, newest first.
    pub fn list_records(&self, owner: &OwnerId, query: &RecordQuery) -> Vec<MonetaryRecord> {
        let mut records: Vec<MonetaryRecord> = self
            .records
            .iter()
            .filter(|record| record.owner() == owner && query.matches(record))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.occurred_on.cmp(&a.occurred_on));
        records
    }

    pub fn record(&self, owner: &OwnerId, id: Uuid) -> Option<&MonetaryRecord> {
        position_of(&self.records, owner, id).map(|index| &self.records[index])
    }

    pub fn insert_record(&mut self, record: MonetaryRecord) -> Result<()> {
        if self.records.iter().any(|existing| existing.id == record.id) {
            return Err(FinanceError::Duplicate(format!("record {}", record.id)));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn replace_record(&mut self, record: MonetaryRecord) -> Result<()> {
        let index = position_of(&self.records, record.owner(), record.id)
            .ok_or_else(|| FinanceError::NotFound(format!("record {}", record.id)))?;
        self.records[index] = record;
        Ok(())
    }

    pub fn remove_record(&mut self, owner: &OwnerId, id: Uuid) -> Result<MonetaryRecord> {
        let index = position_of(&self.records, owner, id)
            .ok_or_else(|| FinanceError::NotFound(format!("record {}", id)))?;
        Ok(self.records.remove(index))
    }

    pub fn list_categories(&self, owner: &OwnerId, kind: CategoryKind) -> Vec<CategoryDefinition> {
        let mut categories: Vec<CategoryDefinition> = self
            .categories
            .iter()
            .filter(|category| category.kind == kind && category.owner() == owner)
            .cloned()
            .collect();
        categories.sort_by_key(|category| category.normalized_name());
        categories
    }

    pub fn insert_category(&mut self, category: CategoryDefinition) -> Result<()> {
        if self.categories.iter().any(|existing| existing.id == category.id) {
            return Err(FinanceError::Duplicate(format!("category {}", category.id)));
        }
        self.categories.push(category);
        Ok(())
    }

    pub fn replace_category(&mut self, category: CategoryDefinition) -> Result<()> {
        let index = position_of(&self.categories, category.owner(), category.id)
            .ok_or_else(|| FinanceError::NotFound(format!("category {}", category.id)))?;
        self.categories[index] = category;
        Ok(())
    }

    pub fn remove_category(&mut self, owner: &OwnerId, id: Uuid) -> Result<CategoryDefinition> {
        let index = position_of(&self.categories, owner, id)
            .ok_or_else(|| FinanceError::NotFound(format!("category {}", id)))?;
        Ok(self.categories.remove(index))
    }

    pub fn upsert_budget(&mut self, budget: BudgetSetting) {
        match self
            .budgets
            .iter_mut()
            .find(|existing| existing.key() == budget.key())
        {
            Some(slot) => *slot = budget,
            None => self.budgets.push(budget),
        }
    }

    pub fn budget(&self, owner: &OwnerId, period: Period) -> Option<&BudgetSetting> {
        self.budgets
            .iter()
            .find(|budget| budget.period == period && budget.owner() == owner)
    }

    /// Replaces the whole record for its owner and period; fields are never merged.
    pub fn upsert_prediction(&mut self, prediction: PredictionRecord) {
        match self
            .predictions
            .iter_mut()
            .find(|existing| existing.key() == prediction.key())
        {
            Some(slot) => *slot = prediction,
            None => self.predictions.push(prediction),
        }
    }

    pub fn prediction(&self, owner: &OwnerId, period: Period) -> Option<&PredictionRecord> {
        self.predictions
            .iter()
            .find(|prediction| prediction.period == period && prediction.owner() == owner)
    }

    pub fn predictions_for_year(&self, owner: &OwnerId, year: i32) -> Vec<PredictionRecord> {
        let mut predictions: Vec<PredictionRecord> = self
            .predictions
            .iter()
            .filter(|prediction| prediction.period.year == year && prediction.owner() == owner)
            .cloned()
            .collect();
        predictions.sort_by_key(|prediction| prediction.period);
        predictions
    }

    pub fn append_snapshot(&mut self, snapshot: SavingsSnapshot) {
        self.savings.push(snapshot);
    }

    /// Snapshots of `owner`, oldest first.
    pub fn snapshots(&self, owner: &OwnerId) -> Vec<SavingsSnapshot> {
        let mut snapshots: Vec<SavingsSnapshot> = self
            .savings
            .iter()
            .filter(|snapshot| snapshot.owner() == owner)
            .cloned()
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.taken_at);
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, kind: RecordKind) -> MonetaryRecord {
        MonetaryRecord::new(
            OwnerId::new("u1"),
            kind,
            10.0,
            None,
            NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        )
    }

    #[test]
    fn lists_records_newest_first_within_range() {
        let mut book = OwnerBook::default();
        for day in [3, 20, 11] {
            book.insert_record(record(day, RecordKind::Expense)).unwrap();
        }
        book.insert_record(record(5, RecordKind::Income)).unwrap();

        let query = RecordQuery::between(
            RecordKind::Expense,
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 11).unwrap(),
        );
        let days: Vec<u32> = book
            .list_records(&OwnerId::new("u1"), &query)
            .iter()
            .map(|record| chrono::Datelike::day(&record.occurred_on))
            .collect();
        assert_eq!(days, vec![11, 3]);
    }

    #[test]
    fn prediction_upsert_replaces_whole_record() {
        let period = Period::new(2025, 2).unwrap();
        let mut book = OwnerBook::default();
        book.upsert_prediction(
            PredictionRecord::new(OwnerId::new("u1"), period)
                .with_income("mumsSalary", 100.0)
                .with_expense("home", 50.0),
        );
        book.upsert_prediction(
            PredictionRecord::new(OwnerId::new("u1"), period).with_income("dadsTransfer", 70.0),
        );
        let stored = book.prediction(&OwnerId::new("u1"), period).unwrap();
        assert_eq!(book.predictions.len(), 1);
        assert!(!stored.income.contains("mumsSalary"));
        assert!(!stored.expense.contains("home"));
        assert_eq!(stored.income.get("dadsTransfer"), 70.0);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let mut book = OwnerBook::default();
        let err = book.remove_record(&OwnerId::new("u1"), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, FinanceError::NotFound(_)));
        let err = book.replace_record(record(1, RecordKind::Food)).unwrap_err();
        assert!(matches!(err, FinanceError::NotFound(_)));
    }

    #[test]
    fn lookups_ignore_entries_of_other_owners() {
        let period = Period::new(2025, 3).unwrap();
        let mine = OwnerId::new("u1");
        let theirs = OwnerId::new("U1");
        let mut book = OwnerBook::default();
        let foreign = MonetaryRecord::new(
            theirs.clone(),
            RecordKind::Expense,
            99.0,
            Some("Rent".into()),
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        );
        book.insert_record(foreign.clone()).unwrap();
        book.upsert_budget(BudgetSetting::new(theirs.clone(), period, 40.0));
        book.upsert_prediction(PredictionRecord::new(theirs.clone(), period));

        assert!(book.list_records(&mine, &RecordQuery::all(RecordKind::Expense)).is_empty());
        assert!(book.record(&mine, foreign.id).is_none());
        assert!(book.budget(&mine, period).is_none());
        assert!(book.prediction(&mine, period).is_none());
        assert!(book.remove_record(&mine, foreign.id).is_err());

        let mut hijacked = foreign.clone();
        hijacked.owner_id = mine.clone();
        assert!(book.replace_record(hijacked).is_err());

        book.upsert_budget(BudgetSetting::new(mine.clone(), period, 10.0));
        assert_eq!(book.budgets.len(), 2);
        assert_eq!(book.budget(&theirs, period).unwrap().daily_limit, 40.0);
        assert_eq!(book.record(&theirs, foreign.id), Some(&foreign));
    }
}
