use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{parse_amount, MonetaryRecord, OwnerId, Period, RecordDraft, RecordKind};
use crate::storage::{RecordQuery, RecordStore};

use super::{ServiceError, ServiceResult};

/// Expense, income and food entries.
pub struct RecordService;

impl RecordService {
    pub fn add(
        store: &dyn RecordStore,
        owner: &OwnerId,
        kind: RecordKind,
        draft: RecordDraft,
    ) -> ServiceResult<MonetaryRecord> {
        let (amount, category, occurred_on) = Self::validate(kind, &draft)?;
        let mut record = MonetaryRecord::new(owner.clone(), kind, amount, category, occurred_on);
        record.note = Self::clean_note(draft.note);
        store.create_record(&record)?;
        tracing::debug!(id = %record.id, %kind, amount, "record added");
        Ok(record)
    }

    /// Replaces amount, category, note and date of an existing record.
    pub fn edit(
        store: &dyn RecordStore,
        owner: &OwnerId,
        id: Uuid,
        draft: RecordDraft,
    ) -> ServiceResult<MonetaryRecord> {
        let mut record = store
            .get_record(owner, id)?
            .ok_or_else(|| ServiceError::Invalid("Record not found".into()))?;
        let (amount, category, occurred_on) = Self::validate(record.kind, &draft)?;
        record.amount = amount;
        record.category = category;
        record.occurred_on = occurred_on;
        record.note = Self::clean_note(draft.note);
        store.update_record(&record)?;
        Ok(record)
    }

    pub fn remove(store: &dyn RecordStore, owner: &OwnerId, id: Uuid) -> ServiceResult<()> {
        store.delete_record(owner, id)?;
        Ok(())
    }

    pub fn list_for_period(
        store: &dyn RecordStore,
        owner: &OwnerId,
        kind: RecordKind,
        period: Period,
    ) -> ServiceResult<Vec<MonetaryRecord>> {
        Ok(store.list_records(owner, &RecordQuery::for_period(kind, period))?)
    }

    pub fn list_between(
        store: &dyn RecordStore,
        owner: &OwnerId,
        kind: RecordKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ServiceResult<Vec<MonetaryRecord>> {
        if from > to {
            return Err(ServiceError::Invalid(format!(
                "Start date {from} is after end date {to}"
            )));
        }
        Ok(store.list_records(owner, &RecordQuery::between(kind, from, to))?)
    }

    fn validate(
        kind: RecordKind,
        draft: &RecordDraft,
    ) -> ServiceResult<(f64, Option<String>, NaiveDate)> {
        let amount = parse_amount(draft.amount.clone()).map_err(ServiceError::rejected)?;
        let occurred_on = draft
            .occurred_on
            .ok_or_else(|| ServiceError::Invalid("Date is required".into()))?;
        let category = draft
            .category
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        match kind {
            RecordKind::Expense | RecordKind::Income if category.is_none() => Err(
                ServiceError::Invalid(format!("Category is required for {kind} records")),
            ),
            // Food purchases are never categorised.
            RecordKind::Food => Ok((amount, None, occurred_on)),
            _ => Ok((amount, category, occurred_on)),
        }
    }

    fn clean_note(note: Option<String>) -> Option<String> {
        note.map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty())
    }
}
