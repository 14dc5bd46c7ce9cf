pub mod book;
pub mod json_backend;
pub mod memory;

use uuid::Uuid;

use crate::domain::{
    BudgetSetting, CategoryDefinition, CategoryKind, MonetaryRecord, OwnerId, Period,
    PredictionRecord, SavingsSnapshot,
};
use crate::errors::Result;

pub use book::{OwnerBook, RecordQuery, BOOK_SCHEMA_VERSION};
pub use json_backend::JsonStore;
pub use memory::MemoryStore;

/// Persistence collaborator for every owner-scoped collection.
///
/// Writes keyed by id fail with `NotFound` when the id is unknown. Budgets and
/// predictions are keyed by `(owner, period)` and always upserted.
pub trait RecordStore: Send + Sync {
    /// Records matching `query`, newest first.
    fn list_records(&self, owner: &OwnerId, query: &RecordQuery) -> Result<Vec<MonetaryRecord>>;
    fn get_record(&self, owner: &OwnerId, id: Uuid) -> Result<Option<MonetaryRecord>>;
    fn create_record(&self, record: &MonetaryRecord) -> Result<()>;
    fn update_record(&self, record: &MonetaryRecord) -> Result<()>;
    fn delete_record(&self, owner: &OwnerId, id: Uuid) -> Result<MonetaryRecord>;

    fn list_categories(
        &self,
        owner: &OwnerId,
        kind: CategoryKind,
    ) -> Result<Vec<CategoryDefinition>>;
    fn create_category(&self, category: &CategoryDefinition) -> Result<()>;
    fn update_category(&self, category: &CategoryDefinition) -> Result<()>;
    fn delete_category(&self, owner: &OwnerId, id: Uuid) -> Result<CategoryDefinition>;

    fn upsert_budget(&self, budget: &BudgetSetting) -> Result<()>;
    fn get_budget(&self, owner: &OwnerId, period: Period) -> Result<Option<BudgetSetting>>;

    fn upsert_prediction(&self, prediction: &PredictionRecord) -> Result<()>;
    fn get_prediction(&self, owner: &OwnerId, period: Period)
        -> Result<Option<PredictionRecord>>;
    fn list_predictions(&self, owner: &OwnerId, year: i32) -> Result<Vec<PredictionRecord>>;

    fn append_snapshot(&self, snapshot: &SavingsSnapshot) -> Result<()>;
    /// Snapshots oldest first.
    fn list_snapshots(&self, owner: &OwnerId) -> Result<Vec<SavingsSnapshot>>;
}

/// Per-owner document access. Every [`BookBackend`] is a [`RecordStore`].
pub trait BookBackend: Send + Sync {
    fn read_book<T>(&self, owner: &OwnerId, read: impl FnOnce(&OwnerBook) -> Result<T>)
        -> Result<T>;

    /// Applies `write` and persists the book only when it succeeds.
    fn write_book<T>(
        &self,
        owner: &OwnerId,
        write: impl FnOnce(&mut OwnerBook) -> Result<T>,
    ) -> Result<T>;
}

impl<B: BookBackend> RecordStore for B {
    fn list_records(&self, owner: &OwnerId, query: &RecordQuery) -> Result<Vec<MonetaryRecord>> {
        self.read_book(owner, |book| Ok(book.list_records(owner, query)))
    }

    fn get_record(&self, owner: &OwnerId, id: Uuid) -> Result<Option<MonetaryRecord>> {
        self.read_book(owner, |book| Ok(book.record(owner, id).cloned()))
    }

    fn create_record(&self, record: &MonetaryRecord) -> Result<()> {
        self.write_book(&record.owner_id, |book| book.insert_record(record.clone()))
    }

    fn update_record(&self, record: &MonetaryRecord) -> Result<()> {
        self.write_book(&record.owner_id, |book| book.replace_record(record.clone()))
    }

    fn delete_record(&self, owner: &OwnerId, id: Uuid) -> Result<MonetaryRecord> {
        self.write_book(owner, |book| book.remove_record(owner, id))
    }

    fn list_categories(
        &self,
        owner: &OwnerId,
        kind: CategoryKind,
    ) -> Result<Vec<CategoryDefinition>> {
        self.read_book(owner, |book| Ok(book.list_categories(owner, kind)))
    }

    fn create_category(&self, category: &CategoryDefinition) -> Result<()> {
        self.write_book(&category.owner_id, |book| {
            book.insert_category(category.clone())
        })
    }

    fn update_category(&self, category: &CategoryDefinition) -> Result<()> {
        self.write_book(&category.owner_id, |book| {
            book.replace_category(category.clone())
        })
    }

    fn delete_category(&self, owner: &OwnerId, id: Uuid) -> Result<CategoryDefinition> {
        self.write_book(owner, |book| book.remove_category(owner, id))
    }

    fn upsert_budget(&self, budget: &BudgetSetting) -> Result<()> {
        self.write_book(&budget.owner_id, |book| {
            book.upsert_budget(budget.clone());
            Ok(())
        })
    }

    fn get_budget(&self, owner: &OwnerId, period: Period) -> Result<Option<BudgetSetting>> {
        self.read_book(owner, |book| Ok(book.budget(owner, period).cloned()))
    }

    fn upsert_prediction(&self, prediction: &PredictionRecord) -> Result<()> {
        self.write_book(&prediction.owner_id, |book| {
            book.upsert_prediction(prediction.clone());
            Ok(())
        })
    }

    fn get_prediction(
        &self,
        owner: &OwnerId,
        period: Period,
    ) -> Result<Option<PredictionRecord>> {
        self.read_book(owner, |book| Ok(book.prediction(owner, period).cloned()))
    }

    fn list_predictions(&self, owner: &OwnerId, year: i32) -> Result<Vec<PredictionRecord>> {
        self.read_book(owner, |book| Ok(book.predictions_for_year(owner, year)))
    }

    fn append_snapshot(&self, snapshot: &SavingsSnapshot) -> Result<()> {
        self.write_book(&snapshot.owner_id, |book| {
            book.append_snapshot(snapshot.clone());
            Ok(())
        })
    }

    fn list_snapshots(&self, owner: &OwnerId) -> Result<Vec<SavingsSnapshot>> {
        self.read_book(owner, |book| Ok(book.snapshots(owner)))
    }
}
