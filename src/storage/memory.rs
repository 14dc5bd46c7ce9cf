use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::OwnerId;
use crate::errors::{FinanceError, Result};

use super::{BookBackend, OwnerBook};

/// In-process store; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    books: RwLock<HashMap<OwnerId, OwnerBook>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything stored for `owner`.
    pub fn export(&self, owner: &OwnerId) -> Result<OwnerBook> {
        self.read_book(owner, |book| Ok(book.clone()))
    }
}

fn poisoned() -> FinanceError {
    FinanceError::Storage("memory store lock poisoned".into())
}

impl BookBackend for MemoryStore {
    fn read_book<T>(
        &self,
        owner: &OwnerId,
        read: impl FnOnce(&OwnerBook) -> Result<T>,
    ) -> Result<T> {
        let books = self.books.read().map_err(|_| poisoned())?;
        match books.get(owner) {
            Some(book) => read(book),
            None => read(&OwnerBook::default()),
        }
    }

    fn write_book<T>(
        &self,
        owner: &OwnerId,
        write: impl FnOnce(&mut OwnerBook) -> Result<T>,
    ) -> Result<T> {
        let mut books = self.books.write().map_err(|_| poisoned())?;
        let mut book = books.get(owner).cloned().unwrap_or_default();
        let value = write(&mut book)?;
        books.insert(owner.clone(), book);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BudgetSetting, MonetaryRecord, Period, RecordKind};
    use crate::storage::{RecordQuery, RecordStore};
    use chrono::NaiveDate;

    #[test]
    fn owners_are_isolated() {
        let store = MemoryStore::new();
        let alice = OwnerId::new("alice");
        let bob = OwnerId::new("bob");
        let record = MonetaryRecord::new(
            alice.clone(),
            RecordKind::Food,
            120.0,
            None,
            NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
        );
        store.create_record(&record).unwrap();

        let query = RecordQuery::all(RecordKind::Food);
        assert_eq!(store.list_records(&alice, &query).unwrap().len(), 1);
        assert!(store.list_records(&bob, &query).unwrap().is_empty());
        assert!(store.delete_record(&bob, record.id).is_err());
    }

    #[test]
    fn budget_upsert_keeps_one_per_period() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("u1");
        let period = Period::new(2025, 2).unwrap();
        store.upsert_budget(&BudgetSetting::new(owner.clone(), period, 300.0)).unwrap();
        store.upsert_budget(&BudgetSetting::new(owner.clone(), period, 450.0)).unwrap();
        let stored = store.get_budget(&owner, period).unwrap().unwrap();
        assert_eq!(stored.daily_limit, 450.0);
        assert_eq!(store.export(&owner).unwrap().budgets.len(), 1);
    }

    #[test]
    fn failed_write_leaves_book_untouched() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("u1");
        let record = MonetaryRecord::new(
            owner.clone(),
            RecordKind::Expense,
            10.0,
            Some("Food".into()),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        store.create_record(&record).unwrap();
        assert!(store.create_record(&record).is_err());
        assert_eq!(store.export(&owner).unwrap().records.len(), 1);
    }
}
