//! Dated monetary entries: expenses, income and food purchases.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::amount::{deserialize_lenient, AmountInput};
use crate::domain::common::{Identifiable, Owned, OwnerId};

/// Label used when a record carries no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Which ledger a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Expense,
    Income,
    Food,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Expense => "Expense",
            RecordKind::Income => "Income",
            RecordKind::Food => "Food",
        };
        f.write_str(label)
    }
}

/// One persisted expense, income or food purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryRecord {
    pub id: Uuid,
    pub kind: RecordKind,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "date")]
    pub occurred_on: NaiveDate,
    pub owner_id: OwnerId,
}

impl MonetaryRecord {
    pub fn new(
        owner_id: OwnerId,
        kind: RecordKind,
        amount: f64,
        category: Option<String>,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            category,
            note: None,
            occurred_on,
            owner_id,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Category label used for grouping; blank or missing names fall back to
    /// [`UNCATEGORIZED`].
    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => UNCATEGORIZED,
        }
    }
}

impl Identifiable for MonetaryRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for MonetaryRecord {
    fn owner(&self) -> &OwnerId {
        &self.owner_id
    }
}

/// Unvalidated input for creating or editing a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, rename = "date")]
    pub occurred_on: Option<NaiveDate>,
}

impl RecordDraft {
    pub fn new(amount: impl Into<AmountInput>, occurred_on: NaiveDate) -> Self {
        Self {
            amount: Some(amount.into()),
            category: None,
            note: None,
            occurred_on: Some(occurred_on),
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
