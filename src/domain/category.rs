//! Domain types representing user-defined categories.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::domain::record::RecordKind;

/// A named expense or income category owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDefinition {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub owner_id: OwnerId,
}

impl CategoryDefinition {
    pub fn new(owner_id: OwnerId, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            owner_id,
        }
    }

    /// Normalized form used for uniqueness checks.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Identifiable for CategoryDefinition {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for CategoryDefinition {
    fn owner(&self) -> &OwnerId {
        &self.owner_id
    }
}

/// Category namespaces; names are unique within one kind only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    /// Record ledger whose entries reference categories of this kind.
    pub fn record_kind(&self) -> RecordKind {
        match self {
            CategoryKind::Expense => RecordKind::Expense,
            CategoryKind::Income => RecordKind::Income,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Expense => "Expense",
            CategoryKind::Income => "Income",
        };
        f.write_str(label)
    }
}

/// Income categories every owner starts with.
pub const DEFAULT_INCOME_CATEGORIES: &[&str] = &["Salary", "Remittance", "ETC"];
