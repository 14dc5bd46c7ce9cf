//! Point-in-time savings balances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::CurrencyCode;
use crate::domain::amount::coerce_amount;
use crate::domain::common::{Identifiable, OwnerId, Owned};

/// One currency-tagged balance inside a snapshot (a bank account, wallet or cash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubBalance {
    pub label: String,
    pub currency: CurrencyCode,
    pub amount: f64,
}

impl SubBalance {
    pub fn new(label: impl Into<String>, currency: CurrencyCode, amount: f64) -> Self {
        Self {
            label: label.into(),
            currency,
            amount,
        }
    }
}

/// Append-only record of balances; the most recent one is "current".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSnapshot {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub balances: Vec<SubBalance>,
    pub taken_at: DateTime<Utc>,
}

impl SavingsSnapshot {
    pub fn new(owner_id: OwnerId, balances: Vec<SubBalance>, taken_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            balances,
            taken_at,
        }
    }

    /// Sum of sub-balances held in `currency`, without conversion.
    pub fn total_in(&self, currency: &CurrencyCode) -> f64 {
        self.balances
            .iter()
            .filter(|balance| &balance.currency == currency)
            .map(|balance| coerce_amount(balance.amount))
            .sum()
    }
}

impl Identifiable for SavingsSnapshot {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for SavingsSnapshot {
    fn owner(&self) -> &OwnerId {
        &self.owner_id
    }
}

/// Picks the most recently taken snapshot.
pub fn latest_snapshot<'a>(
    snapshots: impl IntoIterator<Item = &'a SavingsSnapshot>,
) -> Option<&'a SavingsSnapshot> {
    snapshots.into_iter().max_by_key(|snapshot| snapshot.taken_at)
}
