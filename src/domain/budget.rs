use serde::{Deserialize, Serialize};

use crate::domain::common::{OwnerId, Owned, Period};

/// Daily spending limit for one owner and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSetting {
    pub owner_id: OwnerId,
    #[serde(flatten)]
    pub period: Period,
    #[serde(rename = "dailyBudget")]
    pub daily_limit: f64,
}

impl BudgetSetting {
    pub fn new(owner_id: OwnerId, period: Period, daily_limit: f64) -> Self {
        Self {
            owner_id,
            period,
            daily_limit,
        }
    }

    /// Natural key used for upserts.
    pub fn key(&self) -> (OwnerId, Period) {
        (self.owner_id.clone(), self.period)
    }

    /// Limit for the whole month.
    pub fn monthly_limit(&self) -> f64 {
        self.daily_limit * self.period.days() as f64
    }
}

impl Owned for BudgetSetting {
    fn owner(&self) -> &OwnerId {
        &self.owner_id
    }
}
