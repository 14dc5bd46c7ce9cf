use serde::{Deserialize, Serialize};

/// How far the average daily spend has used up the daily limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetTier {
    Unset,
    Comfortable,
    OnTrack,
    Watch,
    Critical,
    Over,
}

impl BudgetTier {
    fn from_percent(percent: f64) -> Self {
        if percent > 100.0 {
            Self::Over
        } else if percent > 90.0 {
            Self::Critical
        } else if percent > 75.0 {
            Self::Watch
        } else if percent > 50.0 {
            Self::OnTrack
        } else {
            Self::Comfortable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub average_daily: f64,
    pub daily_limit: f64,
    /// Uncapped usage percentage.
    pub percent_used: f64,
    pub over_budget: bool,
    pub tier: BudgetTier,
}

impl BudgetStatus {
    /// Usage for progress display, capped at 100.
    pub fn display_percent(&self) -> f64 {
        self.percent_used.min(100.0)
    }

    pub fn remaining_daily(&self) -> f64 {
        (self.daily_limit - self.average_daily).max(0.0)
    }
}

/// Compares an average daily spend against a daily limit.
pub fn budget_status(average_daily: f64, daily_limit: f64) -> BudgetStatus {
    if !daily_limit.is_finite() || daily_limit <= 0.0 {
        return BudgetStatus {
            average_daily,
            daily_limit: 0.0,
            percent_used: 0.0,
            over_budget: false,
            tier: BudgetTier::Unset,
        };
    }
    let percent_used = average_daily / daily_limit * 100.0;
    BudgetStatus {
        average_daily,
        daily_limit,
        percent_used,
        over_budget: average_daily > daily_limit,
        tier: BudgetTier::from_percent(percent_used),
    }
}
