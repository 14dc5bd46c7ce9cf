//! Discarding results of fetches that finished after the selection moved on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::domain::Period;

/// Issued with every fetch; identifies the period it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTicket {
    pub period: Period,
    pub generation: u64,
}

/// Tracks the currently selected period and the latest fetch issued for it.
#[derive(Debug)]
pub struct PeriodGuard {
    selected: RwLock<Period>,
    generation: AtomicU64,
}

impl PeriodGuard {
    pub fn new(period: Period) -> Self {
        Self {
            selected: RwLock::new(period),
            generation: AtomicU64::new(0),
        }
    }

    pub fn selected(&self) -> Period {
        match self.selected.read() {
            Ok(period) => *period,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Changes the selection; tickets issued earlier become stale.
    pub fn select(&self, period: Period) -> PeriodTicket {
        match self.selected.write() {
            Ok(mut selected) => *selected = period,
            Err(poisoned) => *poisoned.into_inner() = period,
        }
        self.issue()
    }

    /// New ticket for the current selection, superseding any earlier one.
    pub fn issue(&self) -> PeriodTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        PeriodTicket {
            period: self.selected(),
            generation,
        }
    }

    pub fn is_current(&self, ticket: &PeriodTicket) -> bool {
        ticket.period == self.selected()
            && ticket.generation == self.generation.load(Ordering::SeqCst)
    }

    /// Passes `value` through only if `ticket` is still the latest for the selection.
    pub fn accept<T>(&self, ticket: &PeriodTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(
                period = %ticket.period,
                generation = ticket.generation,
                "discarding stale result"
            );
            None
        }
    }
}
