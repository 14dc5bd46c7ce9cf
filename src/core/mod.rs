//! Services gluing the record store to the pure ledger, projection and currency
//! engines, plus the stale-result guard for period switching.

pub mod request;
pub mod services;

pub use request::{PeriodGuard, PeriodTicket};
