#![doc(test(attr(deny(warnings))))]

//! Hearth Ledger is the computation core of a household finance tracker: monthly
//! aggregation of expenses, income and food purchases, twelve-month savings
//! projections, and best-effort currency conversion for dual-currency display.

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod projection;
pub mod storage;
pub mod utils;

pub use errors::{FinanceError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Hearth Ledger tracing initialized.");
    });
}
