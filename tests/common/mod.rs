#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use hearth_ledger::{
    config::ConfigManager,
    domain::{MonetaryRecord, OwnerId, RecordKind},
    storage::JsonStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated store and config manager backed by a unique directory.
pub fn setup_test_env() -> (JsonStore, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let store = JsonStore::new(Some(base.join("data"))).expect("create json store");
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");

    (store, config_manager)
}

pub fn owner() -> OwnerId {
    OwnerId::new("family")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn expense(amount: f64, category: &str, on: NaiveDate) -> MonetaryRecord {
    MonetaryRecord::new(
        owner(),
        RecordKind::Expense,
        amount,
        Some(category.to_string()),
        on,
    )
}
