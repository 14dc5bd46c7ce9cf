use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::currency::{CurrencyCode, CurrencyNormalizer, DualAmount, RateGate};
use crate::domain::savings::latest_snapshot;
use crate::domain::{parse_amount, OwnerId, SavingsSnapshot, SubBalance};
use crate::storage::RecordStore;

use super::{ServiceError, ServiceResult};

pub struct SavingsService;

impl SavingsService {
    /// Appends a new snapshot; earlier ones are kept as history.
    pub fn record_snapshot(
        store: &dyn RecordStore,
        owner: &OwnerId,
        balances: Vec<SubBalance>,
        taken_at: DateTime<Utc>,
    ) -> ServiceResult<SavingsSnapshot> {
        if balances.is_empty() {
            return Err(ServiceError::Invalid(
                "At least one balance is required".into(),
            ));
        }
        for balance in &balances {
            if balance.label.trim().is_empty() {
                return Err(ServiceError::Invalid("Balance label is required".into()));
            }
            parse_amount(balance.amount).map_err(ServiceError::rejected)?;
        }
        let snapshot = SavingsSnapshot::new(owner.clone(), balances, taken_at);
        store.append_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    pub fn current(
        store: &dyn RecordStore,
        owner: &OwnerId,
    ) -> ServiceResult<Option<SavingsSnapshot>> {
        let snapshots = store.list_snapshots(owner)?;
        Ok(latest_snapshot(&snapshots).cloned())
    }

    pub fn history(
        store: &dyn RecordStore,
        owner: &OwnerId,
    ) -> ServiceResult<Vec<SavingsSnapshot>> {
        Ok(store.list_snapshots(owner)?)
    }

    /// Latest snapshot expressed in `base`, converting each foreign currency once.
    /// Zero when nothing has been recorded.
    pub async fn current_saving(
        store: &dyn RecordStore,
        owner: &OwnerId,
        normalizer: &CurrencyNormalizer,
        base: &CurrencyCode,
    ) -> ServiceResult<f64> {
        let Some(snapshot) = Self::current(store, owner)? else {
            return Ok(0.0);
        };
        let currencies: BTreeSet<&CurrencyCode> = snapshot
            .balances
            .iter()
            .map(|balance| &balance.currency)
            .collect();
        let mut total = 0.0;
        for currency in currencies {
            let rate = normalizer.resolve(currency, base).await;
            total += rate.convert(snapshot.total_in(currency));
        }
        Ok(total)
    }

    /// `amount` in `base` paired with its converted value, once the gate holds a rate.
    pub fn dual_amount(
        gate: &RateGate,
        amount: f64,
        base: &CurrencyCode,
    ) -> Option<DualAmount> {
        gate.rate()
            .map(|rate| DualAmount::new(amount, base.clone(), rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{FallbackRates, RateTable, StaticRateSource};
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn php() -> CurrencyCode {
        CurrencyCode::new("PHP")
    }

    fn jpy() -> CurrencyCode {
        CurrencyCode::new("JPY")
    }

    #[test]
    fn rejects_invalid_balances() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("u1");
        assert!(SavingsService::record_snapshot(&store, &owner, vec![], Utc::now()).is_err());
        let negative = vec![SubBalance::new("BPI", php(), -1.0)];
        assert!(SavingsService::record_snapshot(&store, &owner, negative, Utc::now()).is_err());
        let unnamed = vec![SubBalance::new(" ", php(), 1.0)];
        assert!(SavingsService::record_snapshot(&store, &owner, unnamed, Utc::now()).is_err());
    }

    #[test]
    fn current_is_most_recent_snapshot() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("u1");
        let later = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let newest = SavingsService::record_snapshot(
            &store,
            &owner,
            vec![SubBalance::new("BPI", php(), 2000.0)],
            later,
        )
        .unwrap();
        SavingsService::record_snapshot(
            &store,
            &owner,
            vec![SubBalance::new("BPI", php(), 1000.0)],
            earlier,
        )
        .unwrap();
        let current = SavingsService::current(&store, &owner).unwrap().unwrap();
        assert_eq!(current.id, newest.id);
        assert_eq!(SavingsService::history(&store, &owner).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn current_saving_converts_foreign_balances() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("u1");
        SavingsService::record_snapshot(
            &store,
            &owner,
            vec![
                SubBalance::new("BPI", php(), 1000.0),
                SubBalance::new("Yucho", jpy(), 10000.0),
                SubBalance::new("Cash", jpy(), 5000.0),
            ],
            Utc::now(),
        )
        .unwrap();
        let source = StaticRateSource::new()
            .with_table(jpy(), RateTable::new(&jpy()).with_rate("PHP", 0.4));
        let normalizer = CurrencyNormalizer::new(Box::new(source), FallbackRates::default());
        let total = SavingsService::current_saving(&store, &owner, &normalizer, &php())
            .await
            .unwrap();
        assert!((total - 7000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn current_saving_is_zero_without_snapshots() {
        let store = MemoryStore::new();
        let normalizer =
            CurrencyNormalizer::with_default_fallback(Box::new(StaticRateSource::new()));
        let total =
            SavingsService::current_saving(&store, &OwnerId::new("u1"), &normalizer, &php())
                .await
                .unwrap();
        assert_eq!(total, 0.0);
    }

    #[test]
    fn dual_amount_waits_for_rate() {
        let mut gate = RateGate::new();
        assert!(SavingsService::dual_amount(&gate, 100.0, &php()).is_none());
        gate.resolve(crate::currency::ResolvedRate {
            from: php(),
            to: jpy(),
            rate: 2.7,
            origin: crate::currency::RateOrigin::Fallback,
        });
        let dual = SavingsService::dual_amount(&gate, 100.0, &php()).unwrap();
        assert_eq!(dual.converted_currency, jpy());
        assert!((dual.converted - 270.0).abs() < 1e-9);
    }
}
