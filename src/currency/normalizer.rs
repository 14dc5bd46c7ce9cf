//! Best-effort exchange-rate resolution.
//!
//! Resolution order for `from -> to`:
//! 1. same code: parity (1.0), no lookup;
//! 2. the `from` table's `to` entry;
//! 3. the `to` table's `from` entry, inverted;
//! 4. the configured fallback constant (1.0 when no constant exists).
//!
//! Failures along the way are logged and never returned.

use tracing::{debug, warn};

use super::{convert, invert_rate, CurrencyCode, FallbackRates, RateSource};

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOrigin {
    Live,
    DerivedInverse,
    Fallback,
    Parity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRate {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: f64,
    pub origin: RateOrigin,
}

impl ResolvedRate {
    pub fn convert(&self, amount: f64) -> f64 {
        convert(amount, self.rate)
    }

    pub fn is_live(&self) -> bool {
        matches!(self.origin, RateOrigin::Live | RateOrigin::DerivedInverse)
    }
}

pub struct CurrencyNormalizer {
    source: Box<dyn RateSource>,
    fallback: FallbackRates,
}

impl CurrencyNormalizer {
    pub fn new(source: Box<dyn RateSource>, fallback: FallbackRates) -> Self {
        Self { source, fallback }
    }

    pub fn with_default_fallback(source: Box<dyn RateSource>) -> Self {
        Self::new(source, FallbackRates::default())
    }

    pub fn fallback(&self) -> &FallbackRates {
        &self.fallback
    }

    pub async fn resolve(&self, from: &CurrencyCode, to: &CurrencyCode) -> ResolvedRate {
        if from == to {
            return self.resolved(from, to, 1.0, RateOrigin::Parity);
        }

        match self.source.latest_rates(from).await {
            Ok(table) => {
                if let Some(rate) = table.rate_for(to) {
                    return self.resolved(from, to, rate, RateOrigin::Live);
                }
                debug!(
                    source = self.source.id(),
                    %from,
                    %to,
                    "direct rate missing, trying inverse table"
                );
            }
            Err(err) => {
                warn!(source = self.source.id(), %from, %to, error = %err, "rate lookup failed");
                return self.fallback_for(from, to);
            }
        }

        match self.source.latest_rates(to).await {
            Ok(table) => match table.rate_for(from).map(invert_rate) {
                Some(rate) if rate > 0.0 => {
                    self.resolved(from, to, rate, RateOrigin::DerivedInverse)
                }
                _ => self.fallback_for(from, to),
            },
            Err(err) => {
                warn!(
                    source = self.source.id(),
                    base = %to,
                    error = %err,
                    "inverse rate lookup failed"
                );
                self.fallback_for(from, to)
            }
        }
    }

    /// Converts `amount` from one currency into another using [`Self::resolve`].
    pub async fn convert_amount(&self, amount: f64, from: &CurrencyCode, to: &CurrencyCode) -> f64 {
        self.resolve(from, to).await.convert(amount)
    }

    fn fallback_for(&self, from: &CurrencyCode, to: &CurrencyCode) -> ResolvedRate {
        let rate = self.fallback.lookup(from, to).unwrap_or_else(|| {
            warn!(%from, %to, "no fallback constant for pair, using parity");
            1.0
        });
        warn!(%from, %to, rate, "using fallback exchange rate");
        self.resolved(from, to, rate, RateOrigin::Fallback)
    }

    fn resolved(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        rate: f64,
        origin: RateOrigin,
    ) -> ResolvedRate {
        ResolvedRate {
            from: from.clone(),
            to: to.clone(),
            rate,
            origin,
        }
    }
}

/// Holds back converted output until a rate has been resolved at least once.
#[derive(Debug, Clone, Default)]
pub struct RateGate {
    current: Option<ResolvedRate>,
}

impl RateGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    pub fn resolve(&mut self, rate: ResolvedRate) {
        self.current = Some(rate);
    }

    pub fn rate(&self) -> Option<&ResolvedRate> {
        self.current.as_ref()
    }

    pub fn convert(&self, amount: f64) -> Option<f64> {
        self.current.as_ref().map(|rate| rate.convert(amount))
    }
}
