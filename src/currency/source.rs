//! External exchange-rate lookups.
//!
//! Sources return the whole `{rates: {CODE: number}}` table for a base currency.
//! Lookups are best-effort: callers go through
//! [`CurrencyNormalizer`](super::CurrencyNormalizer), which never surfaces these errors.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CurrencyCode;

/// Default public endpoint; the base currency code is appended as a path segment.
pub const DEFAULT_RATE_ENDPOINT: &str = "https://open.er-api.com/v6/latest";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum RateError {
    #[error("rate request failed: {0}")]
    Network(String),
    #[error("rate response could not be decoded: {0}")]
    Decode(String),
    #[error("rate source reported an error for {0}")]
    Rejected(String),
}

/// Rates quoted against one base currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_code: Option<String>,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(base: &CurrencyCode) -> Self {
        Self {
            result: Some("success".into()),
            base_code: Some(base.as_str().to_string()),
            rates: HashMap::new(),
        }
    }

    pub fn with_rate(mut self, quote: &str, rate: f64) -> Self {
        self.rates.insert(quote.to_uppercase(), rate);
        self
    }

    /// Usable (positive, finite) rate for `quote`.
    pub fn rate_for(&self, quote: &CurrencyCode) -> Option<f64> {
        self.rates
            .get(quote.as_str())
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }

    fn is_error(&self) -> bool {
        matches!(self.result.as_deref(), Some("error"))
    }
}

/// Source of latest exchange-rate tables.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Identifier used in logs.
    fn id(&self) -> &'static str;

    async fn latest_rates(&self, base: &CurrencyCode) -> Result<RateTable, RateError>;
}

/// HTTP source speaking the open.er-api.com `latest` format.
pub struct ErApiRateSource {
    client: Client,
    endpoint: String,
}

impl ErApiRateSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn url_for(&self, base: &CurrencyCode) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), base.as_str())
    }
}

impl Default for ErApiRateSource {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_ENDPOINT)
    }
}

#[async_trait]
impl RateSource for ErApiRateSource {
    fn id(&self) -> &'static str {
        "ER_API"
    }

    async fn latest_rates(&self, base: &CurrencyCode) -> Result<RateTable, RateError> {
        let url = self.url_for(base);
        tracing::debug!(%url, "requesting exchange rates");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| RateError::Network(err.to_string()))?;
        if !response.status().is_success() {
            return Err(RateError::Network(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }
        let table: RateTable = response
            .json()
            .await
            .map_err(|err| RateError::Decode(err.to_string()))?;
        if table.is_error() {
            return Err(RateError::Rejected(base.as_str().to_string()));
        }
        Ok(table)
    }
}

/// In-memory source with fixed tables, for offline use and tests.
#[derive(Default)]
pub struct StaticRateSource {
    tables: HashMap<CurrencyCode, RateTable>,
    requests: AtomicUsize,
}

impl StaticRateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, base: CurrencyCode, table: RateTable) -> Self {
        self.tables.insert(base, table);
        self
    }

    /// Number of lookups served so far, failed ones included.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    fn id(&self) -> &'static str {
        "STATIC"
    }

    async fn latest_rates(&self, base: &CurrencyCode) -> Result<RateTable, RateError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.tables
            .get(base)
            .cloned()
            .ok_or_else(|| RateError::Network(format!("no table for {}", base)))
    }
}
