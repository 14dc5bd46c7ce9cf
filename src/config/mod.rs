use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    currency::{
        source::DEFAULT_RATE_ENDPOINT, CurrencyCode, CurrencyNormalizer, ErApiRateSource,
        FallbackRates,
    },
    domain::{
        prediction::{BASELINE_EXPENSE_FIELDS, BASELINE_INCOME_FIELDS},
        FieldCatalog, OwnerId,
    },
    errors::{FinanceError, Result},
    utils::{app_data_dir, config_file_in, ensure_dir, write_atomic},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Currency savings and projections are reported in.
    pub base_currency: CurrencyCode,
    /// Currency shown alongside the base amount.
    pub secondary_currency: CurrencyCode,
    pub fallback_rates: FallbackRates,
    pub rate_endpoint: String,
    pub default_owner: String,
    pub baseline_income_fields: Vec<String>,
    pub baseline_expense_fields: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_currency: CurrencyCode::new("PHP"),
            secondary_currency: CurrencyCode::new("JPY"),
            fallback_rates: FallbackRates::default(),
            rate_endpoint: DEFAULT_RATE_ENDPOINT.into(),
            default_owner: "family".into(),
            baseline_income_fields: BASELINE_INCOME_FIELDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            baseline_expense_fields: BASELINE_EXPENSE_FIELDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        for (label, code) in [
            ("base_currency", &self.base_currency),
            ("secondary_currency", &self.secondary_currency),
        ] {
            let valid = code.as_str().len() == 3
                && code.as_str().chars().all(|ch| ch.is_ascii_uppercase());
            if !valid {
                return Err(FinanceError::Config(format!(
                    "{label} `{code}` is not a three-letter currency code"
                )));
            }
        }
        if self.default_owner.trim().is_empty() {
            return Err(FinanceError::Config("default_owner must not be empty".into()));
        }
        if !self.rate_endpoint.starts_with("http://") && !self.rate_endpoint.starts_with("https://")
        {
            return Err(FinanceError::Config(format!(
                "rate_endpoint `{}` must be an http(s) URL",
                self.rate_endpoint
            )));
        }
        Ok(())
    }

    pub fn default_owner(&self) -> OwnerId {
        OwnerId::new(self.default_owner.trim())
    }

    /// Field catalog seeded with the configured baseline keys.
    pub fn field_catalog(&self) -> FieldCatalog {
        FieldCatalog::new(
            self.baseline_income_fields.clone(),
            self.baseline_expense_fields.clone(),
        )
    }

    /// Normalizer backed by the configured HTTP endpoint and fallback constants.
    pub fn normalizer(&self) -> CurrencyNormalizer {
        CurrencyNormalizer::new(
            Box::new(ErApiRateSource::new(self.rate_endpoint.clone())),
            self.fallback_rates.clone(),
        )
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored configuration, or defaults when nothing has been saved yet.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| FinanceError::Config(format!("{}: {err}", self.path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}
