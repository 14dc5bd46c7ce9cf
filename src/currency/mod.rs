//! Currency codes, conversion, fallback rates and display formatting.

pub mod normalizer;
pub mod source;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use normalizer::{CurrencyNormalizer, RateGate, RateOrigin, ResolvedRate};
pub use source::{ErApiRateSource, RateError, RateSource, RateTable, StaticRateSource};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("PHP")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directed exchange rate: one unit of `from` buys `rate` units of `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxRate {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: f64,
}

impl FxRate {
    pub fn new(from: CurrencyCode, to: CurrencyCode, rate: f64) -> Self {
        Self { from, to, rate }
    }

    pub fn inverse(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            rate: invert_rate(self.rate),
        }
    }

    pub fn apply(&self, amount: f64) -> f64 {
        convert(amount, self.rate)
    }
}

/// Rescales `amount` by `rate`.
pub fn convert(amount: f64, rate: f64) -> f64 {
    amount * rate
}

/// `1 / rate`, keeping a zero (unusable) rate at zero.
pub fn invert_rate(rate: f64) -> f64 {
    if rate.abs() < f64::EPSILON || !rate.is_finite() {
        0.0
    } else {
        1.0 / rate
    }
}

/// Fixed per-pair constants used when no live rate can be obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackRates {
    #[serde(default)]
    rates: Vec<FxRate>,
}

impl Default for FallbackRates {
    /// 1 JPY ≈ 0.37 PHP and 1 PHP ≈ 2.7 JPY.
    fn default() -> Self {
        Self {
            rates: vec![
                FxRate::new(CurrencyCode::new("JPY"), CurrencyCode::new("PHP"), 0.37),
                FxRate::new(CurrencyCode::new("PHP"), CurrencyCode::new("JPY"), 2.7),
            ],
        }
    }
}

impl FallbackRates {
    pub fn empty() -> Self {
        Self { rates: Vec::new() }
    }

    /// Registers or replaces the constant for a pair.
    pub fn set(&mut self, from: CurrencyCode, to: CurrencyCode, rate: f64) {
        self.rates.retain(|entry| !(entry.from == from && entry.to == to));
        self.rates.push(FxRate::new(from, to, rate));
    }

    /// Direct constant, else the inverse of the reverse constant. Same codes yield 1.
    pub fn lookup(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<f64> {
        if from == to {
            return Some(1.0);
        }
        if let Some(entry) = self
            .rates
            .iter()
            .find(|entry| &entry.from == from && &entry.to == to)
        {
            return Some(entry.rate);
        }
        self.rates
            .iter()
            .find(|entry| &entry.from == to && &entry.to == from)
            .map(|entry| invert_rate(entry.rate))
            .filter(|rate| *rate > 0.0)
    }
}

/// Rate from the built-in constants, `None` for pairs with no entry in either direction.
pub fn fallback_rate(from: &CurrencyCode, to: &CurrencyCode) -> Option<f64> {
    FallbackRates::default().lookup(from, to)
}

/// An amount shown in its native currency alongside a derived conversion.
/// Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DualAmount {
    pub native: f64,
    pub native_currency: CurrencyCode,
    pub converted: f64,
    pub converted_currency: CurrencyCode,
}

impl DualAmount {
    pub fn new(native: f64, native_currency: CurrencyCode, rate: &ResolvedRate) -> Self {
        Self {
            native,
            native_currency,
            converted: convert(native, rate.rate),
            converted_currency: rate.to.clone(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{} ({})",
            format_currency_value(self.native, &self.native_currency),
            format_currency_value(self.converted, &self.converted_currency)
        )
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "PHP" => "₱".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Formats a number with `,` grouping and `.` decimals.
pub fn format_number(value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac)) => (int_part.to_string(), Some(frac.to_string())),
        None => (body, None),
    };
    let mut grouped = group_digits(&int_part, ',');
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(&frac);
    }
    if value < 0.0 && grouped.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        grouped.insert(0, '-');
    }
    grouped
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

pub fn format_currency_value(amount: f64, code: &CurrencyCode) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(amount, precision);
    let symbol = symbol_for(code.as_str());
    match body.strip_prefix('-') {
        Some(positive) => format!("-{}{}", symbol, positive),
        None => format!("{}{}", symbol, body),
    }
}
