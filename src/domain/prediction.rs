//! Planned monthly income and expense figures.
//!
//! Each [`PredictionRecord`] holds two open-ended [`FieldMap`]s. The set of keys that
//! should be present is tracked separately by a [`FieldCatalog`]: a fixed baseline plus
//! every custom key discovered across a year's records.

use std::collections::{btree_map, BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::amount::{coerce_finite, coerce_planned, AmountInput};
use crate::domain::common::{OwnerId, Owned, Period};

pub const BASELINE_INCOME_FIELDS: &[&str] = &["mumsSalary", "mumsIncentive", "dadsTransfer"];

pub const BASELINE_EXPENSE_FIELDS: &[&str] = &[
    "home",
    "tuition",
    "electricity",
    "internet",
    "transportation",
    "mobile",
    "groceries",
    "toiletries",
    "vitaminsCosmeticsMeds",
    "restaurant",
    "investment",
    "water",
    "schoolMisc",
    "utilities",
];

/// Mapping of field key to planned amount.
///
/// Stored values that are numeric text, `null` or garbage are read through
/// [`coerce_planned`], so one bad entry costs its own value and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, f64>);

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<AmountInput>>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .map(|(key, value)| (key, coerce_planned(value)))
                .collect(),
        ))
    }
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding every key with a zero amount.
    pub fn zeroed<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self(keys.into_iter().map(|key| (key.to_string(), 0.0)).collect())
    }

    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().map(coerce_finite).unwrap_or(0.0)
    }

    pub fn set(&mut self, key: impl Into<String>, amount: f64) {
        self.0.insert(key.into(), amount);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts a zero entry when `key` is absent. Returns `true` if it was inserted.
    pub fn ensure(&mut self, key: &str) -> bool {
        match self.0.entry(key.to_string()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(0.0);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, value)| (key.as_str(), coerce_finite(*value)))
    }

    /// Entries exactly as stored, non-finite values included.
    pub fn raw_iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all values with non-finite entries counted as zero.
    pub fn total(&self) -> f64 {
        self.0.values().copied().map(coerce_finite).sum()
    }
}

impl FromIterator<(String, f64)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One month of planned figures for an owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub owner_id: OwnerId,
    #[serde(flatten)]
    pub period: Period,
    #[serde(default)]
    pub income: FieldMap,
    #[serde(default)]
    pub expense: FieldMap,
}

impl PredictionRecord {
    pub fn new(owner_id: OwnerId, period: Period) -> Self {
        Self {
            owner_id,
            period,
            income: FieldMap::new(),
            expense: FieldMap::new(),
        }
    }

    /// A record with every catalogued key present and set to zero.
    pub fn zeroed(owner_id: OwnerId, period: Period, catalog: &FieldCatalog) -> Self {
        Self {
            owner_id,
            period,
            income: FieldMap::zeroed(catalog.income_keys()),
            expense: FieldMap::zeroed(catalog.expense_keys()),
        }
    }

    pub fn with_income(mut self, key: impl Into<String>, amount: f64) -> Self {
        self.income.set(key, amount);
        self
    }

    pub fn with_expense(mut self, key: impl Into<String>, amount: f64) -> Self {
        self.expense.set(key, amount);
        self
    }

    pub fn key(&self) -> (OwnerId, Period) {
        (self.owner_id.clone(), self.period)
    }
}

impl Owned for PredictionRecord {
    fn owner(&self) -> &OwnerId {
        &self.owner_id
    }
}

/// Baseline and custom field keys known for a year of predictions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub baseline_income: Vec<String>,
    pub baseline_expense: Vec<String>,
    #[serde(default)]
    pub custom_income: BTreeSet<String>,
    #[serde(default)]
    pub custom_expense: BTreeSet<String>,
}

impl FieldCatalog {
    pub fn new(baseline_income: Vec<String>, baseline_expense: Vec<String>) -> Self {
        Self {
            baseline_income,
            baseline_expense,
            custom_income: BTreeSet::new(),
            custom_expense: BTreeSet::new(),
        }
    }

    /// Catalog seeded with the household's default fields.
    pub fn household() -> Self {
        Self::new(
            BASELINE_INCOME_FIELDS.iter().map(|key| key.to_string()).collect(),
            BASELINE_EXPENSE_FIELDS.iter().map(|key| key.to_string()).collect(),
        )
    }

    /// Baseline plus every non-baseline key found in `records`.
    pub fn discover<'a>(
        records: impl IntoIterator<Item = &'a PredictionRecord>,
        baseline_income: &[String],
        baseline_expense: &[String],
    ) -> Self {
        let mut catalog = Self::new(baseline_income.to_vec(), baseline_expense.to_vec());
        for record in records {
            for key in record.income.keys() {
                catalog.register_income(key);
            }
            for key in record.expense.keys() {
                catalog.register_expense(key);
            }
        }
        catalog
    }

    /// Adds `key` to the custom income set unless it is a baseline key.
    pub fn register_income(&mut self, key: &str) -> bool {
        if self.baseline_income.iter().any(|base| base == key) {
            return false;
        }
        self.custom_income.insert(key.to_string())
    }

    pub fn register_expense(&mut self, key: &str) -> bool {
        if self.baseline_expense.iter().any(|base| base == key) {
            return false;
        }
        self.custom_expense.insert(key.to_string())
    }

    /// Baseline keys in declared order followed by custom keys.
    pub fn income_keys(&self) -> impl Iterator<Item = &str> {
        self.baseline_income
            .iter()
            .map(String::as_str)
            .chain(self.custom_income.iter().map(String::as_str))
    }

    pub fn expense_keys(&self) -> impl Iterator<Item = &str> {
        self.baseline_expense
            .iter()
            .map(String::as_str)
            .chain(self.custom_expense.iter().map(String::as_str))
    }

    pub fn is_custom_income(&self, key: &str) -> bool {
        self.custom_income.contains(key)
    }

    pub fn is_custom_expense(&self, key: &str) -> bool {
        self.custom_expense.contains(key)
    }
}

/// Key for a user-entered custom field label: lowercased, whitespace removed.
pub fn custom_field_key(label: &str) -> String {
    label
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Human label for a camelCase key, e.g. `schoolMisc` becomes `School Misc`.
pub fn field_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (index, ch) in key.chars().enumerate() {
        if index == 0 {
            label.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            label.push(' ');
            label.push(ch);
        } else {
            label.push(ch);
        }
    }
    label
}
