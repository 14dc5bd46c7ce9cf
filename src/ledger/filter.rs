use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::MonetaryRecord;

/// Sentinel accepted by [`CategorySelection::toggle`] to reset to every category.
pub const ALL_CATEGORIES: &str = "all";

/// Which categories a monthly view includes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "mode",
    content = "categories",
    rename_all = "lowercase",
    from = "StoredSelection"
)]
pub enum CategorySelection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

#[derive(Deserialize)]
#[serde(tag = "mode", content = "categories", rename_all = "lowercase")]
enum StoredSelection {
    All,
    Only(BTreeSet<String>),
}

impl From<StoredSelection> for CategorySelection {
    fn from(stored: StoredSelection) -> Self {
        match stored {
            StoredSelection::All => Self::All,
            StoredSelection::Only(categories) => Self::only(categories),
        }
    }
}

fn is_all_sentinel(category: &str) -> bool {
    category.trim().eq_ignore_ascii_case(ALL_CATEGORIES)
}

impl CategorySelection {
    /// Selection of the given categories. Empty input, or input naming `"all"`, selects
    /// everything.
    pub fn only<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = categories.into_iter().map(Into::into).collect();
        if set.is_empty() || set.iter().any(|category| is_all_sentinel(category)) {
            Self::All
        } else {
            Self::Only(set)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Flips one category in or out of the selection.
    ///
    /// `"all"` resets the selection. Picking a category while everything is selected
    /// narrows to that category alone, and removing the last category widens back to
    /// everything.
    pub fn toggle(&mut self, category: &str) {
        if is_all_sentinel(category) {
            *self = Self::All;
            return;
        }
        match self {
            Self::All => {
                *self = Self::only([category]);
            }
            Self::Only(selected) => {
                if !selected.remove(category) {
                    selected.insert(category.to_string());
                }
                if selected.is_empty() {
                    *self = Self::All;
                }
            }
        }
    }

    pub fn includes(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => {
                selected.contains(category) || selected.iter().any(|name| is_all_sentinel(name))
            }
        }
    }
}

/// Records whose category label is part of `selection`.
pub fn filter_by_categories<'a>(
    records: impl IntoIterator<Item = &'a MonetaryRecord>,
    selection: &CategorySelection,
) -> Vec<&'a MonetaryRecord> {
    let records = records.into_iter();
    match selection {
        CategorySelection::All => records.collect(),
        CategorySelection::Only(_) => records
            .filter(|record| selection.includes(record.category_label()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OwnerId, RecordKind, UNCATEGORIZED};
    use chrono::NaiveDate;

    #[test]
    fn naming_all_selects_everything() {
        assert!(CategorySelection::only(["all"]).is_all());
        assert!(CategorySelection::only(["Food", "ALL"]).is_all());
        assert!(CategorySelection::only(Vec::<String>::new()).is_all());

        let stored: CategorySelection =
            serde_json::from_str(r#"{"mode":"only","categories":["all"]}"#).unwrap();
        assert!(stored.is_all());
        let stored: CategorySelection =
            serde_json::from_str(r#"{"mode":"only","categories":["Food"]}"#).unwrap();
        assert_eq!(stored, CategorySelection::only(["Food"]));

        let records = vec![record(Some("Food")), record(Some("Rent")), record(None)];
        let built_by_hand = CategorySelection::Only(BTreeSet::from(["all".to_string()]));
        assert_eq!(filter_by_categories(&records, &built_by_hand).len(), 3);
    }

    fn record(category: Option<&str>) -> MonetaryRecord {
        MonetaryRecord::new(
            OwnerId::new("u1"),
            RecordKind::Income,
            10.0,
            category.map(str::to_string),
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        )
    }

    #[test]
    fn toggle_follows_checkbox_rules() {
        let mut selection = CategorySelection::All;
        selection.toggle("Salary");
        assert_eq!(selection, CategorySelection::only(["Salary"]));
        selection.toggle("ETC");
        assert!(selection.includes("ETC"));
        selection.toggle("Salary");
        selection.toggle("ETC");
        assert!(selection.is_all());

        selection.toggle("Remittance");
        selection.toggle("all");
        assert!(selection.is_all());
    }

    #[test]
    fn filters_by_label_including_uncategorized() {
        let records = vec![record(Some("Salary")), record(None), record(Some("ETC"))];
        assert_eq!(filter_by_categories(&records, &CategorySelection::All).len(), 3);

        let selection = CategorySelection::only(["Salary", UNCATEGORIZED]);
        let kept = filter_by_categories(&records, &selection);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.category.as_deref() != Some("ETC")));
    }
}
