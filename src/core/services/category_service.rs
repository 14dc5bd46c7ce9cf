use uuid::Uuid;

use crate::domain::category::{normalize_name, DEFAULT_INCOME_CATEGORIES};
use crate::domain::{CategoryDefinition, CategoryKind, OwnerId};
use crate::storage::RecordStore;

use super::{ServiceError, ServiceResult};

pub struct CategoryService;

impl CategoryService {
    pub fn add(
        store: &dyn RecordStore,
        owner: &OwnerId,
        name: &str,
        kind: CategoryKind,
    ) -> ServiceResult<CategoryDefinition> {
        let name = Self::validate_name(store, owner, kind, None, name)?;
        let category = CategoryDefinition::new(owner.clone(), name, kind);
        store.create_category(&category)?;
        Ok(category)
    }

    /// Renames a category. Records keep the old name, which still groups on its own.
    pub fn rename(
        store: &dyn RecordStore,
        owner: &OwnerId,
        kind: CategoryKind,
        id: Uuid,
        name: &str,
    ) -> ServiceResult<CategoryDefinition> {
        let mut category = store
            .list_categories(owner, kind)?
            .into_iter()
            .find(|category| category.id == id)
            .ok_or_else(|| ServiceError::Invalid("Category not found".into()))?;
        category.name = Self::validate_name(store, owner, kind, Some(id), name)?;
        store.update_category(&category)?;
        Ok(category)
    }

    /// Deletes the definition only; records referencing it are left as they are.
    pub fn remove(store: &dyn RecordStore, owner: &OwnerId, id: Uuid) -> ServiceResult<()> {
        let removed = store.delete_category(owner, id)?;
        tracing::info!(name = %removed.name, kind = %removed.kind, "category removed");
        Ok(())
    }

    pub fn list(
        store: &dyn RecordStore,
        owner: &OwnerId,
        kind: CategoryKind,
    ) -> ServiceResult<Vec<CategoryDefinition>> {
        Ok(store.list_categories(owner, kind)?)
    }

    /// Creates the default income categories when the owner has none yet.
    pub fn seed_defaults(
        store: &dyn RecordStore,
        owner: &OwnerId,
    ) -> ServiceResult<Vec<CategoryDefinition>> {
        let existing = store.list_categories(owner, CategoryKind::Income)?;
        if !existing.is_empty() {
            return Ok(existing);
        }
        for name in DEFAULT_INCOME_CATEGORIES {
            Self::add(store, owner, name, CategoryKind::Income)?;
        }
        Ok(store.list_categories(owner, CategoryKind::Income)?)
    }

    fn validate_name(
        store: &dyn RecordStore,
        owner: &OwnerId,
        kind: CategoryKind,
        exclude: Option<Uuid>,
        candidate: &str,
    ) -> ServiceResult<String> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Invalid("Category name is required".into()));
        }
        let normalized = normalize_name(trimmed);
        let duplicate = store.list_categories(owner, kind)?.iter().any(|category| {
            category.normalized_name() == normalized && exclude.map_or(true, |id| category.id != id)
        });
        if duplicate {
            Err(ServiceError::Invalid(format!(
                "Category `{}` already exists",
                trimmed
            )))
        } else {
            Ok(trimmed.to_string())
        }
    }
}
