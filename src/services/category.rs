//! Category service
//!
//! Adds and removes names from the three category lists. The `Vault
//! Deduction` expense category is reserved and cannot be removed.

use crate::audit::EntityType;
use crate::error::{FinTrackError, FinTrackResult};
use crate::models::{Categories, CategoryKind};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All three lists
    pub fn all(&self) -> FinTrackResult<Categories> {
        self.storage.ledger.read(|state| state.categories.clone())
    }

    /// One list, in insertion order
    pub fn list(&self, kind: CategoryKind) -> FinTrackResult<Vec<String>> {
        self.storage
            .ledger
            .read(|state| state.categories.list(kind).to_vec())
    }

    /// Append a category
    ///
    /// Returns whether the list changed. Blank and duplicate names are
    /// accepted silently and change nothing.
    pub fn add(&self, kind: CategoryKind, name: &str) -> FinTrackResult<bool> {
        let changed = self
            .storage
            .ledger
            .update(|state| Ok(state.categories.add(kind, name)))?;

        if !changed {
            tracing::debug!(%kind, name, "category already present or blank");
            return Ok(false);
        }

        let name = name.trim();
        self.storage.ledger.save()?;
        self.storage.log_create(
            EntityType::Category,
            format!("{}/{}", kind.label().to_lowercase(), name),
            Some(name.to_string()),
            &name,
        )?;

        Ok(true)
    }

    /// Remove every occurrence of a category
    ///
    /// Removing a name that isn't there is a no-op. Transactions that use the
    /// category keep it.
    pub fn delete(&self, kind: CategoryKind, name: &str) -> FinTrackResult<usize> {
        let removed = self.storage.ledger.update(|state| {
            state
                .categories
                .remove(kind, name)
                .map_err(FinTrackError::ProtectedCategory)
        })?;

        if removed == 0 {
            return Ok(0);
        }

        self.storage.ledger.save()?;
        self.storage.log_delete(
            EntityType::Category,
            format!("{}/{}", kind.label().to_lowercase(), name),
            Some(name.to_string()),
            &name,
        )?;

        Ok(removed)
    }

    /// Number of main and vault entries using a category
    pub fn usage(&self, name: &str) -> FinTrackResult<usize> {
        self.storage.ledger.read(|state| {
            state
                .transactions
                .iter()
                .chain(state.vault_transactions.iter())
                .filter(|t| t.category == name)
                .count()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FinTrackPaths;
    use crate::models::VAULT_DEDUCTION;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinTrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_add_twice_is_idempotent() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let before = service.list(CategoryKind::Expense).unwrap().len();

        assert!(!service.add(CategoryKind::Expense, "Food").unwrap());
        assert!(!service.add(CategoryKind::Expense, "Food").unwrap());
        assert_eq!(service.list(CategoryKind::Expense).unwrap().len(), before);

        assert!(service.add(CategoryKind::Expense, "Pets").unwrap());
        assert!(!service.add(CategoryKind::Expense, "Pets").unwrap());
        assert_eq!(service.list(CategoryKind::Expense).unwrap().len(), before + 1);
    }

    #[test]
    fn test_delete_reserved_fails_and_keeps_list() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let before = service.list(CategoryKind::Expense).unwrap();

        let err = service
            .delete(CategoryKind::Expense, VAULT_DEDUCTION)
            .unwrap_err();

        assert!(matches!(err, FinTrackError::ProtectedCategory(_)));
        assert_eq!(service.list(CategoryKind::Expense).unwrap(), before);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        assert_eq!(service.delete(CategoryKind::Vault, "Yacht").unwrap(), 0);
        assert!(storage.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_add_and_delete_are_persisted_and_audited() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.add(CategoryKind::Income, "Bonus").unwrap();
        assert_eq!(service.delete(CategoryKind::Income, "Salary").unwrap(), 1);

        let reloaded = crate::storage::LedgerRepository::new(storage.paths().state_file());
        reloaded.load().unwrap();
        let cats = reloaded.snapshot().unwrap().categories;
        assert!(cats.contains(CategoryKind::Income, "Bonus"));
        assert!(!cats.contains(CategoryKind::Income, "Salary"));

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entity_id, "income/Bonus");
    }
}
