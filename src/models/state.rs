//! Aggregate application state
//!
//! Everything the tracker knows lives in one [`AppState`] value, persisted as a
//! single JSON blob.

use serde::{Deserialize, Serialize};

use super::category::Categories;
use super::ids::TransactionId;
use super::profile::UserProfile;
use super::transaction::Transaction;

/// Which collection a transaction lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    Main,
    Vault,
}

impl LedgerKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Main => "main ledger",
            Self::Vault => "vault",
        }
    }
}

/// The aggregate root: both ledgers, categories and profile
///
/// Collections are ordered newest-insert first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub vault_transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Categories,
    #[serde(default)]
    pub profile: UserProfile,
}

impl AppState {
    /// Borrow one ledger
    pub fn ledger(&self, kind: LedgerKind) -> &[Transaction] {
        match kind {
            LedgerKind::Main => &self.transactions,
            LedgerKind::Vault => &self.vault_transactions,
        }
    }

    /// Mutably borrow one ledger
    pub fn ledger_mut(&mut self, kind: LedgerKind) -> &mut Vec<Transaction> {
        match kind {
            LedgerKind::Main => &mut self.transactions,
            LedgerKind::Vault => &mut self.vault_transactions,
        }
    }

    /// Find a transaction by id in one ledger
    pub fn find(&self, kind: LedgerKind, id: &TransactionId) -> Option<&Transaction> {
        self.ledger(kind).iter().find(|t| &t.id == id)
    }

    /// Locate a transaction in either ledger
    pub fn locate(&self, id: &TransactionId) -> Option<(LedgerKind, &Transaction)> {
        [LedgerKind::Main, LedgerKind::Vault]
            .into_iter()
            .find_map(|kind| self.find(kind, id).map(|t| (kind, t)))
    }

    /// Remove a transaction by id, returning it
    pub fn take(&mut self, kind: LedgerKind, id: &TransactionId) -> Option<Transaction> {
        let ledger = self.ledger_mut(kind);
        let index = ledger.iter().position(|t| &t.id == id)?;
        Some(ledger.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, TransactionType};
    use chrono::Utc;

    #[test]
    fn test_default_state_is_empty() {
        let state = AppState::default();
        assert!(state.transactions.is_empty());
        assert!(state.vault_transactions.is_empty());
        assert_eq!(state.profile.currency, "$");
    }

    #[test]
    fn test_locate_and_take() {
        let mut state = AppState::default();
        let txn = Transaction::new(TransactionType::VaultIn, Amount::new(5.0), "Retirement", Utc::now());
        let id = txn.id.clone();
        state.vault_transactions.push(txn);

        assert_eq!(state.locate(&id).map(|(k, _)| k), Some(LedgerKind::Vault));
        assert!(state.find(LedgerKind::Main, &id).is_none());

        let taken = state.take(LedgerKind::Vault, &id).unwrap();
        assert_eq!(taken.id, id);
        assert!(state.locate(&id).is_none());
    }

    #[test]
    fn test_blob_uses_camel_case_keys() {
        let json = serde_json::to_value(AppState::default()).unwrap();
        assert!(json.get("vaultTransactions").is_some());
        assert!(json.get("categories").is_some());
    }
}
