//! Ledger service
//!
//! Guarded mutations of the two ledgers. Every add checks funds against the
//! freshly computed balances, and a vault withdrawal is mirrored into the main
//! ledger as a `Vault Deduction` expense in the same step.
//!
//! Plain deletes only touch the collection they are asked about; removing a
//! withdrawal leaves its mirror behind (and the other way round). Use
//! [`LedgerService::delete_linked`] to remove both sides.

use std::collections::HashSet;

use crate::audit::EntityType;
use crate::error::{FinTrackError, FinTrackResult};
use crate::models::{
    AppState, LedgerKind, Transaction, TransactionId, TransactionType, VAULT_DEDUCTION,
};
use crate::storage::Storage;

use super::balance;

/// Prefix of the description carried by mirrored withdrawals
pub const MIRROR_PREFIX: &str = "Withdrawal from Vault: ";

/// Service for ledger mutations
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

/// Options for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only this type
    pub transaction_type: Option<TransactionType>,
    /// Case-insensitive match on category or description
    pub search: Option<String>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by type
    pub fn of_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    /// Filter by text
    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        if let Some(kind) = self.transaction_type {
            if txn.transaction_type != kind {
                return false;
            }
        }

        match &self.search {
            Some(needle) if !needle.trim().is_empty() => {
                let needle = needle.trim().to_lowercase();
                txn.category.to_lowercase().contains(&needle)
                    || txn.description.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// Result of the link integrity check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkReport {
    /// Vault withdrawals with no mirrored expense in the main ledger
    pub missing_mirrors: Vec<Transaction>,
    /// `Vault Deduction` expenses with no withdrawal in the vault
    pub orphaned_mirrors: Vec<Transaction>,
}

impl LinkReport {
    /// Whether every withdrawal has exactly its mirror
    pub fn is_consistent(&self) -> bool {
        self.missing_mirrors.is_empty() && self.orphaned_mirrors.is_empty()
    }
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add an income, expense or borrowed entry to the main ledger
    ///
    /// Expenses (other than mirrored withdrawals) may not exceed the usable
    /// balance.
    pub fn add_main_transaction(&self, txn: Transaction) -> FinTrackResult<Transaction> {
        validate(&txn)?;

        if txn.is_vault() {
            return Err(FinTrackError::Validation(format!(
                "'{}' entries belong in the vault",
                txn.transaction_type
            )));
        }

        let added = self.storage.ledger.update(|state| {
            if txn.is_expense() && txn.category != VAULT_DEDUCTION {
                let available = balance::for_state(state).usable_balance;
                if txn.amount > available {
                    return Err(FinTrackError::InsufficientFunds {
                        needed: txn.amount.value(),
                        available: available.value(),
                    });
                }
            }

            state.transactions.insert(0, txn.clone());
            Ok(txn)
        })?;

        self.storage.ledger.save()?;
        self.storage.log_create(
            EntityType::Transaction,
            added.id.to_string(),
            Some(added.category.clone()),
            &added,
        )?;

        tracing::info!(id = %added.id, kind = %added.transaction_type, amount = %added.amount, "transaction added");

        Ok(added)
    }

    /// Add a deposit or withdrawal to the vault
    ///
    /// Deposits may not exceed the usable balance, withdrawals may not exceed
    /// the vault balance. A withdrawal also inserts its mirrored expense into
    /// the main ledger; both entries are returned, vault entry first.
    pub fn add_vault_transaction(
        &self,
        txn: Transaction,
    ) -> FinTrackResult<(Transaction, Option<Transaction>)> {
        validate(&txn)?;

        if !txn.is_vault() {
            return Err(FinTrackError::Validation(format!(
                "'{}' entries belong in the main ledger",
                txn.transaction_type
            )));
        }

        let (entry, mirror) = self.storage.ledger.update(|state| {
            let balances = balance::for_state(state);

            match txn.transaction_type {
                TransactionType::VaultIn if txn.amount > balances.usable_balance => {
                    return Err(FinTrackError::InsufficientFunds {
                        needed: txn.amount.value(),
                        available: balances.usable_balance.value(),
                    });
                }
                TransactionType::VaultOut if txn.amount > balances.vault_balance => {
                    return Err(FinTrackError::InsufficientVaultBalance {
                        needed: txn.amount.value(),
                        available: balances.vault_balance.value(),
                    });
                }
                _ => {}
            }

            let mut entry = txn;
            let mirror = if entry.transaction_type == TransactionType::VaultOut {
                let mut mirror = mirror_of(&entry);
                mirror.linked_id = Some(entry.id.clone());
                entry.linked_id = Some(mirror.id.clone());
                state.transactions.insert(0, mirror.clone());
                Some(mirror)
            } else {
                None
            };

            state.vault_transactions.insert(0, entry.clone());
            Ok((entry, mirror))
        })?;

        self.storage.ledger.save()?;
        self.storage.log_create(
            EntityType::VaultTransaction,
            entry.id.to_string(),
            Some(entry.category.clone()),
            &entry,
        )?;
        if let Some(mirror) = &mirror {
            self.storage.log_create(
                EntityType::Transaction,
                mirror.id.to_string(),
                Some(mirror.description.clone()),
                mirror,
            )?;
        }

        tracing::info!(id = %entry.id, kind = %entry.transaction_type, amount = %entry.amount, "vault transaction added");

        Ok((entry, mirror))
    }

    /// Delete a main ledger entry by id
    pub fn delete_transaction(&self, id: &TransactionId) -> FinTrackResult<Transaction> {
        self.delete_from(LedgerKind::Main, id)
    }

    /// Delete a vault entry by id
    pub fn delete_vault_transaction(&self, id: &TransactionId) -> FinTrackResult<Transaction> {
        self.delete_from(LedgerKind::Vault, id)
    }

    fn delete_from(&self, kind: LedgerKind, id: &TransactionId) -> FinTrackResult<Transaction> {
        let removed = self
            .storage
            .ledger
            .update(|state| state.take(kind, id).ok_or_else(|| not_found(kind, id)))?;

        self.storage.ledger.save()?;
        self.log_removed(kind, &removed)?;

        if removed.linked_id.is_some() {
            tracing::warn!(id = %removed.id, "deleted one side of a linked pair");
        }

        Ok(removed)
    }

    /// Delete an entry from whichever ledger holds it, plus its linked counterpart
    pub fn delete_linked(&self, id: &TransactionId) -> FinTrackResult<Vec<(LedgerKind, Transaction)>> {
        let removed = self.storage.ledger.update(|state| {
            let (kind, _) = state
                .locate(id)
                .ok_or_else(|| FinTrackError::transaction_not_found(id.to_string()))?;

            let mut removed = Vec::with_capacity(2);
            if let Some(txn) = state.take(kind, id) {
                let other = match kind {
                    LedgerKind::Main => LedgerKind::Vault,
                    LedgerKind::Vault => LedgerKind::Main,
                };
                let partner = txn
                    .linked_id
                    .as_ref()
                    .and_then(|linked| state.take(other, linked));

                removed.push((kind, txn));
                if let Some(partner) = partner {
                    removed.push((other, partner));
                }
            }

            Ok(removed)
        })?;

        self.storage.ledger.save()?;
        for (kind, txn) in &removed {
            self.log_removed(*kind, txn)?;
        }

        Ok(removed)
    }

    /// Find withdrawals and mirrors that lost their counterpart
    ///
    /// Entries without a `linkedId` (imported data) are paired by amount and
    /// day instead.
    pub fn check_links(&self) -> FinTrackResult<LinkReport> {
        self.storage.ledger.read(link_report)
    }

    /// List entries of one ledger, newest insert first
    pub fn list(&self, kind: LedgerKind, filter: &TransactionFilter) -> FinTrackResult<Vec<Transaction>> {
        self.storage.ledger.read(|state| {
            let matching = state.ledger(kind).iter().filter(|t| filter.matches(t)).cloned();
            match filter.limit {
                Some(limit) => matching.take(limit).collect(),
                None => matching.collect(),
            }
        })
    }

    /// Find an entry by id in either ledger
    pub fn find(&self, id: &TransactionId) -> FinTrackResult<Option<(LedgerKind, Transaction)>> {
        self.storage
            .ledger
            .read(|state| state.locate(id).map(|(kind, t)| (kind, t.clone())))
    }

    fn log_removed(&self, kind: LedgerKind, txn: &Transaction) -> FinTrackResult<()> {
        let entity_type = match kind {
            LedgerKind::Main => EntityType::Transaction,
            LedgerKind::Vault => EntityType::VaultTransaction,
        };
        self.storage.log_delete(
            entity_type,
            txn.id.to_string(),
            Some(txn.category.clone()),
            txn,
        )
    }
}

fn validate(txn: &Transaction) -> FinTrackResult<()> {
    txn.validate()
        .map_err(|e| FinTrackError::Validation(e.to_string()))
}

fn not_found(kind: LedgerKind, id: &TransactionId) -> FinTrackError {
    match kind {
        LedgerKind::Main => FinTrackError::transaction_not_found(id.to_string()),
        LedgerKind::Vault => FinTrackError::vault_transaction_not_found(id.to_string()),
    }
}

/// Build the main ledger expense that mirrors a vault withdrawal
pub fn mirror_of(withdrawal: &Transaction) -> Transaction {
    let label = if withdrawal.description.trim().is_empty() {
        withdrawal.category.as_str()
    } else {
        withdrawal.description.as_str()
    };

    Transaction::new(
        TransactionType::Expense,
        withdrawal.amount,
        VAULT_DEDUCTION,
        withdrawal.date,
    )
    .with_description(format!("{}{}", MIRROR_PREFIX, label))
}

fn is_mirror(txn: &Transaction) -> bool {
    txn.is_expense() && txn.category == VAULT_DEDUCTION
}

/// Restore withdrawal/mirror links in a state that lost them (an import)
///
/// Links pointing at entries that no longer exist are cleared, one-sided
/// links are completed, and the remaining unlinked pairs are matched by
/// amount and day, the same pairing [`LedgerService::check_links`] uses.
/// Returns the number of pairs that were linked.
pub fn relink(state: &mut AppState) -> usize {
    let withdrawal_ids: HashSet<TransactionId> = state
        .vault_transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::VaultOut)
        .map(|t| t.id.clone())
        .collect();
    let mirror_ids: HashSet<TransactionId> = state
        .transactions
        .iter()
        .filter(|t| is_mirror(t))
        .map(|t| t.id.clone())
        .collect();

    for w in state.vault_transactions.iter_mut() {
        if w.linked_id.as_ref().is_some_and(|l| !mirror_ids.contains(l)) {
            w.linked_id = None;
        }
    }
    for m in state.transactions.iter_mut() {
        if m.linked_id.as_ref().is_some_and(|l| !withdrawal_ids.contains(l)) {
            m.linked_id = None;
        }
    }

    let mut linked = 0;

    for wi in 0..state.vault_transactions.len() {
        let w = &state.vault_transactions[wi];
        if w.transaction_type != TransactionType::VaultOut {
            continue;
        }
        let w_id = w.id.clone();

        let mi = match &w.linked_id {
            Some(l) => state.transactions.iter().position(|m| &m.id == l),
            None => {
                let (amount, day) = (w.amount, w.day());
                state
                    .transactions
                    .iter()
                    .position(|m| m.linked_id.as_ref() == Some(&w_id))
                    .or_else(|| {
                        state.transactions.iter().position(|m| {
                            is_mirror(m)
                                && m.linked_id.is_none()
                                && m.amount == amount
                                && m.day() == day
                        })
                    })
            }
        };
        let Some(mi) = mi else {
            continue;
        };

        let mirror = &mut state.transactions[mi];
        if mirror.linked_id.as_ref().is_some_and(|l| l != &w_id) {
            continue;
        }
        let pair_was_complete =
            mirror.linked_id.is_some() && state.vault_transactions[wi].linked_id.is_some();
        mirror.linked_id = Some(w_id);
        let m_id = mirror.id.clone();
        state.vault_transactions[wi].linked_id = Some(m_id);

        if !pair_was_complete {
            linked += 1;
        }
    }

    linked
}

fn link_report(state: &AppState) -> LinkReport {
    let mirrors: Vec<&Transaction> = state.transactions.iter().filter(|t| is_mirror(t)).collect();
    let mut claimed: HashSet<&TransactionId> = HashSet::new();
    let mut report = LinkReport::default();

    // Explicit links first so heuristic pairing can't steal a linked mirror
    let withdrawals: Vec<&Transaction> = state
        .vault_transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::VaultOut)
        .collect();

    let mut unlinked = Vec::new();
    for w in &withdrawals {
        match &w.linked_id {
            Some(linked) => match mirrors.iter().find(|m| &m.id == linked) {
                Some(m) => {
                    claimed.insert(&m.id);
                }
                None => report.missing_mirrors.push((*w).clone()),
            },
            None => unlinked.push(*w),
        }
    }

    for w in unlinked {
        let partner = mirrors.iter().find(|m| {
            m.linked_id.is_none()
                && !claimed.contains(&m.id)
                && m.amount == w.amount
                && m.day() == w.day()
        });
        match partner {
            Some(m) => {
                claimed.insert(&m.id);
            }
            None => report.missing_mirrors.push(w.clone()),
        }
    }

    report.orphaned_mirrors = mirrors
        .into_iter()
        .filter(|m| !claimed.contains(&m.id))
        .cloned()
        .collect();

    report
}
