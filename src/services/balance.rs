//! Balance calculator
//!
//! Derives every aggregate from the two ledgers. Nothing here is stored; the
//! figures are recomputed on each query.

use serde::Serialize;

use crate::models::{Amount, AppState, Transaction, TransactionType, VAULT_DEDUCTION};

/// Aggregate figures over both ledgers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Balances {
    /// Total income (excluding mirrored vault withdrawals)
    pub income: Amount,
    /// Total expense (excluding mirrored vault withdrawals)
    pub expense: Amount,
    /// Total borrowed money
    pub borrowed: Amount,
    /// Money available for ordinary spending
    pub usable_balance: Amount,
    /// Money currently set aside in the vault
    pub vault_balance: Amount,
}

/// Compute balances from the main and vault ledgers
///
/// `usable = income + borrowed + withdrawals - (expense + deposits)`, where
/// withdrawals are the mirrored `Vault Deduction` expenses and deposits are
/// the `vault_in` entries.
pub fn compute(main: &[Transaction], vault: &[Transaction]) -> Balances {
    let mut income = Amount::zero();
    let mut expense = Amount::zero();
    let mut borrowed = Amount::zero();
    let mut withdrawals = Amount::zero();

    for txn in main {
        match txn.transaction_type {
            TransactionType::Income => income += txn.amount,
            TransactionType::Expense if txn.category == VAULT_DEDUCTION => {
                withdrawals += txn.amount
            }
            TransactionType::Expense => expense += txn.amount,
            TransactionType::Borrowed => borrowed += txn.amount,
            TransactionType::VaultIn | TransactionType::VaultOut => {}
        }
    }

    let mut vault_balance = Amount::zero();
    let mut deposits = Amount::zero();

    for txn in vault {
        match txn.transaction_type {
            TransactionType::VaultIn => {
                vault_balance += txn.amount;
                deposits += txn.amount;
            }
            TransactionType::VaultOut => vault_balance -= txn.amount,
            _ => {}
        }
    }

    Balances {
        income,
        expense,
        borrowed,
        usable_balance: (income + borrowed + withdrawals) - (expense + deposits),
        vault_balance,
    }
}

/// Compute balances for a whole state
pub fn for_state(state: &AppState) -> Balances {
    compute(&state.transactions, &state.vault_transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn txn(kind: TransactionType, amount: f64, category: &str) -> Transaction {
        Transaction::new(kind, Amount::new(amount), category, Utc::now())
    }

    #[test]
    fn test_empty_ledgers() {
        assert_eq!(compute(&[], &[]), Balances::default());
    }

    #[test]
    fn test_usable_balance_formula() {
        let main = vec![
            txn(TransactionType::Income, 1000.0, "Salary"),
            txn(TransactionType::Borrowed, 200.0, "Other"),
            txn(TransactionType::Expense, 300.0, "Food"),
            txn(TransactionType::Expense, 50.0, VAULT_DEDUCTION),
        ];
        let vault = vec![
            txn(TransactionType::VaultIn, 400.0, "Retirement"),
            txn(TransactionType::VaultOut, 50.0, "Retirement"),
        ];

        let b = compute(&main, &vault);

        assert_eq!(b.income.value(), 1000.0);
        assert_eq!(b.expense.value(), 300.0);
        assert_eq!(b.borrowed.value(), 200.0);
        assert_eq!(b.vault_balance.value(), 350.0);
        // 1000 + 200 + 50 - (300 + 400)
        assert_eq!(b.usable_balance.value(), 550.0);
    }

    #[test]
    fn test_mirrored_withdrawal_is_not_an_expense() {
        let main = vec![txn(TransactionType::Expense, 75.0, VAULT_DEDUCTION)];
        let b = compute(&main, &[]);

        assert_eq!(b.expense.value(), 0.0);
        assert_eq!(b.usable_balance.value(), 75.0);
    }

    #[test]
    fn test_misplaced_types_are_ignored() {
        let main = vec![txn(TransactionType::VaultIn, 10.0, "Savings Goal")];
        let vault = vec![txn(TransactionType::Income, 10.0, "Salary")];

        assert_eq!(compute(&main, &vault), Balances::default());
    }

    #[test]
    fn test_usable_balance_matches_sum_for_any_sequence() {
        let amounts = [12.5, 7.25, 100.0, 0.1, 33.3];
        let kinds = [
            TransactionType::Income,
            TransactionType::Expense,
            TransactionType::Borrowed,
        ];
        let mut main = Vec::new();
        let mut vault = Vec::new();

        for (i, amount) in amounts.iter().cycle().take(30).enumerate() {
            let kind = kinds[i % kinds.len()];
            main.push(txn(kind, *amount, "Other"));
            if i % 4 == 0 {
                vault.push(txn(TransactionType::VaultIn, *amount, "Savings Goal"));
            }
            if i % 5 == 0 {
                vault.push(txn(TransactionType::VaultOut, *amount / 2.0, "Savings Goal"));
                main.push(txn(TransactionType::Expense, *amount / 2.0, VAULT_DEDUCTION));
            }
        }

        let sum = |list: &[Transaction], f: &dyn Fn(&Transaction) -> bool| -> f64 {
            list.iter().filter(|t| f(t)).map(|t| t.amount.value()).sum()
        };
        let expected = sum(&main, &|t| t.is_income())
            + sum(&main, &|t| t.transaction_type == TransactionType::Borrowed)
            + sum(&vault, &|t| t.transaction_type == TransactionType::VaultOut)
            - sum(&main, &|t| t.is_expense() && t.category != VAULT_DEDUCTION)
            - sum(&vault, &|t| t.transaction_type == TransactionType::VaultIn);

        let b = compute(&main, &vault);
        assert!((b.usable_balance.value() - expected).abs() < 1e-9);
    }
}
