//! Analytics over the main ledger
//!
//! Dashboard figures, period filtering and per-category breakdowns. All
//! functions are pure and work on borrowed slices.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Amount, AppState, ReportPeriod, Transaction, TransactionType};

use super::balance::{self, Balances};

/// How many recent entries the dashboard shows
pub const RECENT_COUNT: usize = 5;

/// How many expense categories the dashboard ranks
pub const TOP_CATEGORY_COUNT: usize = 5;

/// One ranked expense category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Amount,
    /// Fraction of all expense, 0.0-1.0
    pub share: f64,
}

/// Everything the dashboard shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub balances: Balances,
    pub recent: Vec<Transaction>,
    pub top_expenses: Vec<CategoryShare>,
}

/// Income and expense totals for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub category: String,
    pub income: Amount,
    pub expense: Amount,
}

/// Result of [`category_breakdown`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// Per category, in order of first appearance
    pub rows: Vec<CategoryTotals>,
    /// Expense totals by category, largest first
    pub expense_slices: Vec<(String, Amount)>,
}

/// Dashboard figures for a state
pub fn dashboard(state: &AppState) -> DashboardStats {
    let recent = state
        .transactions
        .iter()
        .take(RECENT_COUNT)
        .cloned()
        .collect();

    DashboardStats {
        balances: balance::for_state(state),
        recent,
        top_expenses: top_expense_categories(&state.transactions, TOP_CATEGORY_COUNT),
    }
}

/// Largest expense categories with their share of total expense
pub fn top_expense_categories(transactions: &[Transaction], limit: usize) -> Vec<CategoryShare> {
    let totals = expense_totals(transactions);
    let all: f64 = totals.iter().map(|(_, amount)| amount.value()).sum();

    totals
        .into_iter()
        .take(limit)
        .map(|(category, total)| CategoryShare {
            share: if all > 0.0 { total.value() / all } else { 0.0 },
            category,
            total,
        })
        .collect()
}

/// Entries whose date falls within a period
pub fn filter_period(transactions: &[Transaction], period: &ReportPeriod) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| period.contains(t.day()))
        .cloned()
        .collect()
}

/// Income and expense per category
///
/// Categories where both totals are zero (borrowed-only, for instance) are
/// dropped.
pub fn category_breakdown(transactions: &[Transaction]) -> CategoryBreakdown {
    let mut rows: Vec<CategoryTotals> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for txn in transactions {
        let slot = *index.entry(txn.category.as_str()).or_insert_with(|| {
            rows.push(CategoryTotals {
                category: txn.category.clone(),
                income: Amount::zero(),
                expense: Amount::zero(),
            });
            rows.len() - 1
        });

        match txn.transaction_type {
            TransactionType::Income => rows[slot].income += txn.amount,
            TransactionType::Expense => rows[slot].expense += txn.amount,
            _ => {}
        }
    }

    rows.retain(|r| r.income.is_positive() || r.expense.is_positive());

    CategoryBreakdown {
        rows,
        expense_slices: expense_totals(transactions),
    }
}

/// Expense totals by category, largest first; ties keep first-appearance order
fn expense_totals(transactions: &[Transaction]) -> Vec<(String, Amount)> {
    let mut totals: Vec<(String, Amount)> = Vec::new();

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        match totals.iter_mut().find(|(c, _)| *c == txn.category) {
            Some((_, total)) => *total += txn.amount,
            None => totals.push((txn.category.clone(), txn.amount)),
        }
    }

    totals.sort_by(|a, b| b.1.value().total_cmp(&a.1.value()));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn txn(kind: TransactionType, amount: f64, category: &str, day: u32) -> Transaction {
        Transaction::new(
            kind,
            Amount::new(amount),
            category,
            Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
        )
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn(TransactionType::Income, 1000.0, "Salary", 1),
            txn(TransactionType::Expense, 300.0, "Rent", 2),
            txn(TransactionType::Expense, 50.0, "Food", 9),
            txn(TransactionType::Expense, 25.0, "Food", 16),
            txn(TransactionType::Borrowed, 80.0, "Other", 20),
            txn(TransactionType::Expense, 10.0, "Health", 30),
        ]
    }

    #[test]
    fn test_top_expense_categories() {
        let top = top_expense_categories(&sample(), 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].category, "Rent");
        assert_eq!(top[1].category, "Food");
        assert_eq!(top[1].total.value(), 75.0);
        assert!((top[0].share - 300.0 / 385.0).abs() < 1e-9);
    }

    #[test]
    fn test_dashboard_recent_is_capped() {
        let mut state = AppState::default();
        state.transactions = sample();

        let stats = dashboard(&state);
        assert_eq!(stats.recent.len(), RECENT_COUNT);
        assert_eq!(stats.recent[0].category, "Salary");
        assert_eq!(stats.top_expenses.len(), 3);
        assert_eq!(stats.balances.income.value(), 1000.0);
    }

    #[test]
    fn test_filter_period_by_week() {
        let period = ReportPeriod::month(2025, 3).with_week(2);
        let filtered = filter_period(&sample(), &period);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].category, "Food");

        let week5 = filter_period(&sample(), &ReportPeriod::month(2025, 3).with_week(5));
        assert_eq!(week5.len(), 1);
        assert_eq!(week5[0].category, "Health");
    }

    #[test]
    fn test_category_breakdown() {
        let breakdown = category_breakdown(&sample());

        let categories: Vec<&str> = breakdown.rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["Salary", "Rent", "Food", "Health"]);
        assert_eq!(breakdown.rows[2].expense.value(), 75.0);
        assert_eq!(breakdown.expense_slices[0].0, "Rent");
        assert_eq!(breakdown.expense_slices.last().unwrap().0, "Health");
    }

    #[test]
    fn test_empty_inputs() {
        assert!(top_expense_categories(&[], 5).is_empty());
        assert_eq!(category_breakdown(&[]), CategoryBreakdown::default());
    }
}
