//! Transaction display formatting
//!
//! Ledger listings as tables, plus a detail view for a single entry.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{LedgerKind, Transaction};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl TransactionRow {
    fn new(txn: &Transaction, currency: &str) -> Self {
        let link = if txn.linked_id.is_some() { " ⇄" } else { "" };

        Self {
            id: txn.id.to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            kind: format!("{}{}", txn.transaction_type, link),
            category: txn.category.clone(),
            amount: txn.amount.format_with_symbol(currency),
            description: truncate(&txn.description, 40),
        }
    }
}

/// Format a ledger as a table, newest first
pub fn format_transaction_list(transactions: &[Transaction], currency: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|t| TransactionRow::new(t, currency))
        .collect();

    Table::new(rows)
        .with(Style::psql())
        .modify(Columns::single(4), Alignment::right())
        .to_string()
}

/// Format one transaction with every field
pub fn format_transaction_details(txn: &Transaction, ledger: LedgerKind, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Ledger:      {}\n", ledger.label()));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d %H:%M UTC")));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!("Amount:      {}\n", txn.amount.format_with_symbol(currency)));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    if let Some(lender) = &txn.borrowed_from {
        output.push_str(&format!("Borrowed:    {}\n", lender));
        if let Some(repay) = txn.repay_date {
            output.push_str(&format!("Repay by:    {}\n", repay));
        }
    }

    if let Some(linked) = &txn.linked_id {
        output.push_str(&format!("Linked to:   {}\n", linked));
    }

    output
}

/// Truncate a string to a maximum number of characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
