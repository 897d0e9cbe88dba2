//! Transaction CLI commands
//!
//! Implements CLI commands for the main ledger.

use clap::Subcommand;

use crate::display::transaction::{format_transaction_details, format_transaction_list};
use crate::error::{FinTrackError, FinTrackResult};
use crate::models::{
    CategoryKind, LedgerKind, Transaction, TransactionId, TransactionType, VAULT_DEDUCTION,
};
use crate::services::{LedgerService, TransactionFilter};
use crate::storage::Storage;

use super::{parse_amount, parse_day, transaction_date};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add an income, expense or borrowed entry
    Add {
        /// income, expense or borrowed
        kind: TransactionType,
        /// Amount (e.g. "50", "1,250.00")
        amount: String,
        /// Category name, defaults to the first in the matching list
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to now
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Lender, for borrowed money
        #[arg(long = "from")]
        borrowed_from: Option<String>,
        /// Repayment date (YYYY-MM-DD), for borrowed money
        #[arg(long = "repay")]
        repay_date: Option<String>,
    },
    /// List main ledger entries, newest first
    List {
        /// Only this type
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,
        /// Match category or description
        #[arg(short, long)]
        search: Option<String>,
        /// Number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one transaction from either ledger
    Show {
        /// Transaction ID
        id: String,
    },
    /// Delete a main ledger entry
    Delete {
        /// Transaction ID
        id: String,
        /// Also delete the linked vault withdrawal
        #[arg(long)]
        cascade: bool,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(storage: &Storage, cmd: TransactionCommands) -> FinTrackResult<()> {
    let service = LedgerService::new(storage);
    let currency = storage.ledger.read(|s| s.profile.currency.clone())?;

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            date,
            description,
            borrowed_from,
            repay_date,
        } => {
            if kind.is_vault() {
                return Err(FinTrackError::Validation(
                    "Use 'fintrack vault deposit|withdraw' for vault entries".into(),
                ));
            }

            let amount = parse_amount(&amount)?;
            let category = resolve_category(storage, kind, category)?;
            let mut txn = Transaction::new(kind, amount, category, transaction_date(date.as_deref())?);

            if let Some(description) = description {
                txn = txn.with_description(description);
            }

            if kind == TransactionType::Borrowed {
                if let Some(lender) = borrowed_from {
                    let repay = repay_date.as_deref().map(parse_day).transpose()?;
                    txn = txn.with_loan(lender, repay);
                }
            }

            let added = service.add_main_transaction(txn)?;
            println!("Added {} {}", added.transaction_type, added.amount.format_with_symbol(&currency));
            println!("  ID: {}", added.id);
        }

        TransactionCommands::List { kind, search, limit } => {
            let mut filter = TransactionFilter::new();
            if let Some(kind) = kind {
                filter = filter.of_type(kind);
            }
            if let Some(search) = search {
                filter = filter.search(search);
            }
            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }

            let transactions = service.list(LedgerKind::Main, &filter)?;
            println!("{}", format_transaction_list(&transactions, &currency));
        }

        TransactionCommands::Show { id } => {
            let id = TransactionId::from_raw(id);
            let (kind, txn) = service
                .find(&id)?
                .ok_or_else(|| FinTrackError::transaction_not_found(id.to_string()))?;
            print!("{}", format_transaction_details(&txn, kind, &currency));
        }

        TransactionCommands::Delete { id, cascade } => {
            let id = TransactionId::from_raw(id);
            if cascade {
                let removed = service.delete_linked(&id)?;
                for (kind, txn) in removed {
                    println!("Deleted {} from the {}", txn.id, kind.label());
                }
            } else {
                let removed = service.delete_transaction(&id)?;
                println!("Deleted transaction {}", removed.id);
                if removed.linked_id.is_some() {
                    println!("Note: the linked vault withdrawal was kept (use --cascade to remove both).");
                }
            }
        }
    }

    Ok(())
}

/// Pick the category for a new entry from the list matching its type
pub(crate) fn resolve_category(
    storage: &Storage,
    kind: TransactionType,
    requested: Option<String>,
) -> FinTrackResult<String> {
    let list_kind = kind.category_kind();
    let categories = storage.ledger.read(|s| s.categories.clone())?;

    let name = match requested {
        Some(name) => name.trim().to_string(),
        None => categories
            .first(list_kind)
            .map(str::to_string)
            .ok_or_else(|| FinTrackError::Validation(format!("No {} categories defined", list_kind)))?,
    };

    if list_kind == CategoryKind::Expense && name == VAULT_DEDUCTION {
        return Err(FinTrackError::Validation(format!(
            "'{}' is reserved for vault withdrawals",
            VAULT_DEDUCTION
        )));
    }

    if !categories.contains(list_kind, &name) {
        return Err(FinTrackError::Validation(format!(
            "Unknown {} category '{}' (add it with 'fintrack category add {} \"{}\"')",
            list_kind,
            name,
            list_kind.label().to_lowercase(),
            name
        )));
    }

    Ok(name)
}
