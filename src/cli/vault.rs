//! Vault CLI commands
//!
//! Deposits, withdrawals and the link integrity check.

use chrono::Utc;
use clap::Subcommand;

use crate::display::transaction::format_transaction_list;
use crate::error::FinTrackResult;
use crate::models::{LedgerKind, Transaction, TransactionId, TransactionType};
use crate::services::{LedgerService, TransactionFilter};
use crate::storage::Storage;

use super::parse_amount;
use super::transaction::resolve_category;

/// Vault subcommands
#[derive(Subcommand)]
pub enum VaultCommands {
    /// Move money from the usable balance into the vault
    Deposit {
        /// Amount
        amount: String,
        /// Vault category, defaults to the first in the list
        #[arg(short, long)]
        category: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Take money out of the vault (also records a mirrored expense)
    Withdraw {
        /// Amount
        amount: String,
        /// Vault category, defaults to the first in the list
        #[arg(short, long)]
        category: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List vault entries, newest first
    List {
        /// Number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete a vault entry
    Delete {
        /// Transaction ID
        id: String,
        /// Also delete the mirrored expense in the main ledger
        #[arg(long)]
        cascade: bool,
    },
    /// Report withdrawals and mirrors that lost their counterpart
    Check,
}

/// Handle a vault command
pub fn handle_vault_command(storage: &Storage, cmd: VaultCommands) -> FinTrackResult<()> {
    let service = LedgerService::new(storage);
    let currency = storage.ledger.read(|s| s.profile.currency.clone())?;

    match cmd {
        VaultCommands::Deposit {
            amount,
            category,
            description,
        } => {
            let txn = new_vault_entry(storage, TransactionType::VaultIn, &amount, category, description)?;
            let (entry, _) = service.add_vault_transaction(txn)?;
            println!(
                "Deposited {} into {}",
                entry.amount.format_with_symbol(&currency),
                entry.category
            );
            println!("  ID: {}", entry.id);
        }

        VaultCommands::Withdraw {
            amount,
            category,
            description,
        } => {
            let txn = new_vault_entry(storage, TransactionType::VaultOut, &amount, category, description)?;
            let (entry, mirror) = service.add_vault_transaction(txn)?;
            println!(
                "Withdrew {} from {}",
                entry.amount.format_with_symbol(&currency),
                entry.category
            );
            println!("  ID: {}", entry.id);
            if let Some(mirror) = mirror {
                println!("  Mirrored expense: {} ({})", mirror.id, mirror.description);
            }
        }

        VaultCommands::List { limit } => {
            let mut filter = TransactionFilter::new();
            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }
            let transactions = service.list(LedgerKind::Vault, &filter)?;
            println!("{}", format_transaction_list(&transactions, &currency));
        }

        VaultCommands::Delete { id, cascade } => {
            let id = TransactionId::from_raw(id);
            if cascade {
                for (kind, txn) in service.delete_linked(&id)? {
                    println!("Deleted {} from the {}", txn.id, kind.label());
                }
            } else {
                let removed = service.delete_vault_transaction(&id)?;
                println!("Deleted vault transaction {}", removed.id);
                if removed.linked_id.is_some() {
                    println!("Note: the mirrored expense was kept (use --cascade to remove both).");
                }
            }
        }

        VaultCommands::Check => {
            let report = service.check_links()?;
            if report.is_consistent() {
                println!("All vault withdrawals are mirrored in the main ledger.");
                return Ok(());
            }

            if !report.missing_mirrors.is_empty() {
                println!("Withdrawals without a mirrored expense:");
                println!("{}", format_transaction_list(&report.missing_mirrors, &currency));
            }
            if !report.orphaned_mirrors.is_empty() {
                println!("Mirrored expenses without a withdrawal:");
                println!("{}", format_transaction_list(&report.orphaned_mirrors, &currency));
            }
        }
    }

    Ok(())
}

fn new_vault_entry(
    storage: &Storage,
    kind: TransactionType,
    amount: &str,
    category: Option<String>,
    description: Option<String>,
) -> FinTrackResult<Transaction> {
    let amount = parse_amount(amount)?;
    let category = resolve_category(storage, kind, category)?;
    let txn = Transaction::new(kind, amount, category, Utc::now());

    Ok(match description {
        Some(description) => txn.with_description(description),
        None => txn,
    })
}
