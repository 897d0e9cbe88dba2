//! Category CLI commands
//!
//! Implements CLI commands for the income, expense and vault category lists.

use clap::Subcommand;

use crate::display::category::{format_category_list, format_category_tree};
use crate::error::FinTrackResult;
use crate::models::CategoryKind;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories (all three lists unless one is named)
    List {
        /// income, expense or vault
        kind: Option<CategoryKind>,
    },

    /// Append a category to a list
    Add {
        /// income, expense or vault
        kind: CategoryKind,
        /// Category name
        name: String,
    },

    /// Remove a category from a list
    Delete {
        /// income, expense or vault
        kind: CategoryKind,
        /// Category name
        name: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> FinTrackResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind } => match kind {
            Some(kind) => print!("{}", format_category_list(kind, &service.list(kind)?)),
            None => print!("{}", format_category_tree(&service.all()?)),
        },

        CategoryCommands::Add { kind, name } => {
            if service.add(kind, &name)? {
                println!("Added {} category: {}", kind.label().to_lowercase(), name.trim());
            } else {
                println!("'{}' is already in the {} list.", name.trim(), kind.label().to_lowercase());
            }
        }

        CategoryCommands::Delete { kind, name } => {
            let usage = service.usage(&name)?;
            let removed = service.delete(kind, &name)?;

            if removed == 0 {
                println!("'{}' is not in the {} list.", name, kind.label().to_lowercase());
            } else {
                println!("Deleted {} category: {}", kind.label().to_lowercase(), name);
                if usage > 0 {
                    println!("  {} existing transaction(s) keep this category.", usage);
                }
            }
        }
    }

    Ok(())
}
