//! Display formatting for terminal output
//!
//! Provides utilities for formatting ledgers, balances, categories and
//! analytics reports for the terminal.

pub mod balance;
pub mod category;
pub mod report;
pub mod transaction;

pub use balance::{format_balances, format_dashboard};
pub use category::{format_category_list, format_category_tree};
pub use report::format_breakdown;
pub use transaction::{format_transaction_details, format_transaction_list};
