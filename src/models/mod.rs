//! Core data models for FinTrack
//!
//! Transactions, category lists, the user profile and the aggregate state
//! that holds both ledgers.

pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod profile;
pub mod state;
pub mod transaction;

pub use category::{Categories, CategoryKind, DEFAULT_CATEGORY, VAULT_DEDUCTION};
pub use ids::TransactionId;
pub use money::Amount;
pub use period::{month_name, ReportPeriod, MONTHS};
pub use profile::UserProfile;
pub use state::{AppState, LedgerKind};
pub use transaction::{Transaction, TransactionType};
