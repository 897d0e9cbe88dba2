//! Service layer for FinTrack
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, the vault linkage, derived figures and the daily
//! side-channels (tips and reminders).

pub mod analytics;
pub mod balance;
pub mod category;
pub mod import;
pub mod ledger;
pub mod profile;
pub mod reminder;
pub mod tips;

pub use balance::Balances;
pub use category::CategoryService;
pub use import::{ImportResult, ImportService};
pub use ledger::{LedgerService, LinkReport, TransactionFilter};
pub use profile::{ProfileService, ProfileUpdate};
pub use reminder::{Notifier, ReminderService, TerminalNotifier};
pub use tips::{DailyTip, GeminiTipProvider, TipProvider, TipService};
