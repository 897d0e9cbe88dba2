//! Audit logging system for FinTrack
//!
//! Records every ledger, category and profile mutation, plus bulk imports and
//! restores, in an append-only JSONL file.
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(audit_log_path);
//! let entry = AuditEntry::create(EntityType::Transaction, txn.id.to_string(), None, &txn);
//! logger.log(&entry)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
