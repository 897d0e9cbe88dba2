//! FinTrack - terminal personal finance tracker
//!
//! This library provides the core functionality for FinTrack: a main ledger
//! of income, expenses and borrowed money, a savings vault whose withdrawals
//! are mirrored into the main ledger, and spreadsheet export/import.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, categories, profile, state)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer (balances, linker, analytics, import)
//! - `export`: Spreadsheet workbooks and their xlsx/csv codecs
//! - `audit`: Audit logging system
//! - `backup`: JSON state snapshots
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::config::paths::FinTrackPaths;
//! use fintrack::storage::Storage;
//! use fintrack::services::balance;
//!
//! let storage = Storage::new(FinTrackPaths::new()?)?;
//! storage.load_all()?;
//! let balances = storage.ledger.read(balance::for_state)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FinTrackError, FinTrackResult};
