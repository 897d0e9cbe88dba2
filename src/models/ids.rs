//! Transaction identifiers
//!
//! Ids are opaque strings: freshly created ones are random, while imported
//! ones are kept verbatim so backups round-trip.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Length of a generated id
const GENERATED_LEN: usize = 12;

/// Identifier of a transaction in either ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create a new random ID
    pub fn new() -> Self {
        let mut raw = Uuid::new_v4().simple().to_string();
        raw.truncate(GENERATED_LEN);
        Self(raw)
    }

    /// Wrap an existing id string (e.g. from an import)
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl PartialEq<str> for TransactionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
