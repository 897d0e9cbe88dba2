//! Custom error types for FinTrack
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for FinTrack operations
#[derive(Error, Debug)]
pub enum FinTrackError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// An expense or vault deposit larger than the usable balance
    #[error("Insufficient funds: need {needed:.2}, have {available:.2}")]
    InsufficientFunds { needed: f64, available: f64 },

    /// A vault withdrawal larger than the vault balance
    #[error("Insufficient vault balance: need {needed:.2}, have {available:.2}")]
    InsufficientVaultBalance { needed: f64, available: f64 },

    /// Attempt to remove a category the ledger depends on
    #[error("Category '{0}' is protected and cannot be deleted")]
    ProtectedCategory(String),

    /// Spreadsheet did not have the expected layout
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Failure talking to an external collaborator (tip service)
    #[error("External service failure: {0}")]
    ExternalService(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FinTrackError {
    /// Create a "not found" error for main ledger transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for vault transactions
    pub fn vault_transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Vault transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error rejected a mutation for lack of money
    pub fn is_insufficient(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds { .. } | Self::InsufficientVaultBalance { .. }
        )
    }

    /// How much money was missing, for funds errors
    pub fn shortfall(&self) -> Option<f64> {
        match self {
            Self::InsufficientFunds { needed, available }
            | Self::InsufficientVaultBalance { needed, available } => Some(needed - available),
            _ => None,
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for FinTrackError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinTrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for FinTrack operations
pub type FinTrackResult<T> = Result<T, FinTrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinTrackError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = FinTrackError::transaction_not_found("abc123");
        assert_eq!(err.to_string(), "Transaction not found: abc123");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insufficient_funds_shows_shortfall() {
        let err = FinTrackError::InsufficientFunds {
            needed: 150.0,
            available: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: need 150.00, have 100.00"
        );
        assert!(err.is_insufficient());
        assert_eq!(err.shortfall(), Some(50.0));
    }

    #[test]
    fn test_insufficient_vault_balance_shows_shortfall() {
        let err = FinTrackError::InsufficientVaultBalance {
            needed: 75.0,
            available: 50.0,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient vault balance: need 75.00, have 50.00"
        );
    }

    #[test]
    fn test_protected_category_error() {
        let err = FinTrackError::ProtectedCategory("Vault Deduction".into());
        assert_eq!(
            err.to_string(),
            "Category 'Vault Deduction' is protected and cannot be deleted"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FinTrackError = io_err.into();
        assert!(matches!(err, FinTrackError::Io(_)));
    }
}
