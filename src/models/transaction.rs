//! Transaction model
//!
//! A single entry in either the main ledger or the vault ledger. Entries are
//! immutable once created; the only way to change one is to delete it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::CategoryKind;
use super::ids::TransactionId;
use super::money::Amount;

/// Kind of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money earned
    Income,
    /// Money spent
    Expense,
    /// Money received as a loan
    Borrowed,
    /// Deposit into the vault
    VaultIn,
    /// Withdrawal from the vault
    VaultOut,
}

impl TransactionType {
    /// All types, in display order
    pub const ALL: [TransactionType; 5] = [
        Self::Income,
        Self::Expense,
        Self::Borrowed,
        Self::VaultIn,
        Self::VaultOut,
    ];

    /// Wire name (`income`, `vault_out`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Borrowed => "borrowed",
            Self::VaultIn => "vault_in",
            Self::VaultOut => "vault_out",
        }
    }

    /// Parse the stored name (`income`, `vault_out`, ...), ignoring case
    ///
    /// Unlike [`FromStr`], the command-line aliases are not accepted.
    pub fn from_wire(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        [
            Self::Income,
            Self::Expense,
            Self::Borrowed,
            Self::VaultIn,
            Self::VaultOut,
        ]
        .into_iter()
        .find(|t| t.as_str() == s)
    }

    /// Whether this type belongs in the vault ledger
    pub fn is_vault(&self) -> bool {
        matches!(self, Self::VaultIn | Self::VaultOut)
    }

    /// Category list a transaction of this type picks from
    pub fn category_kind(&self) -> CategoryKind {
        match self {
            Self::Income | Self::Borrowed => CategoryKind::Income,
            Self::Expense => CategoryKind::Expense,
            Self::VaultIn | Self::VaultOut => CategoryKind::Vault,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "borrowed" | "loan" => Ok(Self::Borrowed),
            "vault_in" | "deposit" => Ok(Self::VaultIn),
            "vault_out" | "withdraw" | "withdrawal" => Ok(Self::VaultOut),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Kind of movement
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Positive amount
    pub amount: Amount,

    /// Category name from the matching category list
    pub category: String,

    /// When the movement happened
    pub date: DateTime<Utc>,

    /// Free-text note
    #[serde(default)]
    pub description: String,

    /// Lender, for borrowed money
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrowed_from: Option<String>,

    /// Promised repayment date, for borrowed money
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repay_date: Option<NaiveDate>,

    /// Counterpart in the other ledger (vault withdrawal <-> mirrored expense)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_id: Option<TransactionId>,
}

impl Transaction {
    /// Create a new transaction with a fresh id
    pub fn new(
        transaction_type: TransactionType,
        amount: Amount,
        category: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            transaction_type,
            amount,
            category: category.into(),
            date,
            description: String::new(),
            borrowed_from: None,
            repay_date: None,
            linked_id: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the loan details
    pub fn with_loan(mut self, lender: impl Into<String>, repay_date: Option<NaiveDate>) -> Self {
        self.borrowed_from = Some(lender.into());
        self.repay_date = repay_date;
        self
    }

    /// Whether this is an income entry
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    /// Whether this is an expense entry
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Whether this entry belongs to the vault ledger
    pub fn is_vault(&self) -> bool {
        self.transaction_type.is_vault()
    }

    /// Calendar date of the entry
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Validate the fields every entry must satisfy
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(
                self.amount.value(),
            ));
        }

        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::EmptyCategory);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.day(),
            self.transaction_type,
            self.amount,
            self.category
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionValidationError {
    NonPositiveAmount(f64),
    EmptyCategory,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(v) => write!(f, "Amount must be greater than zero (got {})", v),
            Self::EmptyCategory => write!(f, "Category cannot be empty"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
