//! Category lists
//!
//! Three ordered name lists (income, expense, vault). The expense list always
//! contains [`VAULT_DEDUCTION`], the tag that links vault withdrawals to the
//! main ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reserved expense category carried by mirrored vault withdrawals
pub const VAULT_DEDUCTION: &str = "Vault Deduction";

/// Fallback category for imported rows without one
pub const DEFAULT_CATEGORY: &str = "Other";

/// Which category list an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
    Vault,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 3] = [Self::Income, Self::Expense, Self::Vault];

    /// Label used in the category config sheet
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Vault => "Vault",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" | "spending" => Ok(Self::Expense),
            "vault" => Ok(Self::Vault),
            other => Err(format!("Unknown category list: {}", other)),
        }
    }
}

/// Whether `name` is the protected entry of `kind`
pub fn is_protected(kind: CategoryKind, name: &str) -> bool {
    kind == CategoryKind::Expense && name == VAULT_DEDUCTION
}

/// The three category lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    pub income: Vec<String>,
    pub expense: Vec<String>,
    #[serde(default = "default_vault")]
    pub vault: Vec<String>,
}

fn to_owned_list(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn default_vault() -> Vec<String> {
    to_owned_list(&[
        "Emergency Fund",
        "Savings Goal",
        "Retirement",
        "Investment Capital",
        "Other",
    ])
}

impl Default for Categories {
    fn default() -> Self {
        Self {
            income: to_owned_list(&["Salary", "Freelance", "Investments", "Gift", "Other"]),
            expense: to_owned_list(&[
                "Food",
                "Rent",
                "Utilities",
                "Transport",
                "Entertainment",
                "Shopping",
                "Health",
                VAULT_DEDUCTION,
                "Other",
            ]),
            vault: default_vault(),
        }
    }
}

impl Categories {
    /// Borrow one list
    pub fn list(&self, kind: CategoryKind) -> &[String] {
        match kind {
            CategoryKind::Income => &self.income,
            CategoryKind::Expense => &self.expense,
            CategoryKind::Vault => &self.vault,
        }
    }

    fn list_mut(&mut self, kind: CategoryKind) -> &mut Vec<String> {
        match kind {
            CategoryKind::Income => &mut self.income,
            CategoryKind::Expense => &mut self.expense,
            CategoryKind::Vault => &mut self.vault,
        }
    }

    /// Check for an exact (case-sensitive) match
    pub fn contains(&self, kind: CategoryKind, name: &str) -> bool {
        self.list(kind).iter().any(|c| c == name)
    }

    /// Append a category, preserving order
    ///
    /// Returns `false` without changing anything when the name is blank or
    /// already present.
    pub fn add(&mut self, kind: CategoryKind, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(kind, name) {
            return false;
        }

        self.list_mut(kind).push(name.to_string());
        true
    }

    /// Remove every occurrence of a category
    ///
    /// Returns the number of entries removed, or the protected name as an
    /// error when asked to drop the vault deduction tag.
    pub fn remove(&mut self, kind: CategoryKind, name: &str) -> Result<usize, String> {
        if is_protected(kind, name) {
            return Err(name.to_string());
        }

        let list = self.list_mut(kind);
        let before = list.len();
        list.retain(|c| c != name);
        Ok(before - list.len())
    }

    /// Re-append the reserved expense category if it went missing
    pub fn ensure_reserved(&mut self) -> bool {
        if self.contains(CategoryKind::Expense, VAULT_DEDUCTION) {
            return false;
        }
        self.expense.push(VAULT_DEDUCTION.to_string());
        true
    }

    /// First entry of a list, used as the default pick
    pub fn first(&self, kind: CategoryKind) -> Option<&str> {
        self.list(kind).first().map(String::as_str)
    }
}
