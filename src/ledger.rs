// 💰 Ledger - Transaction data model
//
// A transaction is a kind (income or expense), a non-negative amount and a
// free-form category. The sign of the money movement comes from the kind,
// never from the amount.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("amount must be a finite, non-negative number (got {0})")]
    InvalidAmount(f64),

    #[error("unknown transaction kind '{0}' (expected 'income' or 'expense')")]
    UnknownKind(String),
}

// ============================================================================
// KIND
// ============================================================================

/// Income/expense classification of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Money coming in
    #[serde(alias = "Einnahme")]
    Income,

    /// Money going out
    #[serde(alias = "Ausgabe")]
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    /// Accepts the canonical labels plus the German ones older databases used
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "einnahme" => Ok(Kind::Income),
            "expense" | "ausgabe" => Ok(Kind::Expense),
            _ => Err(LedgerError::UnknownKind(s.to_string())),
        }
    }
}

// ============================================================================
// TRANSACTIONS
// ============================================================================

/// A recorded ledger entry. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub kind: Kind,
    pub amount: f64,
    pub category: String,
}

/// An entry that has passed validation but has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    kind: Kind,
    amount: f64,
    category: String,
}

impl NewTransaction {
    pub fn new(kind: Kind, amount: f64, category: impl Into<String>) -> Result<Self, LedgerError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        Ok(Self {
            kind,
            amount,
            category: category.into(),
        })
    }

    pub fn income(amount: f64, category: impl Into<String>) -> Result<Self, LedgerError> {
        Self::new(Kind::Income, amount, category)
    }

    pub fn expense(amount: f64, category: impl Into<String>) -> Result<Self, LedgerError> {
        Self::new(Kind::Expense, amount, category)
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Attach the store-assigned id
    pub fn into_transaction(self, id: i64) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
        }
    }
}
