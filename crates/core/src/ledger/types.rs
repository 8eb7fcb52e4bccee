//! Ledger domain types for journal posting and validation.

use koperasi_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Input for a single journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (>= 0).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (>= 0).
    #[serde(default)]
    pub credit: Decimal,
}

impl JournalLineInput {
    /// Convenience constructor for a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// Convenience constructor for a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }
}

/// Input for posting or editing a manual journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostJournalInput {
    /// Free-text description.
    pub description: String,
    /// The lines (must have at least 2).
    pub lines: Vec<JournalLineInput>,
}

/// Journal totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransactionTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
    /// Whether the entry is balanced (debits == credits).
    pub is_balanced: bool,
}

impl TransactionTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}
