//! Ledger error types for validation and state errors.

use koperasi_shared::AppError;
use koperasi_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Description is blank.
    #[error("Journal description must not be empty")]
    EmptyDescription,

    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientEntries,

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedTransaction {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Entry totals are zero.
    #[error("Journal entry total must be greater than zero")]
    ZeroTotal,

    /// A line has both debit and credit equal to zero.
    #[error("Line {0} has neither a debit nor a credit amount")]
    ZeroAmount(usize),

    /// A line carries a negative amount.
    #[error("Line {0} has a negative amount")]
    NegativeAmount(usize),

    // ========== Reference Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    // ========== State Errors ==========
    /// Batch-generated entries cannot be edited or deleted.
    #[error("Journal entry {0} was generated by the monthly batch and cannot be changed")]
    SystemEntryImmutable(JournalEntryId),

    // ========== Concurrency Errors ==========
    /// Concurrent modification detected and retries were exhausted.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    // ========== Store Errors ==========
    /// Underlying store failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::InsufficientEntries => "INSUFFICIENT_ENTRIES",
            Self::UnbalancedTransaction { .. } => "UNBALANCED_TRANSACTION",
            Self::ZeroTotal => "ZERO_TOTAL",
            Self::ZeroAmount(_) => "ZERO_AMOUNT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::SystemEntryImmutable(_) => "SYSTEM_ENTRY_IMMUTABLE",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::EmptyDescription
            | Self::InsufficientEntries
            | Self::UnbalancedTransaction { .. }
            | Self::ZeroTotal
            | Self::ZeroAmount(_)
            | Self::NegativeAmount(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::EntryNotFound(_) => 404,

            // 409 Conflict
            Self::ConcurrentModification => 409,

            // 422 Unprocessable - business rule
            Self::SystemEntryImmutable(_) => 422,

            // 500 Internal Server Error
            Self::Store(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            422 => Self::BusinessRule(message),
            500 => Self::Database(message),
            _ => Self::Validation(message),
        }
    }
}
