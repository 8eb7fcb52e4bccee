//! Monthly batch error types.

use koperasi_shared::AppError;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors raised by the monthly batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The period has already been processed.
    #[error("Monthly batch for period {0} has already been run")]
    AlreadyRun(String),

    /// A configured batch account does not exist.
    #[error("Batch account '{0}' not found in chart of accounts")]
    MissingAccount(String),

    /// The synthesized entry failed to apply.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Concurrent modification detected and retries were exhausted.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    /// Underlying store failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl BatchError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyRun(_) => "BATCH_ALREADY_RUN",
            Self::MissingAccount(_) => "MISSING_ACCOUNT",
            Self::Ledger(e) => e.error_code(),
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::AlreadyRun(_) | BatchError::ConcurrentModification => {
                Self::Conflict(err.to_string())
            }
            BatchError::MissingAccount(_) => Self::Configuration(err.to_string()),
            BatchError::Ledger(e) => e.into(),
            BatchError::Store(_) => Self::Database(err.to_string()),
        }
    }
}
