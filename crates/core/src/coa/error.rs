//! Chart of accounts error types.

use koperasi_shared::AppError;
use koperasi_shared::types::AccountId;
use thiserror::Error;

/// Errors raised by chart of accounts operations.
#[derive(Debug, Error)]
pub enum CoaError {
    /// Account code is blank.
    #[error("Account code must not be empty")]
    EmptyCode,

    /// Account name is blank.
    #[error("Account name must not be empty")]
    EmptyName,

    /// Account code already used by another account.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// The requested parent would make the hierarchy loop.
    #[error("Account '{code}' cannot be placed under '{parent}': hierarchy would loop")]
    ParentCycle {
        /// Account being moved.
        code: String,
        /// Requested parent code.
        parent: String,
    },

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is still referenced by journal lines.
    #[error("Account '{code}' is referenced by {references} journal line(s)")]
    AccountInUse {
        /// Account code.
        code: String,
        /// Number of referencing journal lines.
        references: usize,
    },

    /// Account still has child accounts.
    #[error("Account '{code}' still has {children} child account(s)")]
    HasChildren {
        /// Account code.
        code: String,
        /// Number of direct children.
        children: usize,
    },

    /// Account type cannot change once journal lines reference the account.
    #[error("Cannot change type of account '{0}' because it has journal lines")]
    TypeChangeNotAllowed(String),

    /// Concurrent modification detected and retries were exhausted.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    /// Underlying store failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl CoaError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCode => "EMPTY_CODE",
            Self::EmptyName => "EMPTY_NAME",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::ParentCycle { .. } => "PARENT_CYCLE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInUse { .. } => "ACCOUNT_IN_USE",
            Self::HasChildren { .. } => "ACCOUNT_HAS_CHILDREN",
            Self::TypeChangeNotAllowed(_) => "ACCOUNT_TYPE_CHANGE_NOT_ALLOWED",
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

impl From<CoaError> for AppError {
    fn from(err: CoaError) -> Self {
        let message = err.to_string();
        match err {
            CoaError::EmptyCode | CoaError::EmptyName | CoaError::ParentCycle { .. } => {
                Self::Validation(message)
            }
            CoaError::DuplicateCode(_) => Self::Conflict(message),
            CoaError::AccountNotFound(_) => Self::NotFound(message),
            CoaError::AccountInUse { .. }
            | CoaError::HasChildren { .. }
            | CoaError::TypeChangeNotAllowed(_) => Self::BusinessRule(message),
            CoaError::ConcurrentModification => Self::Conflict(message),
            CoaError::Store(_) => Self::Database(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_use_maps_to_business_rule() {
        let err = CoaError::AccountInUse {
            code: "1-1100".to_string(),
            references: 3,
        };
        assert_eq!(err.error_code(), "ACCOUNT_IN_USE");
        assert_eq!(
            err.to_string(),
            "Account '1-1100' is referenced by 3 journal line(s)"
        );
        assert_eq!(AppError::from(err).status_code(), 422);
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let app: AppError = CoaError::DuplicateCode("1-1100".to_string()).into();
        assert_eq!(app.status_code(), 409);
    }
}
