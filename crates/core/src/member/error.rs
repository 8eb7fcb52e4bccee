//! Member and savings error types.

use koperasi_shared::AppError;
use koperasi_shared::types::MemberId;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::SavingsKind;

/// Errors raised by member and savings operations.
#[derive(Debug, Error)]
pub enum MemberError {
    /// Name is blank.
    #[error("Member name must not be empty")]
    EmptyName,

    /// Member number is blank.
    #[error("Member number must not be empty")]
    EmptyMemberNumber,

    /// Member number already registered.
    #[error("Member number '{0}' already exists")]
    DuplicateMemberNumber(String),

    /// Member not found.
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    /// Inactive members cannot transact.
    #[error("Member {0} is inactive")]
    MemberInactive(MemberId),

    /// Posting amount is zero or negative.
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    /// Simpanan pokok cannot be withdrawn.
    #[error("Simpanan pokok can only be deposited")]
    PokokWithdrawal,

    /// Withdrawal exceeds the balance.
    #[error("Insufficient {kind} savings: balance {balance}, requested {requested}")]
    InsufficientSavings {
        /// Savings kind.
        kind: SavingsKind,
        /// Current balance.
        balance: Decimal,
        /// Requested withdrawal.
        requested: Decimal,
    },

    /// Member still holds savings or open contracts.
    #[error("Member {0} still has savings or open financing contracts")]
    HasObligations(MemberId),

    /// Concurrent modification detected and retries were exhausted.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    /// Underlying store failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl MemberError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "EMPTY_NAME",
            Self::EmptyMemberNumber => "EMPTY_MEMBER_NUMBER",
            Self::DuplicateMemberNumber(_) => "DUPLICATE_MEMBER_NUMBER",
            Self::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            Self::MemberInactive(_) => "MEMBER_INACTIVE",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::PokokWithdrawal => "POKOK_WITHDRAWAL",
            Self::InsufficientSavings { .. } => "INSUFFICIENT_SAVINGS",
            Self::HasObligations(_) => "MEMBER_HAS_OBLIGATIONS",
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

impl From<MemberError> for AppError {
    fn from(err: MemberError) -> Self {
        let message = err.to_string();
        match err {
            MemberError::EmptyName | MemberError::EmptyMemberNumber | MemberError::InvalidAmount => {
                Self::Validation(message)
            }
            MemberError::DuplicateMemberNumber(_) | MemberError::ConcurrentModification => {
                Self::Conflict(message)
            }
            MemberError::MemberNotFound(_) => Self::NotFound(message),
            MemberError::MemberInactive(_)
            | MemberError::PokokWithdrawal
            | MemberError::InsufficientSavings { .. }
            | MemberError::HasObligations(_) => Self::BusinessRule(message),
            MemberError::Store(_) => Self::Database(message),
        }
    }
}
