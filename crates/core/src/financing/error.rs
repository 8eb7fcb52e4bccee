//! Financing error types.

use koperasi_shared::AppError;
use koperasi_shared::types::{ContractId, MemberId};
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::ContractStatus;

/// Errors raised by financing operations.
#[derive(Debug, Error)]
pub enum FinancingError {
    /// Item description is blank.
    #[error("Item description must not be empty")]
    EmptyItem,

    /// Cost price must be positive.
    #[error("Cost price must be greater than zero")]
    InvalidPrincipal,

    /// Tenor must be positive.
    #[error("Tenor must be at least one month")]
    InvalidTenor,

    /// Down payment outside `0 <= dp <= cost price`.
    #[error("Down payment {down_payment} must be at least zero and at most the cost price {cost_price}")]
    InvalidDownPayment {
        /// Requested down payment.
        down_payment: Decimal,
        /// Cost price.
        cost_price: Decimal,
    },

    /// Financed amount exceeds the member's ceiling.
    #[error("Financing of {requested} exceeds the ceiling of {ceiling}")]
    CeilingExceeded {
        /// Cost price less down payment.
        requested: Decimal,
        /// Multiplier times total savings.
        ceiling: Decimal,
    },

    /// Member not found.
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    /// Inactive members cannot open contracts.
    #[error("Member {0} is inactive")]
    MemberInactive(MemberId),

    /// Contract not found.
    #[error("Contract not found: {0}")]
    ContractNotFound(ContractId),

    /// Status change not allowed.
    #[error("Cannot move contract from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: ContractStatus,
        /// Requested status.
        to: ContractStatus,
    },

    /// Concurrent modification detected and retries were exhausted.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    /// Underlying store failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl FinancingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyItem => "EMPTY_ITEM",
            Self::InvalidPrincipal => "INVALID_PRINCIPAL",
            Self::InvalidTenor => "INVALID_TENOR",
            Self::InvalidDownPayment { .. } => "INVALID_DOWN_PAYMENT",
            Self::CeilingExceeded { .. } => "CEILING_EXCEEDED",
            Self::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            Self::MemberInactive(_) => "MEMBER_INACTIVE",
            Self::ContractNotFound(_) => "CONTRACT_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
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

impl From<FinancingError> for AppError {
    fn from(err: FinancingError) -> Self {
        let message = err.to_string();
        match err {
            FinancingError::EmptyItem
            | FinancingError::InvalidPrincipal
            | FinancingError::InvalidTenor
            | FinancingError::InvalidDownPayment { .. } => Self::Validation(message),
            FinancingError::CeilingExceeded { .. }
            | FinancingError::MemberInactive(_)
            | FinancingError::InvalidTransition { .. } => Self::BusinessRule(message),
            FinancingError::MemberNotFound(_) | FinancingError::ContractNotFound(_) => {
                Self::NotFound(message)
            }
            FinancingError::ConcurrentModification => Self::Conflict(message),
            FinancingError::Store(_) => Self::Database(message),
        }
    }
}
