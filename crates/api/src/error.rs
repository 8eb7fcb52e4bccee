//! JSON error responses.
//!
//! Every failure is returned as `{"error": CODE, "message": text}` with the
//! status code of the shared error taxonomy. Domain errors keep their own
//! specific code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use koperasi_core::batch::BatchError;
use koperasi_core::coa::CoaError;
use koperasi_core::financing::FinancingError;
use koperasi_core::ledger::LedgerError;
use koperasi_core::member::MemberError;
use koperasi_db::{SettingsRepoError, StoreError};
use koperasi_shared::AppError;
use serde_json::json;
use tracing::{error, warn};

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An error ready to be rendered as a response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Status code of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn with_code<E>(code: &'static str, err: E) -> Self
    where
        E: Into<AppError> + std::fmt::Display,
    {
        let message = err.to_string();
        let app: AppError = err.into();
        Self {
            code,
            message,
            ..Self::from(app)
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self {
            status: StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

macro_rules! domain_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    Self::with_code(err.error_code(), err)
                }
            }
        )*
    };
}

domain_error!(
    CoaError,
    LedgerError,
    MemberError,
    FinancingError,
    BatchError,
    StoreError
);

impl From<SettingsRepoError> for ApiError {
    fn from(err: SettingsRepoError) -> Self {
        match err {
            SettingsRepoError::Invalid(e) => Self::with_code("INVALID_SETTINGS", e),
            SettingsRepoError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            error!(code = self.code, error = %self.message, "Request failed");
            "An error occurred".to_string()
        } else {
            warn!(code = self.code, status = self.status.as_u16(), error = %self.message, "Request rejected");
            self.message
        };

        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": message
            })),
        )
            .into_response()
    }
}
