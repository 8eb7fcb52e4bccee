//! Read-only financial reports.
//!
//! Every report is computed from one consistent snapshot of the chart and
//! the journal.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use crate::{ApiResult, AppState};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/balances", get(balances))
        .route("/reports/trial-balance", get(trial_balance))
        .route("/reports/balance-sheet", get(balance_sheet))
        .route("/reports/shu", get(shu))
        .route("/reports/drift", get(drift))
}

/// GET `/reports/balances` - Balances recomputed from the journal.
async fn balances(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.reports.balances().await?))
}

/// GET `/reports/trial-balance`
async fn trial_balance(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.reports.trial_balance().await?))
}

/// GET `/reports/balance-sheet`
async fn balance_sheet(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.reports.balance_sheet().await?))
}

/// GET `/reports/shu` - Surplus and its allocation buckets.
async fn shu(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.reports.shu().await?))
}

/// GET `/reports/drift` - Accounts whose stored balance disagrees with the journal.
async fn drift(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.reports.drift().await?))
}
