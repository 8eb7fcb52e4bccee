//! Monthly batch routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use koperasi_shared::AppError;
use serde::Deserialize;
use serde_json::json;

use crate::{ApiError, ApiResult, AppState};

/// Creates the batch routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/batch/runs", get(list_runs).post(run_batch))
        .route("/batch/runs/{period}", get(get_run))
}

/// Request body for a batch run.
#[derive(Debug, Default, Deserialize)]
pub struct RunBatchRequest {
    /// Any date in the month to process. Defaults to today (UTC).
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// POST `/batch/runs` - Run the monthly payroll deduction.
async fn run_batch(
    State(state): State<AppState>,
    payload: Option<Json<RunBatchRequest>>,
) -> ApiResult<impl IntoResponse> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let as_of = request.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let run = state.batch.run(as_of).await?;
    Ok((StatusCode::CREATED, Json(run)))
}

/// GET `/batch/runs` - Past runs, newest period first.
async fn list_runs(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let runs = state.batch.list_runs().await?;
    Ok(Json(json!({ "runs": runs })))
}

/// GET `/batch/runs/{period}` - The run for a "YYYY-MM" period.
async fn get_run(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state
        .batch
        .get_run(&period)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::from(AppError::NotFound(format!("No batch run for period {period}"))))
}
