//! Batch report archive routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use koperasi_shared::types::ArchiveId;
use serde_json::json;

use crate::{ApiResult, AppState};

/// Creates the archive routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/archives", get(list_archives))
        .route("/archives/{archive_id}", get(get_archive))
}

/// GET `/archives` - Archived batch reports, newest first.
async fn list_archives(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let archives = state.archives.list().await?;
    Ok(Json(json!({ "archives": archives })))
}

/// GET `/archives/{archive_id}` - One archived report.
async fn get_archive(
    State(state): State<AppState>,
    Path(archive_id): Path<ArchiveId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.archives.get(archive_id).await?))
}
