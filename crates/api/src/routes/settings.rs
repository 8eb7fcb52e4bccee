//! Cooperative settings routes.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use koperasi_core::settings::CooperativeSettings;

use crate::{ApiResult, AppState};

/// Creates the settings routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(get_settings).put(update_settings))
        .route("/settings/reload", post(reload_settings))
}

/// GET `/settings` - The settings currently in effect.
async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.settings.handle().current().await)
}

/// PUT `/settings` - Validate, store and activate new settings.
async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<CooperativeSettings>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.settings.update(payload).await?))
}

/// POST `/settings/reload` - Re-read the stored settings.
async fn reload_settings(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.settings.reload().await?))
}
