//! General journal routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use koperasi_core::ledger::{EntrySource, PostJournalInput};
use koperasi_shared::types::{JournalEntryId, PageRequest};
use serde::Deserialize;

use crate::{ApiResult, AppState};

/// Creates the journal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal", get(list_entries).post(post_entry))
        .route(
            "/journal/{entry_id}",
            get(get_entry).put(edit_entry).delete(delete_entry),
        )
}

/// Query parameters for listing entries.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    /// Only entries from this source.
    pub source: Option<EntrySource>,
    /// Page number (1-indexed, default: 1).
    pub page: Option<u32>,
    /// Entries per page (default: 20, max: 100).
    pub per_page: Option<u32>,
}

impl ListEntriesQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// GET `/journal` - List entries, newest first.
async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListEntriesQuery>,
) -> ApiResult<impl IntoResponse> {
    let mut entries = state.journal.list().await?;
    if let Some(source) = query.source {
        entries.retain(|e| e.source == source);
    }
    Ok(Json(query.page_request().apply(entries)))
}

/// GET `/journal/{entry_id}` - Get one entry.
async fn get_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<JournalEntryId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.journal.get(entry_id).await?))
}

/// POST `/journal` - Post a balanced manual entry.
async fn post_entry(
    State(state): State<AppState>,
    Json(payload): Json<PostJournalInput>,
) -> ApiResult<impl IntoResponse> {
    let entry = state.journal.post(payload, None).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT `/journal/{entry_id}` - Replace the lines of a manual entry.
async fn edit_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<JournalEntryId>,
    Json(payload): Json<PostJournalInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.journal.post(payload, Some(entry_id)).await?))
}

/// DELETE `/journal/{entry_id}` - Delete a manual entry, reversing its lines.
async fn delete_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<JournalEntryId>,
) -> ApiResult<impl IntoResponse> {
    state.journal.delete(entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
