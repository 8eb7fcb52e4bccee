//! Member and savings routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use koperasi_core::member::{CreateMemberInput, MemberStatus, SavingsPostingInput, UpdateMemberInput};
use koperasi_shared::types::{MemberId, PageRequest};
use serde::Deserialize;
use serde_json::json;

use crate::{ApiResult, AppState};

/// Creates the member routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route(
            "/members/{member_id}",
            get(get_member).put(update_member).delete(delete_member),
        )
        .route(
            "/members/{member_id}/savings",
            get(savings_history).post(post_savings),
        )
}

/// Query parameters for listing members.
#[derive(Debug, Deserialize)]
pub struct ListMembersQuery {
    /// Filter by status.
    pub status: Option<MemberStatus>,
}

/// GET `/members` - List members ordered by member number.
async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<ListMembersQuery>,
) -> ApiResult<impl IntoResponse> {
    let mut members = state.members.list().await?;
    if let Some(status) = query.status {
        members.retain(|m| m.status == status);
    }
    Ok(Json(json!({ "members": members })))
}

/// GET `/members/{member_id}` - Get one member.
async fn get_member(
    State(state): State<AppState>,
    Path(member_id): Path<MemberId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.members.get(member_id).await?))
}

/// POST `/members` - Register a member.
async fn create_member(
    State(state): State<AppState>,
    Json(payload): Json<CreateMemberInput>,
) -> ApiResult<impl IntoResponse> {
    let member = state.members.create(payload).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// PUT `/members/{member_id}` - Update profile or status.
async fn update_member(
    State(state): State<AppState>,
    Path(member_id): Path<MemberId>,
    Json(payload): Json<UpdateMemberInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.members.update(member_id, payload).await?))
}

/// DELETE `/members/{member_id}` - Remove a member with no obligations.
async fn delete_member(
    State(state): State<AppState>,
    Path(member_id): Path<MemberId>,
) -> ApiResult<impl IntoResponse> {
    state.members.delete(member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/members/{member_id}/savings` - Deposit or withdraw savings.
async fn post_savings(
    State(state): State<AppState>,
    Path(member_id): Path<MemberId>,
    Json(payload): Json<SavingsPostingInput>,
) -> ApiResult<impl IntoResponse> {
    let (member, transaction) = state.members.post_savings(member_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "member": member, "transaction": transaction })),
    ))
}

/// GET `/members/{member_id}/savings` - Savings history, oldest first.
async fn savings_history(
    State(state): State<AppState>,
    Path(member_id): Path<MemberId>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let history = state.members.savings_history(member_id).await?;
    Ok(Json(page.apply(history)))
}
