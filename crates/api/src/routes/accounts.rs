//! Chart of accounts routes.

use std::collections::HashSet;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use koperasi_core::coa::{Account, AccountTree, CreateAccountInput, UpdateAccountInput};
use koperasi_shared::types::AccountId;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{ApiResult, AppState};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{account_id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/{account_id}/rename", post(rename_account))
        .route("/accounts/tree", get(account_tree))
}

/// Request body for renaming an account code.
#[derive(Debug, Deserialize)]
pub struct RenameAccountRequest {
    /// The new code.
    pub code: String,
}

/// One node of the account hierarchy.
#[derive(Debug, Serialize)]
pub struct AccountNode {
    /// The account itself.
    #[serde(flatten)]
    pub account: Account,
    /// Direct children, ordered by code.
    pub children: Vec<AccountNode>,
}

fn build_node<'a>(
    tree: &AccountTree<'a>,
    account: &'a Account,
    visited: &mut HashSet<&'a str>,
) -> AccountNode {
    visited.insert(account.code.as_str());
    let mut children = Vec::new();
    for &child in tree.children(&account.code) {
        // Parent links can loop; each code is rendered once.
        if !visited.contains(child.code.as_str()) {
            children.push(build_node(tree, child, visited));
        }
    }
    AccountNode {
        account: account.clone(),
        children,
    }
}

/// GET `/accounts` - List the chart ordered by code.
async fn list_accounts(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let accounts = state.accounts.list().await?;
    Ok(Json(json!({ "accounts": accounts })))
}

/// GET `/accounts/tree` - The chart as a nested hierarchy.
async fn account_tree(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let accounts = state.accounts.list().await?;
    let tree = AccountTree::new(&accounts);
    let mut visited = HashSet::new();
    let roots: Vec<AccountNode> = tree
        .roots()
        .into_iter()
        .map(|root| build_node(&tree, root, &mut visited))
        .collect();
    Ok(Json(json!({ "accounts": roots })))
}

/// GET `/accounts/{account_id}` - Get one account.
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.accounts.get(account_id).await?))
}

/// POST `/accounts` - Create an account with a zero balance.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountInput>,
) -> ApiResult<impl IntoResponse> {
    let account = state.accounts.create(payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// PUT `/accounts/{account_id}` - Update name, type or parent.
async fn update_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
    Json(payload): Json<UpdateAccountInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.accounts.update(account_id, payload).await?))
}

/// POST `/accounts/{account_id}/rename` - Change the code, cascading to children.
async fn rename_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
    Json(payload): Json<RenameAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.accounts.rename(account_id, &payload.code).await?))
}

/// DELETE `/accounts/{account_id}` - Delete an unreferenced leaf account.
async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> ApiResult<impl IntoResponse> {
    state.accounts.delete(account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
