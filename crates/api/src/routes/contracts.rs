//! Murabahah financing routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use koperasi_core::financing::{ChangeStatusInput, ContractStatus, CreateContractInput, QuoteInput};
use koperasi_shared::types::{ContractId, MemberId};
use serde::Deserialize;
use serde_json::json;

use crate::{ApiResult, AppState};

/// Creates the contract routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contracts/quote", post(quote))
        .route("/contracts", get(list_contracts).post(create_contract))
        .route("/contracts/{contract_id}", get(get_contract))
        .route("/contracts/{contract_id}/status", post(change_status))
        .route("/contracts/{contract_id}/payments", get(list_payments))
}

/// Query parameters for listing contracts.
#[derive(Debug, Deserialize)]
pub struct ListContractsQuery {
    /// Only this member's contracts.
    pub member_id: Option<MemberId>,
    /// Only contracts in this status.
    pub status: Option<ContractStatus>,
}

/// POST `/contracts/quote` - Price a financing request without saving it.
async fn quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.contracts.quote(&payload).await?))
}

/// GET `/contracts` - List contracts.
async fn list_contracts(
    State(state): State<AppState>,
    Query(query): Query<ListContractsQuery>,
) -> ApiResult<impl IntoResponse> {
    let mut contracts = state.contracts.list(query.member_id).await?;
    if let Some(status) = query.status {
        contracts.retain(|c| c.status == status);
    }
    Ok(Json(json!({ "contracts": contracts })))
}

/// GET `/contracts/{contract_id}` - Get one contract.
async fn get_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<ContractId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.contracts.get(contract_id).await?))
}

/// POST `/contracts` - Open a contract in review.
async fn create_contract(
    State(state): State<AppState>,
    Json(payload): Json<CreateContractInput>,
) -> ApiResult<impl IntoResponse> {
    let contract = state.contracts.create(payload).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// POST `/contracts/{contract_id}/status` - Move along the status chain.
async fn change_status(
    State(state): State<AppState>,
    Path(contract_id): Path<ContractId>,
    Json(payload): Json<ChangeStatusInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.contracts.change_status(contract_id, payload).await?))
}

/// GET `/contracts/{contract_id}/payments` - Installments collected so far.
async fn list_payments(
    State(state): State<AppState>,
    Path(contract_id): Path<ContractId>,
) -> ApiResult<impl IntoResponse> {
    let payments = state.contracts.payments(contract_id).await?;
    Ok(Json(json!({ "payments": payments })))
}
