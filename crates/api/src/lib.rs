//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - A server-sent-events stream of committed store changes
//! - Mapping of domain errors to JSON error responses

pub mod error;
pub mod routes;

use axum::Router;
use koperasi_db::{
    AccountRepository, ArchiveRepository, BatchRepository, ContractRepository, JournalRepository,
    MemberRepository, ReportRepository, SettingsHandle, SettingsRepository, StoreClient,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Store handle, used for the change stream.
    pub store: StoreClient,
    /// Chart of accounts.
    pub accounts: AccountRepository,
    /// General journal.
    pub journal: JournalRepository,
    /// Members and savings.
    pub members: MemberRepository,
    /// Murabahah contracts.
    pub contracts: ContractRepository,
    /// Monthly batch.
    pub batch: BatchRepository,
    /// Batch report archives.
    pub archives: ArchiveRepository,
    /// Read-only reports.
    pub reports: ReportRepository,
    /// Cooperative settings.
    pub settings: SettingsRepository,
}

impl AppState {
    /// Wires every repository over one store and one settings handle.
    #[must_use]
    pub fn new(store: StoreClient, settings: SettingsHandle) -> Self {
        Self {
            accounts: AccountRepository::new(store.clone()),
            journal: JournalRepository::new(store.clone()),
            members: MemberRepository::new(store.clone()),
            contracts: ContractRepository::new(store.clone(), settings.clone()),
            batch: BatchRepository::new(store.clone(), settings.clone()),
            archives: ArchiveRepository::new(store.clone()),
            reports: ReportRepository::new(store.clone(), settings.clone()),
            settings: SettingsRepository::new(store.clone(), settings),
            store,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
