//! Storage layer for Koperasi.
//!
//! This crate provides:
//! - A transactional key-document store with memory and PostgreSQL backends
//! - Retry of conflicting transactions
//! - Repositories that apply `koperasi-core` plans atomically
//! - Database migrations
//! - Default chart of accounts and settings

pub mod error;
pub mod migration;
pub mod repositories;
pub mod retry;
pub mod seed;
pub mod store;

use std::sync::Arc;

use koperasi_shared::{StoreBackend, StoreConfig};
use tracing::info;

pub use repositories::{
    AccountRepository, ArchiveRepository, BatchRepository, ContractRepository, JournalRepository,
    MemberRepository, ReportRepository, SettingsHandle, SettingsRepoError, SettingsRepository,
};
pub use retry::{Retryable, with_retry};
pub use store::{
    ChangeEvent, ChangeKind, DocumentStore, MemoryStore, PostgresStore, StoreClient, StoreError,
    StoreTransaction, collections,
};

/// Opens the configured store backend.
///
/// # Errors
///
/// Returns an error if the PostgreSQL backend is selected without a URL or
/// the connection cannot be established.
pub async fn connect(config: &StoreConfig) -> Result<StoreClient, StoreError> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Postgres => {
            let url = config.url.as_deref().ok_or_else(|| {
                StoreError::Backend("store.url is required for the postgres backend".to_string())
            })?;
            Arc::new(PostgresStore::connect(url, config.max_connections).await?)
        }
    };
    info!(backend = store.backend_name(), max_retries = config.max_retries, "Store ready");
    Ok(StoreClient::new(store, config.max_retries))
}
