//! Transactional key-document store.
//!
//! Documents are JSON values addressed by a collection path and an id.
//! Sub-collections are plain paths such as `anggota/{id}/transaksi`.
//!
//! A transaction records the version of every document it reads (absent
//! documents read as version 0) and of every collection it queries. Writes
//! are buffered until commit, which fails with [`StoreError::Conflict`] if
//! anything that was read has moved since. Committed changes are published
//! on a broadcast channel in commit order.

mod buffer;
pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use koperasi_shared::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::retry::{Retryable, with_retry};

/// Capacity of the change-event channel. A subscriber lagging further than
/// this is told how many events it missed and must re-read.
pub const EVENT_CAPACITY: usize = 1024;

/// Collection paths.
pub mod collections {
    use std::fmt::Display;

    /// Chart of accounts.
    pub const ACCOUNTS: &str = "chart_of_accounts";
    /// General journal.
    pub const JOURNAL: &str = "jurnal_umum";
    /// Members.
    pub const MEMBERS: &str = "anggota";
    /// Murabahah contracts.
    pub const CONTRACTS: &str = "kontrak_murabahah";
    /// Batch report archives.
    pub const ARCHIVES: &str = "laporan_arsip";
    /// Settings.
    pub const SETTINGS: &str = "pengaturan";
    /// Id of the single settings document.
    pub const SETTINGS_DOC: &str = "umum";
    /// Batch run markers, keyed by period token.
    pub const BATCH_RUNS: &str = "batch_runs";
    /// User role records (not managed here).
    pub const USERS: &str = "users";

    /// Savings history of one member.
    pub fn member_transactions(member_id: impl Display) -> String {
        format!("{MEMBERS}/{member_id}/transaksi")
    }

    /// Payment history of one contract.
    pub fn contract_payments(contract_id: impl Display) -> String {
        format!("{CONTRACTS}/{contract_id}/transaksi")
    }
}

/// Store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Something read by the transaction changed before commit.
    #[error("Transaction conflict on {0}")]
    Conflict(String),

    /// Document not found.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// A document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend failure (connection, SQL, configuration).
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "CONCURRENT_MODIFICATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Backend(_) => "STORE_ERROR",
        }
    }
}

impl Retryable for StoreError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => Self::Conflict(err.to_string()),
            StoreError::NotFound(_) => Self::NotFound(err.to_string()),
            StoreError::Serialization(_) | StoreError::Backend(_) => {
                Self::Database(err.to_string())
            }
        }
    }
}

/// Kind of change carried by a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Document created or replaced.
    Upsert,
    /// Document removed.
    Delete,
}

/// A committed document change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Collection path.
    pub collection: String,
    /// Document id.
    pub id: String,
    /// Document version after the change.
    pub version: i64,
    /// Upsert or delete.
    pub kind: ChangeKind,
    /// New document body (absent for deletes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A document store backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Starts an optimistic transaction.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError>;

    /// Subscribes to committed changes.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// One optimistic transaction.
///
/// Reads see the transaction's own buffered writes.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Reads one document.
    async fn get_raw(&mut self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Reads every document of a collection, ordered by id.
    async fn query_raw(&mut self, collection: &str) -> Result<Vec<(String, Value)>, StoreError>;

    /// Buffers a create or replace.
    fn set_raw(&mut self, collection: &str, id: &str, value: Value);

    /// Buffers a delete.
    fn delete(&mut self, collection: &str, id: &str);

    /// Validates every read and applies the buffered writes atomically.
    async fn commit(self: Box<Self>) -> Result<Vec<ChangeEvent>, StoreError>;
}

impl dyn StoreTransaction + '_ {
    /// Reads and decodes one document.
    pub async fn get<T: DeserializeOwned>(
        &mut self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        match self.get_raw(collection, id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Reads and decodes a whole collection.
    pub async fn query<T: DeserializeOwned>(
        &mut self,
        collection: &str,
    ) -> Result<Vec<T>, StoreError> {
        self.query_raw(collection)
            .await?
            .into_iter()
            .map(|(_, value)| serde_json::from_value(value).map_err(StoreError::from))
            .collect()
    }

    /// Encodes and buffers a document write.
    pub fn set<T: Serialize>(
        &mut self,
        collection: &str,
        id: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.set_raw(collection, id, value);
        Ok(())
    }
}

/// Shared handle to a store plus the client-side retry budget.
#[derive(Clone)]
pub struct StoreClient {
    store: Arc<dyn DocumentStore>,
    max_retries: u32,
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("backend", &self.store.backend_name())
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl StoreClient {
    /// Wraps a backend.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, max_retries: u32) -> Self {
        Self { store, max_retries }
    }

    /// In-memory client, mostly for tests.
    #[must_use]
    pub fn memory(max_retries: u32) -> Self {
        Self::new(Arc::new(MemoryStore::new()), max_retries)
    }

    /// Starts a transaction.
    pub async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        self.store.begin().await
    }

    /// Subscribes to committed changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.store.subscribe()
    }

    /// Backend name.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Configured retry budget.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Runs `attempt` until it succeeds, fails with a non-conflict error,
    /// or the retry budget is spent.
    pub async fn run<T, E, F, Fut>(&self, operation: &'static str, attempt: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + std::fmt::Display,
    {
        with_retry(self.max_retries, operation, attempt).await
    }
}
