//! Report archive repository (read-only; archives are written by the batch).

use koperasi_core::batch::ReportArchive;
use koperasi_shared::types::ArchiveId;

use crate::store::{StoreClient, StoreError, collections};

/// Archive repository.
#[derive(Debug, Clone)]
pub struct ArchiveRepository {
    store: StoreClient,
}

impl ArchiveRepository {
    /// Creates a new archive repository.
    #[must_use]
    pub const fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Lists archives, newest first.
    pub async fn list(&self) -> Result<Vec<ReportArchive>, StoreError> {
        let mut txn = self.store.begin().await?;
        let mut archives: Vec<ReportArchive> = txn.query(collections::ARCHIVES).await?;
        archives.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(archives)
    }

    /// Fetches one archive.
    pub async fn get(&self, id: ArchiveId) -> Result<ReportArchive, StoreError> {
        let mut txn = self.store.begin().await?;
        txn.get(collections::ARCHIVES, &id.to_string())
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("{}/{id}", collections::ARCHIVES)))
    }
}
