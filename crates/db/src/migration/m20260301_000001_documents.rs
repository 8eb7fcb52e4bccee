//! Document store schema.
//!
//! One row per document (JSONB body, NULL for a tombstone) and one version
//! counter per collection, used for optimistic commit checks.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DOCUMENTS_SQL).await?;
        db.execute_unprepared(COLLECTION_VERSIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS collection_versions CASCADE;")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS documents CASCADE;")
            .await?;
        Ok(())
    }
}

const DOCUMENTS_SQL: &str = r"
-- Documents keyed by collection path and id
CREATE TABLE documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    version BIGINT NOT NULL DEFAULT 1,
    data JSONB,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (collection, id),
    CONSTRAINT chk_version_positive CHECK (version > 0)
);

-- Live documents of a collection (collection queries)
CREATE INDEX idx_documents_live ON documents(collection, id) WHERE data IS NOT NULL;
";

const COLLECTION_VERSIONS_SQL: &str = r"
-- Per-collection change counter, locked FOR UPDATE during commit
CREATE TABLE collection_versions (
    collection TEXT PRIMARY KEY,
    version BIGINT NOT NULL DEFAULT 0
);
";
