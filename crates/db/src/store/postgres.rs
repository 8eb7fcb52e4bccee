//! PostgreSQL document store.
//!
//! Schema (see the `documents` migration):
//! - `documents(collection, id, version, data JSONB NULL)`; a NULL body is a
//!   tombstone so versions never restart.
//! - `collection_versions(collection, version)`, bumped on every write.
//!
//! Reads run outside any database transaction and only record versions.
//! Commit opens a transaction, locks the `collection_versions` row of every
//! touched collection in name order, re-checks the recorded versions and
//! writes. Commits from this process hold a publish lock from `BEGIN` until
//! their events are sent, so subscribers see events in commit order.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbBackend,
    Statement, TransactionTrait,
};
use serde_json::Value;
use tokio::sync::{Mutex, broadcast};
use tracing::debug;

use super::buffer::{TxnState, change_event};
use super::{ChangeEvent, DocumentStore, EVENT_CAPACITY, StoreError, StoreTransaction};

fn stmt(sql: &str, values: Vec<sea_orm::Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

fn json_value(data: Option<Value>) -> sea_orm::Value {
    sea_orm::Value::Json(data.map(Box::new))
}

/// PostgreSQL-backed [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct PostgresStore {
    db: DatabaseConnection,
    events: broadcast::Sender<ChangeEvent>,
    publish: Arc<Mutex<()>>,
}

impl PostgresStore {
    /// Wraps an existing connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            db,
            events,
            publish: Arc::new(Mutex::new(())),
        }
    }

    /// Connects with a pooled connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let mut options = ConnectOptions::new(url.to_string());
        options.max_connections(max_connections).sqlx_logging(false);
        let db = Database::connect(options).await?;
        Ok(Self::new(db))
    }

    /// Underlying connection (used by the migrator).
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        Ok(Box::new(PostgresTransaction {
            db: self.db.clone(),
            events: self.events.clone(),
            publish: Arc::clone(&self.publish),
            state: TxnState::default(),
        }))
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

struct PostgresTransaction {
    db: DatabaseConnection,
    events: broadcast::Sender<ChangeEvent>,
    publish: Arc<Mutex<()>>,
    state: TxnState,
}

async fn collection_version<C: ConnectionTrait>(
    conn: &C,
    collection: &str,
    lock: bool,
) -> Result<i64, StoreError> {
    let sql = if lock {
        "SELECT version FROM collection_versions WHERE collection = $1 FOR UPDATE"
    } else {
        "SELECT version FROM collection_versions WHERE collection = $1"
    };
    let row = conn.query_one(stmt(sql, vec![collection.into()])).await?;
    match row {
        Some(row) => Ok(row.try_get::<i64>("", "version")?),
        None => Ok(0),
    }
}

async fn document_version<C: ConnectionTrait>(
    conn: &C,
    collection: &str,
    id: &str,
) -> Result<i64, StoreError> {
    let row = conn
        .query_one(stmt(
            "SELECT version FROM documents WHERE collection = $1 AND id = $2",
            vec![collection.into(), id.into()],
        ))
        .await?;
    match row {
        Some(row) => Ok(row.try_get::<i64>("", "version")?),
        None => Ok(0),
    }
}

impl PostgresTransaction {
    async fn validate_and_write(
        txn: &DatabaseTransaction,
        state: TxnState,
    ) -> Result<Vec<ChangeEvent>, StoreError> {
        for collection in state.touched_collections() {
            txn.execute(stmt(
                "INSERT INTO collection_versions (collection, version) VALUES ($1, 0) \
                 ON CONFLICT (collection) DO NOTHING",
                vec![collection.as_str().into()],
            ))
            .await?;
            let current = collection_version(txn, &collection, true).await?;
            if let Some(seen) = state.queried.get(&collection) {
                if *seen != current {
                    return Err(StoreError::Conflict(collection));
                }
            }
        }

        for ((collection, id), seen) in &state.reads {
            if document_version(txn, collection, id).await? != *seen {
                return Err(StoreError::Conflict(format!("{collection}/{id}")));
            }
        }

        let mut committed = Vec::with_capacity(state.writes.len());
        for (key, data) in state.writes {
            let row = txn
                .query_one(stmt(
                    "INSERT INTO documents (collection, id, version, data, updated_at) \
                     VALUES ($1, $2, 1, $3, now()) \
                     ON CONFLICT (collection, id) DO UPDATE \
                     SET version = documents.version + 1, data = EXCLUDED.data, updated_at = now() \
                     RETURNING version",
                    vec![
                        key.0.as_str().into(),
                        key.1.as_str().into(),
                        json_value(data.clone()),
                    ],
                ))
                .await?
                .ok_or_else(|| StoreError::Backend("upsert returned no row".to_string()))?;
            let version = row.try_get::<i64>("", "version")?;

            txn.execute(stmt(
                "UPDATE collection_versions SET version = version + 1 WHERE collection = $1",
                vec![key.0.as_str().into()],
            ))
            .await?;
            committed.push(change_event(&key, version, data));
        }
        Ok(committed)
    }
}

#[async_trait]
impl StoreTransaction for PostgresTransaction {
    async fn get_raw(&mut self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        if let Some(pending) = self.state.pending(collection, id) {
            return Ok(pending);
        }
        let row = self
            .db
            .query_one(stmt(
                "SELECT version, data FROM documents WHERE collection = $1 AND id = $2",
                vec![collection.into(), id.into()],
            ))
            .await?;
        let (version, data) = match row {
            Some(row) => (
                row.try_get::<i64>("", "version")?,
                row.try_get::<Option<Value>>("", "data")?,
            ),
            None => (0, None),
        };
        self.state.record_read(collection, id, version);
        Ok(data)
    }

    async fn query_raw(&mut self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        // Version first: a write landing between the two reads is caught at
        // commit.
        let version = collection_version(&self.db, collection, false).await?;
        let rows = self
            .db
            .query_all(stmt(
                "SELECT id, data FROM documents \
                 WHERE collection = $1 AND data IS NOT NULL ORDER BY id",
                vec![collection.into()],
            ))
            .await?;
        let rows = rows
            .into_iter()
            .map(|row| Ok((row.try_get::<String>("", "id")?, row.try_get::<Value>("", "data")?)))
            .collect::<Result<Vec<_>, StoreError>>()?;
        self.state.record_query(collection, version);
        Ok(self.state.overlay(collection, rows))
    }

    fn set_raw(&mut self, collection: &str, id: &str, value: Value) {
        self.state.set(collection, id, value);
    }

    fn delete(&mut self, collection: &str, id: &str) {
        self.state.delete(collection, id);
    }

    async fn commit(self: Box<Self>) -> Result<Vec<ChangeEvent>, StoreError> {
        let Self {
            db,
            events,
            publish,
            state,
        } = *self;

        let _publish = publish.lock().await;
        let txn = db.begin().await?;
        match Self::validate_and_write(&txn, state).await {
            Ok(committed) => {
                txn.commit().await?;
                debug!(writes = committed.len(), "Committed store transaction");
                for event in &committed {
                    let _ = events.send(event.clone());
                }
                Ok(committed)
            }
            Err(err) => {
                txn.rollback().await?;
                Err(err)
            }
        }
    }
}
