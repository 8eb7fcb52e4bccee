//! In-process document store.
//!
//! State lives behind one `RwLock`; commit takes the write lock, so commits
//! are serialized, validation sees a stable view, and change events are
//! published in commit order.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};

use super::buffer::{TxnState, change_event};
use super::{ChangeEvent, DocumentStore, EVENT_CAPACITY, StoreError, StoreTransaction};

#[derive(Debug, Default)]
struct Stored {
    version: i64,
    data: Option<Value>,
}

#[derive(Debug, Default)]
struct CollectionState {
    version: i64,
    docs: BTreeMap<String, Stored>,
}

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<String, CollectionState>,
}

impl Inner {
    fn doc(&self, collection: &str, id: &str) -> (i64, Option<Value>) {
        self.collections
            .get(collection)
            .and_then(|c| c.docs.get(id))
            .map_or((0, None), |d| (d.version, d.data.clone()))
    }

    fn doc_version(&self, collection: &str, id: &str) -> i64 {
        self.collections
            .get(collection)
            .and_then(|c| c.docs.get(id))
            .map_or(0, |d| d.version)
    }

    fn collection_version(&self, collection: &str) -> i64 {
        self.collections.get(collection).map_or(0, |c| c.version)
    }
}

/// Memory-backed [`DocumentStore`]. Cloning shares the same state.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            events,
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        Ok(Box::new(MemoryTransaction {
            inner: Arc::clone(&self.inner),
            events: self.events.clone(),
            state: TxnState::default(),
        }))
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

struct MemoryTransaction {
    inner: Arc<RwLock<Inner>>,
    events: broadcast::Sender<ChangeEvent>,
    state: TxnState,
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn get_raw(&mut self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        if let Some(pending) = self.state.pending(collection, id) {
            return Ok(pending);
        }
        let (version, data) = self.inner.read().await.doc(collection, id);
        self.state.record_read(collection, id, version);
        Ok(data)
    }

    async fn query_raw(&mut self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        let (version, rows) = {
            let inner = self.inner.read().await;
            let rows: Vec<(String, Value)> = inner
                .collections
                .get(collection)
                .map(|c| {
                    c.docs
                        .iter()
                        .filter_map(|(id, d)| d.data.clone().map(|v| (id.clone(), v)))
                        .collect()
                })
                .unwrap_or_default();
            (inner.collection_version(collection), rows)
        };
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
            inner,
            events,
            state,
        } = *self;

        let mut guard = inner.write().await;
        for ((collection, id), version) in &state.reads {
            if guard.doc_version(collection, id) != *version {
                return Err(StoreError::Conflict(format!("{collection}/{id}")));
            }
        }
        for (collection, version) in &state.queried {
            if guard.collection_version(collection) != *version {
                return Err(StoreError::Conflict(collection.clone()));
            }
        }

        let mut committed = Vec::with_capacity(state.writes.len());
        for (key, data) in state.writes {
            let col = guard.collections.entry(key.0.clone()).or_default();
            col.version += 1;
            let stored = col.docs.entry(key.1.clone()).or_default();
            stored.version += 1;
            stored.data.clone_from(&data);
            committed.push(change_event(&key, stored.version, data));
        }

        // Publish under the write lock so events leave in commit order.
        for event in &committed {
            // No subscribers is not an error.
            let _ = events.send(event.clone());
        }
        drop(guard);
        Ok(committed)
    }
}
