//! Read tracking and write buffering shared by the backends.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::Value;

use super::{ChangeEvent, ChangeKind};

/// `(collection, id)`.
pub(crate) type DocKey = (String, String);

/// Per-transaction bookkeeping.
#[derive(Debug, Default)]
pub(crate) struct TxnState {
    /// Version of each document at first read.
    pub reads: HashMap<DocKey, i64>,
    /// Version of each collection at first query.
    pub queried: HashMap<String, i64>,
    /// Buffered writes; `None` is a delete.
    pub writes: BTreeMap<DocKey, Option<Value>>,
}

impl TxnState {
    /// A buffered write for the document, if any. The outer option tells
    /// whether the transaction wrote it at all.
    pub fn pending(&self, collection: &str, id: &str) -> Option<Option<Value>> {
        self.writes
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
    }

    pub fn record_read(&mut self, collection: &str, id: &str, version: i64) {
        self.reads
            .entry((collection.to_string(), id.to_string()))
            .or_insert(version);
    }

    pub fn record_query(&mut self, collection: &str, version: i64) {
        self.queried.entry(collection.to_string()).or_insert(version);
    }

    /// Applies this transaction's buffered writes on top of a query result.
    pub fn overlay(&self, collection: &str, rows: Vec<(String, Value)>) -> Vec<(String, Value)> {
        let mut merged: BTreeMap<String, Value> = rows.into_iter().collect();
        for ((c, id), data) in &self.writes {
            if c != collection {
                continue;
            }
            match data {
                Some(value) => {
                    merged.insert(id.clone(), value.clone());
                }
                None => {
                    merged.remove(id);
                }
            }
        }
        merged.into_iter().collect()
    }

    pub fn set(&mut self, collection: &str, id: &str, value: Value) {
        self.writes
            .insert((collection.to_string(), id.to_string()), Some(value));
    }

    pub fn delete(&mut self, collection: &str, id: &str) {
        self.writes
            .insert((collection.to_string(), id.to_string()), None);
    }

    /// Every collection the transaction touched, sorted. Backends lock in
    /// this order.
    pub fn touched_collections(&self) -> BTreeSet<String> {
        self.reads
            .keys()
            .chain(self.writes.keys())
            .map(|(c, _)| c.clone())
            .chain(self.queried.keys().cloned())
            .collect()
    }
}

/// Builds the event for a committed write.
pub(crate) fn change_event(key: &DocKey, version: i64, data: Option<Value>) -> ChangeEvent {
    ChangeEvent {
        collection: key.0.clone(),
        id: key.1.clone(),
        version,
        kind: if data.is_some() {
            ChangeKind::Upsert
        } else {
            ChangeKind::Delete
        },
        data,
    }
}
