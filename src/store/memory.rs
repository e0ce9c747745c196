use crate::config::ArchiveConfig;
use crate::devlog;
use crate::document::Document;
use crate::errors::ArchiveError;
use crate::keys::{Key, Kind};
use crate::query::compare_docs;
use crate::telemetry;
use parking_lot::RwLock;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use super::{Cursor, DocumentStore, EntityQuery};

/// In-process store with optimistic, version-checked transactions.
pub struct MemoryStore {
    entities: RwLock<BTreeMap<Key, Document>>,
    next_id: AtomicI64,
    txn_retries: u32,
    max_results: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&ArchiveConfig::default())
    }

    #[must_use]
    pub fn with_config(config: &ArchiveConfig) -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            txn_retries: config.transaction_retries,
            max_results: config.max_query_results,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, key: &Key) -> Option<Document> {
        self.entities.read().get(key).cloned()
    }

    fn put(&self, mut doc: Document) -> Result<Key, ArchiveError> {
        let key = doc.key.clone();
        let mut map = self.entities.write();
        doc.metadata.version = map.get(&key).map_or(1, |old| old.metadata.version + 1);
        doc.touch();
        map.insert(key.clone(), doc);
        Ok(key)
    }

    fn put_if_absent(&self, mut doc: Document) -> Result<(Document, bool), ArchiveError> {
        let mut map = self.entities.write();
        if let Some(existing) = map.get(&doc.key) {
            return Ok((existing.clone(), false));
        }
        doc.metadata.version = 1;
        doc.touch();
        map.insert(doc.key.clone(), doc.clone());
        Ok((doc, true))
    }

    fn delete(&self, key: &Key) -> bool {
        self.entities.write().remove(key).is_some()
    }

    fn allocate_id(&self, kind: Kind, parent: Option<&Key>) -> Key {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let key = Key::int(kind, id);
        match parent {
            Some(p) => key.with_parent(p),
            None => key,
        }
    }

    fn run_query(&self, query: &EntityQuery) -> Cursor {
        let start = std::time::Instant::now();
        let mut docs: Vec<Document> = {
            let map = self.entities.read();
            map.values().filter(|d| query.matches(d)).cloned().collect()
        };
        // Without sort specs results come back in key order.
        if !query.order.is_empty() {
            docs.sort_by(|a, b| compare_docs(&a.data, &b.data, &query.order));
        }
        docs.truncate(query.limit.unwrap_or(usize::MAX).min(self.max_results));

        let filter_dbg = query.predicates.iter().map(ToString::to_string).collect::<Vec<_>>().join(" AND ");
        telemetry::log_query(query.kind.as_str(), &filter_dbg, start.elapsed().as_millis(), docs.len());
        devlog::trace("query", json!({"kind": query.kind.as_str(), "result_count": docs.len()}));
        Cursor::new(docs)
    }

    fn transact(
        &self,
        key: &Key,
        apply: &mut dyn FnMut(&mut Document) -> Result<(), ArchiveError>,
    ) -> Result<Document, ArchiveError> {
        let not_found = || ArchiveError::NotFound(format!("No {} found with key: {key}", key.kind));
        let attempts = self.txn_retries + 1;
        for attempt in 1..=attempts {
            let mut working = self.get(key).ok_or_else(not_found)?;
            let base_version = working.metadata.version;
            apply(&mut working)?;

            let mut map = self.entities.write();
            match map.get(key) {
                None => return Err(not_found()),
                Some(current) if current.metadata.version == base_version => {
                    working.metadata.version = base_version + 1;
                    working.touch();
                    map.insert(key.clone(), working.clone());
                    return Ok(working);
                }
                Some(_) => {
                    drop(map);
                    telemetry::note_txn_retry();
                    log::debug!("transaction collision on {key} (attempt {attempt}/{attempts})");
                }
            }
        }
        log::warn!("transaction on {key} gave up after {attempts} attempts");
        Err(ArchiveError::TransactionCollision { key: key.to_string(), attempts })
    }
}
