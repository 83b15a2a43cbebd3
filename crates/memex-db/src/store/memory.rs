//! In-memory implementation of DocumentStore
//!
//! Used when no database is configured and by tests. One lock guards the whole map;
//! a batch is staged against an overlay and only applied once every precondition has
//! passed, so a failed batch leaves no trace.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{instrument, warn};

use memex_core::error::DomainError;
use memex_core::mutation::WriteBatch;
use memex_core::traits::{Document, DocumentStore, Query, RepoResult};
use memex_core::value_objects::DocumentKey;

#[derive(Debug, Clone)]
struct Stored {
    data: Value,
    version: u64,
}

/// In-memory implementation of DocumentStore
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<DocumentKey, Stored>>,
    fail_next_commit: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `commit` fail with a store error without applying anything
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    fn matching(&self, query: &Query) -> Vec<Document> {
        let documents = self.documents.read();
        let mut matches: Vec<Document> = documents
            .iter()
            .filter(|(key, stored)| key.collection == query.collection && query.matches(&stored.data))
            .map(|(key, stored)| Document::new(key.clone(), stored.data.clone(), stored.version))
            .collect();

        matches.sort_by(|a, b| {
            query
                .order_by
                .as_ref()
                .map_or(std::cmp::Ordering::Equal, |order| order.compare(&a.data, &b.data))
                .then_with(|| a.key.id.cmp(&b.key.id))
        });
        matches
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: &DocumentKey) -> RepoResult<Option<Document>> {
        Ok(self
            .documents
            .read()
            .get(key)
            .map(|stored| Document::new(key.clone(), stored.data.clone(), stored.version)))
    }

    async fn query(&self, query: &Query) -> RepoResult<Vec<Document>> {
        let matches = self.matching(query).into_iter().skip(query.offset);
        Ok(match query.limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        })
    }

    async fn count(&self, query: &Query) -> RepoResult<u64> {
        let documents = self.documents.read();
        let count = documents
            .iter()
            .filter(|(key, stored)| key.collection == query.collection && query.matches(&stored.data))
            .count();
        Ok(count as u64)
    }

    #[instrument(skip(self, batch), fields(writes = batch.len()))]
    async fn commit(&self, batch: WriteBatch) -> RepoResult<()> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            warn!("Injected commit failure");
            return Err(DomainError::StoreError("injected commit failure".to_string()));
        }

        let mut documents = self.documents.write();
        let mut staged: HashMap<DocumentKey, Option<Stored>> = HashMap::new();

        for write in batch.writes() {
            let current = match staged.get(&write.key) {
                Some(entry) => entry.clone(),
                None => documents.get(&write.key).cloned(),
            };
            write.check(current.as_ref().map(|s| s.version))?;

            let next = write.apply(current.as_ref().map(|s| &s.data)).map(|data| Stored {
                data,
                version: current.as_ref().map_or(1, |s| s.version + 1),
            });
            staged.insert(write.key.clone(), next);
        }

        for (key, entry) in staged {
            match entry {
                Some(stored) => {
                    documents.insert(key, stored);
                }
                None => {
                    documents.remove(&key);
                }
            }
        }

        Ok(())
    }
}
