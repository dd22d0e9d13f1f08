//! In-process document collections.
//!
//! Used when no Redis URL is configured and by the integration tests. Every
//! operation takes the lock once, matching the single-command atomicity of
//! the Redis backend and nothing more.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::collections::{Collection, DocumentCollections, DocumentStoreError};

#[derive(Debug, Default)]
struct Inner {
    documents: HashMap<Collection, BTreeMap<String, String>>,
    sequences: HashMap<Collection, i64>,
}

/// Collections held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCollections {
    inner: Mutex<Inner>,
}

impl InMemoryCollections {
    /// Create empty collections.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DocumentStoreError> {
        self.inner
            .lock()
            .map_err(|_| DocumentStoreError::backend("in-memory collections poisoned"))
    }
}

#[async_trait]
impl DocumentCollections for InMemoryCollections {
    async fn get(
        &self,
        collection: Collection,
        key: &str,
    ) -> Result<Option<String>, DocumentStoreError> {
        let inner = self.lock()?;
        Ok(inner
            .documents
            .get(&collection)
            .and_then(|documents| documents.get(key))
            .cloned())
    }

    async fn put(
        &self,
        collection: Collection,
        key: &str,
        value: String,
    ) -> Result<(), DocumentStoreError> {
        let mut inner = self.lock()?;
        inner
            .documents
            .entry(collection)
            .or_default()
            .insert(key.to_owned(), value);
        Ok(())
    }

    async fn insert_new(
        &self,
        collection: Collection,
        key: &str,
        value: String,
    ) -> Result<bool, DocumentStoreError> {
        let mut inner = self.lock()?;
        let documents = inner.documents.entry(collection).or_default();
        if documents.contains_key(key) {
            return Ok(false);
        }
        documents.insert(key.to_owned(), value);
        Ok(true)
    }

    async fn delete(&self, collection: Collection, key: &str) -> Result<bool, DocumentStoreError> {
        let mut inner = self.lock()?;
        Ok(inner
            .documents
            .get_mut(&collection)
            .and_then(|documents| documents.remove(key))
            .is_some())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<String>, DocumentStoreError> {
        let inner = self.lock()?;
        Ok(inner
            .documents
            .get(&collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn clear(&self, collection: Collection) -> Result<(), DocumentStoreError> {
        let mut inner = self.lock()?;
        inner.documents.remove(&collection);
        inner.sequences.remove(&collection);
        Ok(())
    }

    async fn next_sequence(&self, collection: Collection) -> Result<i64, DocumentStoreError> {
        let mut inner = self.lock()?;
        let sequence = inner.sequences.entry(collection).or_insert(0);
        *sequence += 1;
        Ok(*sequence)
    }

    async fn set_sequence(
        &self,
        collection: Collection,
        value: i64,
    ) -> Result<(), DocumentStoreError> {
        self.lock()?.sequences.insert(collection, value);
        Ok(())
    }
}
