//! In-memory reference implementation of the store contract.

use crate::document::Document;
use crate::store::{CollectionOptions, DocumentStore, StoreError};
use futures_core::Stream;
use rand::Rng;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory document store holding named collections of JSON documents.
///
/// Documents are kept in insertion order per collection; updating an
/// existing document keeps its insertion slot. Capped collections evict
/// their oldest document on overflow. Every operation takes the store lock
/// exactly once, so single-document operations are atomic.
///
/// The store is cheap to clone and share: clones refer to the same
/// collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Collection>>>,
}

#[derive(Debug, Default)]
struct Collection {
    options: CollectionOptions,
    docs: Vec<StoredDoc>,
}

#[derive(Debug, Clone)]
struct StoredDoc {
    id: String,
    body: serde_json::Value,
    bytes: usize,
}

impl Collection {
    /// Removes oldest-inserted documents until the collection is back under
    /// its caps. A lone oversized document is never evicted by the byte cap;
    /// `save` rejects those up front.
    fn evict(&mut self) {
        let Some(caps) = self.options.capped else {
            return;
        };
        let mut total: usize = self.docs.iter().map(|doc| doc.bytes).sum();
        while self.docs.len() > caps.max_docs || (self.docs.len() > 1 && total > caps.max_bytes) {
            let evicted = self.docs.remove(0);
            total -= evicted.bytes;
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provisions a collection under `name`.
    ///
    /// Errors with [`StoreError::CollectionExists`] when the name is already
    /// provisioned; drop it first to reconfigure.
    pub async fn create_collection(
        &self,
        name: &str,
        options: CollectionOptions,
    ) -> Result<(), StoreError> {
        let mut collections = self.lock()?;
        if collections.contains_key(name) {
            return Err(StoreError::CollectionExists(name.to_string()));
        }
        collections.insert(
            name.to_string(),
            Collection {
                options,
                docs: Vec::new(),
            },
        );
        Ok(())
    }

    /// Drops a collection and every record in it. Idempotent.
    pub async fn drop_collection(&self, name: &str) -> Result<(), StoreError> {
        self.lock()?.remove(name);
        Ok(())
    }

    /// Typed handle onto a named collection.
    ///
    /// The handle resolves its collection on every operation, so it observes
    /// drops and recreates. Collections without explicit options are created
    /// implicitly on first write.
    pub fn collection<T: Document>(&self, name: &str) -> MemoryCollection<T> {
        MemoryCollection {
            store: self.clone(),
            name: name.to_string(),
            _marker: PhantomData,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Collection>>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

/// Typed handle implementing [`DocumentStore`] over one named collection.
pub struct MemoryCollection<T> {
    store: MemoryStore,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for MemoryCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> MemoryCollection<T> {
    /// Number of documents currently stored.
    pub async fn count(&self) -> Result<usize, StoreError> {
        let collections = self.store.lock()?;
        Ok(collections.get(&self.name).map_or(0, |c| c.docs.len()))
    }
}

impl<T: Document> DocumentStore<T> for MemoryCollection<T> {
    fn find_all(&self) -> impl Stream<Item = Result<T, StoreError>> + Send {
        // Snapshot cursor: resolved under one lock acquisition, delivered
        // lazily in insertion order.
        let snapshot: Vec<Result<T, StoreError>> = match self.store.lock() {
            Ok(collections) => collections
                .get(&self.name)
                .map_or_else(Vec::new, |collection| {
                    collection.docs.iter().map(decode).collect()
                }),
            Err(err) => vec![Err(err)],
        };
        futures_util::stream::iter(snapshot)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, StoreError> {
        let collections = self.store.lock()?;
        let Some(collection) = collections.get(&self.name) else {
            return Ok(None);
        };
        collection
            .docs
            .iter()
            .find(|doc| doc.id == id)
            .map(decode)
            .transpose()
    }

    async fn find_by_field(&self, field: &str, value: &str) -> Result<Option<T>, StoreError> {
        let collections = self.store.lock()?;
        let Some(collection) = collections.get(&self.name) else {
            return Ok(None);
        };
        collection
            .docs
            .iter()
            .find(|doc| doc.body.get(field).and_then(|v| v.as_str()) == Some(value))
            .map(decode)
            .transpose()
    }

    async fn save(&self, mut doc: T) -> Result<T, StoreError> {
        let id = match doc.id() {
            Some(id) => id.to_string(),
            None => {
                let id = object_id();
                doc.set_id(id.clone());
                id
            }
        };
        let body =
            serde_json::to_value(&doc).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let bytes = body.to_string().len();

        let mut collections = self.store.lock()?;
        let collection = collections.entry(self.name.clone()).or_default();

        if let Some(caps) = collection.options.capped {
            if bytes > caps.max_bytes {
                return Err(StoreError::Rejected(format!(
                    "document of {bytes} bytes exceeds the collection's {} byte cap",
                    caps.max_bytes
                )));
            }
        }

        let stored = StoredDoc { id, body, bytes };
        match collection
            .docs
            .iter_mut()
            .find(|existing| existing.id == stored.id)
        {
            Some(existing) => *existing = stored,
            None => collection.docs.push(stored),
        }
        collection.evict();

        Ok(doc)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let mut collections = self.store.lock()?;
        if let Some(collection) = collections.get_mut(&self.name) {
            collection.docs.retain(|doc| doc.id != id);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let mut collections = self.store.lock()?;
        if let Some(collection) = collections.get_mut(&self.name) {
            collection.docs.clear();
        }
        Ok(())
    }
}

fn decode<T: Document>(doc: &StoredDoc) -> Result<T, StoreError> {
    serde_json::from_value(doc.body.clone()).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// 12 random bytes rendered as 24 hex characters, the shape of a document
/// store object id.
fn object_id() -> String {
    let bytes: [u8; 12] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
