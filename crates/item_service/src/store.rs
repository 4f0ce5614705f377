//! Store contract consumed by the service layer.

use crate::document::Document;
use futures_core::Stream;
use std::future::Future;
use thiserror::Error;

/// Error types for document store operations
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// Store cannot be reached or its state is unusable
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The store refused the write
    #[error("write rejected: {0}")]
    Rejected(String),
    /// Document could not be serialized or deserialized
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Collection already provisioned under this name
    #[error("collection already exists: {0}")]
    CollectionExists(String),
}

/// Size caps for a capped collection.
///
/// The document-count cap is the effective eviction trigger for small
/// records; the byte cap backs it up for oversized ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CappedOptions {
    pub max_bytes: usize,
    pub max_docs: usize,
}

/// Options for creating a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionOptions {
    pub capped: Option<CappedOptions>,
}

impl CollectionOptions {
    /// Options for a capped collection with the given size caps.
    pub fn capped(max_bytes: usize, max_docs: usize) -> Self {
        Self {
            capped: Some(CappedOptions {
                max_bytes,
                max_docs,
            }),
        }
    }
}

/// Async key/document store over a single collection.
///
/// Uses native async fn in traits; the explicit `impl Future + Send` return
/// types keep the futures usable on multi-threaded runtimes.
///
/// Every method is a suspension point: the calling flow yields to the
/// scheduler until the store completes. Single-document operations are
/// atomic at the store boundary.
pub trait DocumentStore<T: Document>: Send + Sync {
    /// All documents in store order, delivered as a lazy sequence.
    ///
    /// An empty collection yields an empty sequence, never an error.
    fn find_all(&self) -> impl Stream<Item = Result<T, StoreError>> + Send;

    /// Looks up one document by identifier. A missing id is `Ok(None)`.
    fn find_by_id(&self, id: &str) -> impl Future<Output = Result<Option<T>, StoreError>> + Send;

    /// First document whose string field `field` equals `value`.
    fn find_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<Option<T>, StoreError>> + Send;

    /// Upserts a document, assigning an identifier when absent.
    ///
    /// Returns the stored document including the assigned id.
    fn save(&self, doc: T) -> impl Future<Output = Result<T, StoreError>> + Send;

    /// Removes a document by identifier. Idempotent: a missing id succeeds.
    fn delete_by_id(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes every document in the collection.
    fn delete_all(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
