//! CRUD composition over the document store.

use crate::document::Item;
use crate::store::{DocumentStore, StoreError};
use futures_core::Stream;
use seqflow::SequenceExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error surfaced by the service layer.
#[derive(Debug, Error, Clone)]
pub enum ServiceError {
    /// Store failure, passed through with its message intact
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Intentionally injected failure used to exercise error propagation
    #[error("RuntimeException Ocurred.")]
    Diagnostic,
}

/// Fields an update is allowed to touch.
///
/// The identifier is deliberately absent: an update never moves a document
/// and never creates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub description: String,
    pub price: f64,
}

/// Stateless CRUD composition layer over a document store.
///
/// Every operation is a single pass over the store: no retries, no partial
/// recovery. Store failures surface unchanged; a missing document is an
/// outcome (`None`), not an error.
#[derive(Debug, Clone)]
pub struct ItemService<S> {
    store: S,
}

impl<S: DocumentStore<Item>> ItemService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All items in store order. An empty store yields an empty sequence.
    pub fn list(&self) -> impl Stream<Item = Result<Item, ServiceError>> + Send + '_ {
        self.store.find_all().err_into::<ServiceError>()
    }

    /// Looks up one item. A missing id is `Ok(None)`.
    pub async fn get(&self, id: &str) -> Result<Option<Item>, ServiceError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// First item with the given description, if any.
    pub async fn get_by_description(
        &self,
        description: &str,
    ) -> Result<Option<Item>, ServiceError> {
        Ok(self.store.find_by_field("description", description).await?)
    }

    /// Stores an item, letting the store assign an id when absent.
    ///
    /// Returns the stored item including its assigned id.
    pub async fn create(&self, item: Item) -> Result<Item, ServiceError> {
        Ok(self.store.save(item).await?)
    }

    /// Overwrites description and price of an existing item.
    ///
    /// The id is untouched. A missing id is `Ok(None)` and performs no
    /// write: an update never falls back to create.
    pub async fn update(&self, id: &str, patch: ItemPatch) -> Result<Option<Item>, ServiceError> {
        let Some(mut current) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        current.description = patch.description;
        current.price = patch.price;
        Ok(Some(self.store.save(current).await?))
    }

    /// Removes an item. Succeeds whether or not the id exists.
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        Ok(self.store.delete_by_id(id).await?)
    }

    /// The full item list followed by exactly one injected failure.
    ///
    /// Exercises the error propagation path end to end. The error is
    /// fabricated, not the result of any failure condition, and carries a
    /// fixed diagnostic message.
    pub fn diagnostic_failure(&self) -> impl Stream<Item = Result<Item, ServiceError>> + Send + '_ {
        self.list().chain_error(ServiceError::Diagnostic)
    }
}
