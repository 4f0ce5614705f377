//! Transport-agnostic request handlers.
//!
//! HTTP framing is a collaborator concern: handlers render service outcomes
//! as status/body replies the boundary layer can put on any wire.

use crate::document::Item;
use crate::service::{ItemPatch, ItemService, ServiceError};
use crate::store::{DocumentStore, StoreError};
use futures_core::Stream;
use seqflow::StreamExt;
use serde::Serialize;

/// Reply body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Text(String),
    Empty,
}

/// Status/body pair the boundary layer renders onto the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Body,
}

impl Reply {
    fn json(status: u16, value: &impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => Self {
                status,
                body: Body::Json(json),
            },
            Err(err) => Self::from_error(&ServiceError::Store(StoreError::Serialization(
                err.to_string(),
            ))),
        }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            body: Body::Empty,
        }
    }

    fn empty_ok() -> Self {
        Self {
            status: 200,
            body: Body::Empty,
        }
    }

    /// Maps a service error to a failure reply whose body is exactly the
    /// error's message.
    ///
    /// One explicit switch covers every error kind; no stack traces or
    /// internal state reach the body.
    pub fn from_error(error: &ServiceError) -> Self {
        let status = match error {
            ServiceError::Store(_) | ServiceError::Diagnostic => 500,
        };
        Self {
            status,
            body: Body::Text(error.to_string()),
        }
    }
}

/// Request handlers over the CRUD service.
pub struct ItemHandlers<S> {
    service: ItemService<S>,
}

impl<S: DocumentStore<Item>> ItemHandlers<S> {
    pub fn new(service: ItemService<S>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ItemService<S> {
        &self.service
    }

    /// 200 with the full item array.
    pub async fn list(&self) -> Reply {
        match collect(self.service.list()).await {
            Ok(items) => Reply::json(200, &items),
            Err(err) => Reply::from_error(&err),
        }
    }

    /// 200 with the item, or 404 with an empty body.
    pub async fn get(&self, id: &str) -> Reply {
        match self.service.get(id).await {
            Ok(Some(item)) => Reply::json(200, &item),
            Ok(None) => Reply::not_found(),
            Err(err) => Reply::from_error(&err),
        }
    }

    /// 201 with the created item, including its assigned id.
    pub async fn create(&self, item: Item) -> Reply {
        match self.service.create(item).await {
            Ok(created) => Reply::json(201, &created),
            Err(err) => Reply::from_error(&err),
        }
    }

    /// 200 with the updated item, or 404 when the id is unknown.
    pub async fn update(&self, id: &str, patch: ItemPatch) -> Reply {
        match self.service.update(id, patch).await {
            Ok(Some(updated)) => Reply::json(200, &updated),
            Ok(None) => Reply::not_found(),
            Err(err) => Reply::from_error(&err),
        }
    }

    /// 200 with an empty body whether or not the id existed.
    pub async fn delete(&self, id: &str) -> Reply {
        match self.service.delete(id).await {
            Ok(()) => Reply::empty_ok(),
            Err(err) => Reply::from_error(&err),
        }
    }

    /// Drains the diagnostic sequence.
    ///
    /// The item elements are delivered, then the injected failure arrives
    /// and renders as the failure reply with its fixed message.
    pub async fn diagnostic_failure(&self) -> Reply {
        match collect(self.service.diagnostic_failure()).await {
            Ok(items) => Reply::json(200, &items),
            Err(err) => Reply::from_error(&err),
        }
    }
}

/// Drains a sequence into a vector, stopping at the first error.
async fn collect<St>(seq: St) -> Result<Vec<Item>, ServiceError>
where
    St: Stream<Item = Result<Item, ServiceError>> + Send,
{
    tokio::pin!(seq);
    let mut items = Vec::new();
    while let Some(next) = seq.next().await {
        items.push(next?);
    }
    Ok(items)
}
