//! Document types stored by the service.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record the store can persist and key by identifier.
///
/// Implementors carry their identifier inline, the way a document store
/// keeps the key inside the document itself.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Store-assigned identifier, if the document has one yet.
    fn id(&self) -> Option<&str>;

    /// Records the identifier the store assigned.
    fn set_id(&mut self, id: String);
}

/// Primary domain record: a described, priced item.
///
/// An absent `id` on input signals "create new" - the store assigns one on
/// save and it is stable thereafter, unique within the primary collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Option<String>,
    pub description: String,
    pub price: f64,
}

impl Item {
    pub fn new(id: Option<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            description: description.into(),
            price,
        }
    }
}

impl Document for Item {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Record fed into the capped collection by the background producer.
///
/// The label carries the producer's monotonically increasing sequence
/// number, and the value grows with it. Records are inserted once and never
/// updated; the capped collection evicts the oldest on overflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CappedRecord {
    pub id: Option<String>,
    pub label: String,
    pub value: f64,
}

impl CappedRecord {
    /// Synthesizes the record for tick `seq`.
    pub fn synthesize(seq: u64) -> Self {
        Self {
            id: None,
            label: format!("Random Item {seq}"),
            value: 100.0 + seq as f64,
        }
    }

    /// Sequence number parsed back out of the label, if well-formed.
    pub fn sequence(&self) -> Option<u64> {
        self.label.strip_prefix("Random Item ")?.parse().ok()
    }
}

impl Document for CappedRecord {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
