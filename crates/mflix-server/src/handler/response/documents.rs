use jiff::Timestamp;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::service::{DocumentBody, StoredDocument};

/// Document as returned to clients.
///
/// Body fields sit next to the id and timestamps.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    #[serde(flatten)]
    pub body: DocumentBody,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Document {
    pub fn from_stored(document: StoredDocument) -> Self {
        Self {
            id: document.id,
            body: document.body,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }

    pub fn from_stored_many(documents: Vec<StoredDocument>) -> Vec<Self> {
        documents.into_iter().map(Self::from_stored).collect()
    }
}

/// Wraps a payload in `{"data": ...}`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    #[inline]
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Single value keyed by its entity name, as in `{"movie": {...}}`.
#[must_use]
#[derive(Debug, Clone)]
pub struct Named<T> {
    name: &'static str,
    value: T,
}

impl<T> Named<T> {
    #[inline]
    pub fn new(name: &'static str, value: T) -> Self {
        Self { name, value }
    }
}

impl<T: Serialize> Serialize for Named<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.name, &self.value)?;
        map.end()
    }
}

/// Plain confirmation message.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
