//! Schemaless documents stored as JSONB.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::documents;
use crate::types::DocumentCollection;

/// Stored document.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// Name of the owning collection.
    pub collection: String,
    /// Document contents; always a JSON object.
    pub body: serde_json::Value,
    /// Timestamp when the document was created.
    pub created_at: Timestamp,
    /// Timestamp when the document was last updated.
    pub updated_at: Timestamp,
}

impl Document {
    /// Returns the owning collection, or `None` for unknown values.
    pub fn collection(&self) -> Option<DocumentCollection> {
        self.collection.parse().ok()
    }
}

/// Data for creating a new document.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocument {
    /// Name of the owning collection.
    pub collection: String,
    /// Document contents; must be a JSON object.
    pub body: serde_json::Value,
}

impl NewDocument {
    /// Creates a new document for `collection`.
    pub fn new(collection: DocumentCollection, body: serde_json::Value) -> Self {
        Self {
            collection: collection.as_str().to_owned(),
            body,
        }
    }
}
