//! Schemaless documents grouped into collections.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
pub use mflix_postgres::types::DocumentCollection;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Result, TRACING_TARGET_STORE as TRACING_TARGET};

/// Top-level fields of a document.
pub type DocumentBody = Map<String, Value>;

/// Stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Unique document identifier.
    pub id: Uuid,
    /// Owning collection.
    pub collection: DocumentCollection,
    /// Document contents.
    pub body: DocumentBody,
    /// When the document was created.
    pub created_at: Timestamp,
    /// When the document was last updated.
    pub updated_at: Timestamp,
}

/// Backend holding documents.
///
/// Every operation is scoped to one collection; an id stored under another
/// collection behaves as missing.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists up to `limit` documents, oldest first.
    async fn list(
        &self,
        collection: DocumentCollection,
        limit: usize,
    ) -> Result<Vec<StoredDocument>>;

    /// Lists documents whose top-level `field` equals `value` as a string.
    async fn list_by_field(
        &self,
        collection: DocumentCollection,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>>;

    /// Finds a document by id.
    async fn find(
        &self,
        collection: DocumentCollection,
        id: Uuid,
    ) -> Result<Option<StoredDocument>>;

    /// Inserts a new document.
    async fn insert(
        &self,
        collection: DocumentCollection,
        body: DocumentBody,
    ) -> Result<StoredDocument>;

    /// Merges the top-level keys of `patch` into the stored body.
    async fn update(
        &self,
        collection: DocumentCollection,
        id: Uuid,
        patch: DocumentBody,
    ) -> Result<Option<StoredDocument>>;

    /// Deletes a document, returning whether it existed.
    async fn delete(&self, collection: DocumentCollection, id: Uuid) -> Result<bool>;

    /// Checks that the backend responds.
    async fn ping(&self) -> Result<()>;
}

/// Shared handle to a [`DocumentStore`] with logging.
#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
}

impl DocumentService {
    /// Wraps a store implementation.
    pub fn from_store<S>(store: S) -> Self
    where
        S: DocumentStore + 'static,
    {
        Self {
            store: Arc::new(store),
        }
    }

    pub async fn list(
        &self,
        collection: DocumentCollection,
        limit: usize,
    ) -> Result<Vec<StoredDocument>> {
        let result = self.store.list(collection, limit).await;
        Self::trace(collection, "list", &result);
        result
    }

    pub async fn list_by_field(
        &self,
        collection: DocumentCollection,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>> {
        let result = self.store.list_by_field(collection, field, value).await;
        Self::trace(collection, "list_by_field", &result);
        result
    }

    pub async fn find(
        &self,
        collection: DocumentCollection,
        id: Uuid,
    ) -> Result<Option<StoredDocument>> {
        let result = self.store.find(collection, id).await;
        Self::trace(collection, "find", &result);
        result
    }

    pub async fn insert(
        &self,
        collection: DocumentCollection,
        body: DocumentBody,
    ) -> Result<StoredDocument> {
        let result = self.store.insert(collection, body).await;
        Self::trace(collection, "insert", &result);
        result
    }

    pub async fn update(
        &self,
        collection: DocumentCollection,
        id: Uuid,
        patch: DocumentBody,
    ) -> Result<Option<StoredDocument>> {
        let result = self.store.update(collection, id, patch).await;
        Self::trace(collection, "update", &result);
        result
    }

    pub async fn delete(&self, collection: DocumentCollection, id: Uuid) -> Result<bool> {
        let result = self.store.delete(collection, id).await;
        Self::trace(collection, "delete", &result);
        result
    }

    /// Returns whether the backend currently responds.
    pub async fn is_healthy(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "document store health check failed"
                );
                false
            }
        }
    }

    fn trace<T>(collection: DocumentCollection, operation: &'static str, result: &Result<T>) {
        match result {
            Ok(_) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    collection = %collection,
                    operation,
                    "document operation completed"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    collection = %collection,
                    operation,
                    error = %error,
                    "document operation failed"
                );
            }
        }
    }
}

impl fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentService").finish_non_exhaustive()
    }
}
