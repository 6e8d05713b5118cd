//! In-memory stores for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use jiff::Timestamp;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CredentialRecord, CredentialStore, DocumentBody, DocumentCollection, DocumentStore,
    StoredDocument,
};
use crate::{Error, Result};

/// Credential store backed by a map keyed on username.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    records: Arc<RwLock<HashMap<String, CredentialRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail as if the backend were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::store_unavailable("memory", "store is offline"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>> {
        self.check_available()?;
        Ok(self.records.read().await.get(username).cloned())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Uuid> {
        self.check_available()?;

        let mut records = self.records.write().await;
        if records.contains_key(username) {
            return Err(Error::duplicate_username());
        }

        let record = CredentialRecord {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
        };
        let id = record.id;
        records.insert(record.username.clone(), record);

        Ok(id)
    }
}

/// Document store backed by a map keyed on id.
///
/// Documents keep insertion order through their creation sequence so that
/// listing is stable.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<RwLock<HashMap<Uuid, (u64, StoredDocument)>>>,
    sequence: Arc<AtomicU64>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail as if the backend were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::store_unavailable("memory", "store is offline"));
        }
        Ok(())
    }

    async fn collect<F>(&self, collection: DocumentCollection, filter: F) -> Vec<StoredDocument>
    where
        F: Fn(&StoredDocument) -> bool,
    {
        let documents = self.documents.read().await;
        let mut matching: Vec<_> = documents
            .values()
            .filter(|(_, document)| document.collection == collection && filter(document))
            .collect();
        matching.sort_by_key(|(sequence, _)| *sequence);

        matching
            .into_iter()
            .map(|(_, document)| document.clone())
            .collect()
    }
}

/// Compares a top-level field the way Postgres `->>` renders it as text.
fn field_matches(body: &DocumentBody, field: &str, value: &str) -> bool {
    match body.get(field) {
        Some(Value::String(text)) => text == value,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == value,
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(
        &self,
        collection: DocumentCollection,
        limit: usize,
    ) -> Result<Vec<StoredDocument>> {
        self.check_available()?;

        let mut documents = self.collect(collection, |_| true).await;
        documents.truncate(limit);
        Ok(documents)
    }

    async fn list_by_field(
        &self,
        collection: DocumentCollection,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>> {
        self.check_available()?;

        Ok(self
            .collect(collection, |document| {
                field_matches(&document.body, field, value)
            })
            .await)
    }

    async fn find(
        &self,
        collection: DocumentCollection,
        id: Uuid,
    ) -> Result<Option<StoredDocument>> {
        self.check_available()?;

        let documents = self.documents.read().await;
        Ok(documents
            .get(&id)
            .filter(|(_, document)| document.collection == collection)
            .map(|(_, document)| document.clone()))
    }

    async fn insert(
        &self,
        collection: DocumentCollection,
        body: DocumentBody,
    ) -> Result<StoredDocument> {
        self.check_available()?;

        let now = Timestamp::now();
        let document = StoredDocument {
            id: Uuid::new_v4(),
            collection,
            body,
            created_at: now,
            updated_at: now,
        };

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.documents
            .write()
            .await
            .insert(document.id, (sequence, document.clone()));

        Ok(document)
    }

    async fn update(
        &self,
        collection: DocumentCollection,
        id: Uuid,
        patch: DocumentBody,
    ) -> Result<Option<StoredDocument>> {
        self.check_available()?;

        let mut documents = self.documents.write().await;
        let Some((_, document)) = documents
            .get_mut(&id)
            .filter(|(_, document)| document.collection == collection)
        else {
            return Ok(None);
        };

        document.body.extend(patch);
        document.updated_at = Timestamp::now();
        Ok(Some(document.clone()))
    }

    async fn delete(&self, collection: DocumentCollection, id: Uuid) -> Result<bool> {
        self.check_available()?;

        let mut documents = self.documents.write().await;
        let exists = documents
            .get(&id)
            .is_some_and(|(_, document)| document.collection == collection);
        if exists {
            documents.remove(&id);
        }

        Ok(exists)
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    fn body(value: Value) -> DocumentBody {
        match value {
            Value::Object(map) => map,
            _ => DocumentBody::new(),
        }
    }

    #[tokio::test]
    async fn credential_insert_rejects_duplicates() -> anyhow::Result<()> {
        let store = MemoryCredentialStore::new();
        store.insert("alice", "$argon2id$hash").await?;

        let error = store.insert("alice", "$argon2id$other").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DuplicateUsername);
        let record = store
            .find_by_username("alice")
            .await?
            .ok_or_else(|| anyhow::anyhow!("record missing"))?;
        assert_eq!(record.password_hash, "$argon2id$hash");
        Ok(())
    }

    #[tokio::test]
    async fn credential_lookup_is_case_sensitive() -> anyhow::Result<()> {
        let store = MemoryCredentialStore::new();
        store.insert("alice", "$argon2id$hash").await?;

        assert!(store.find_by_username("alice").await?.is_some());
        assert!(store.find_by_username("Alice").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn documents_list_in_insertion_order() -> anyhow::Result<()> {
        let store = MemoryDocumentStore::new();
        for title in ["first", "second", "third"] {
            store
                .insert(DocumentCollection::Movies, body(json!({ "title": title })))
                .await?;
        }
        store
            .insert(DocumentCollection::Theaters, body(json!({ "theaterId": 1 })))
            .await?;

        let movies = store.list(DocumentCollection::Movies, 2).await?;
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].body["title"], "first");
        assert_eq!(movies[1].body["title"], "second");
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_top_level_keys() -> anyhow::Result<()> {
        let store = MemoryDocumentStore::new();
        let movie = store
            .insert(
                DocumentCollection::Movies,
                body(json!({ "title": "Heat", "year": 1995 })),
            )
            .await?;

        let updated = store
            .update(
                DocumentCollection::Movies,
                movie.id,
                body(json!({ "year": 1996, "rated": "R" })),
            )
            .await?
            .ok_or_else(|| anyhow::anyhow!("movie missing"))?;

        assert_eq!(updated.body["title"], "Heat");
        assert_eq!(updated.body["year"], 1996);
        assert_eq!(updated.body["rated"], "R");
        Ok(())
    }

    #[tokio::test]
    async fn ids_are_scoped_to_collection() -> anyhow::Result<()> {
        let store = MemoryDocumentStore::new();
        let movie = store
            .insert(DocumentCollection::Movies, body(json!({ "title": "Heat" })))
            .await?;

        assert!(store.find(DocumentCollection::Theaters, movie.id).await?.is_none());
        assert!(!store.delete(DocumentCollection::Theaters, movie.id).await?);
        assert!(store.delete(DocumentCollection::Movies, movie.id).await?);
        assert!(store.find(DocumentCollection::Movies, movie.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn list_by_field_compares_as_text() -> anyhow::Result<()> {
        let store = MemoryDocumentStore::new();
        let movie_id = Uuid::new_v4().to_string();
        store
            .insert(
                DocumentCollection::Comments,
                body(json!({ "movie_id": movie_id, "text": "great" })),
            )
            .await?;
        store
            .insert(
                DocumentCollection::Comments,
                body(json!({ "movie_id": Uuid::new_v4().to_string() })),
            )
            .await?;

        let comments = store
            .list_by_field(DocumentCollection::Comments, "movie_id", &movie_id)
            .await?;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].body["text"], "great");
        Ok(())
    }

    #[tokio::test]
    async fn unavailable_store_fails() {
        let store = MemoryDocumentStore::new();
        store.set_unavailable(true);

        let error = store.ping().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::StoreUnavailable);
    }
}
