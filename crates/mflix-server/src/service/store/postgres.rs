//! Postgres-backed credential and document stores.

use mflix_postgres::model::{Document, NewAccount, NewDocument};
use mflix_postgres::query::{AccountRepository, DocumentRepository};
use mflix_postgres::types::{AccountConstraints, ConstraintViolation};
use mflix_postgres::{PgClient, PgError};
use serde_json::Value;
use uuid::Uuid;

use super::{
    CredentialRecord, CredentialStore, DocumentBody, DocumentCollection, DocumentStore,
    StoredDocument,
};
use crate::{Error, Result};

/// Store implementation over a pooled Postgres client.
#[derive(Debug, Clone)]
pub struct PgStore {
    client: PgClient,
}

impl PgStore {
    /// Creates a new store over `client`.
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }
}

fn store_error(error: PgError) -> Error {
    let message = if error.is_transient() {
        "database temporarily unavailable"
    } else {
        "database operation failed"
    };

    Error::store_unavailable("postgres", message).with_source(error)
}

fn into_stored(collection: DocumentCollection, document: Document) -> Result<StoredDocument> {
    let Value::Object(body) = document.body else {
        return Err(Error::internal(
            "postgres",
            "stored document body is not an object",
        ));
    };

    Ok(StoredDocument {
        id: document.id,
        collection,
        body,
        created_at: document.created_at.into(),
        updated_at: document.updated_at.into(),
    })
}

fn into_stored_all(
    collection: DocumentCollection,
    documents: Vec<Document>,
) -> Result<Vec<StoredDocument>> {
    documents
        .into_iter()
        .map(|document| into_stored(collection, document))
        .collect()
}

#[async_trait::async_trait]
impl CredentialStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;
        let account = conn
            .find_account_by_username(username)
            .await
            .map_err(store_error)?;

        Ok(account.map(|account| CredentialRecord {
            id: account.id,
            username: account.username,
            password_hash: account.password_hash,
        }))
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Uuid> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;
        let new_account = NewAccount {
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
        };

        match conn.create_account(new_account).await {
            Ok(account) => Ok(account.id),
            Err(error)
                if error.constraint_violation()
                    == Some(ConstraintViolation::Account(
                        AccountConstraints::UsernameUnique,
                    )) =>
            {
                Err(Error::duplicate_username().with_source(error))
            }
            Err(error) => Err(store_error(error)),
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for PgStore {
    async fn list(
        &self,
        collection: DocumentCollection,
        limit: usize,
    ) -> Result<Vec<StoredDocument>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut conn = self.client.get_connection().await.map_err(store_error)?;
        let documents = conn
            .list_documents(collection, limit)
            .await
            .map_err(store_error)?;

        into_stored_all(collection, documents)
    }

    async fn list_by_field(
        &self,
        collection: DocumentCollection,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;
        let documents = conn
            .list_documents_by_field(collection, field, value)
            .await
            .map_err(store_error)?;

        into_stored_all(collection, documents)
    }

    async fn find(
        &self,
        collection: DocumentCollection,
        id: Uuid,
    ) -> Result<Option<StoredDocument>> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;
        let document = conn
            .find_document(collection, id)
            .await
            .map_err(store_error)?;

        document
            .map(|document| into_stored(collection, document))
            .transpose()
    }

    async fn insert(
        &self,
        collection: DocumentCollection,
        body: DocumentBody,
    ) -> Result<StoredDocument> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;
        let new_document = NewDocument::new(collection, Value::Object(body));
        let document = conn
            .create_document(new_document)
            .await
            .map_err(store_error)?;

        into_stored(collection, document)
    }

    async fn update(
        &self,
        collection: DocumentCollection,
        id: Uuid,
        patch: DocumentBody,
    ) -> Result<Option<StoredDocument>> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;
        let document = conn
            .merge_document(collection, id, Value::Object(patch))
            .await
            .map_err(store_error)?;

        document
            .map(|document| into_stored(collection, document))
            .transpose()
    }

    async fn delete(&self, collection: DocumentCollection, id: Uuid) -> Result<bool> {
        let mut conn = self.client.get_connection().await.map_err(store_error)?;
        conn.delete_document(collection, id)
            .await
            .map_err(store_error)
    }

    async fn ping(&self) -> Result<()> {
        self.client.ping().await.map_err(store_error)
    }
}
