//! Document repository for the JSONB collections.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{Document, NewDocument};
use crate::types::DocumentCollection;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for schemaless documents.
///
/// Every operation is scoped to a single [`DocumentCollection`]; a document
/// id from another collection behaves as if it did not exist.
pub trait DocumentRepository {
    /// Lists up to `limit` documents, oldest first.
    fn list_documents(
        &mut self,
        collection: DocumentCollection,
        limit: i64,
    ) -> impl Future<Output = PgResult<Vec<Document>>> + Send;

    /// Lists documents whose top-level `field` equals `value` as text.
    fn list_documents_by_field(
        &mut self,
        collection: DocumentCollection,
        field: &str,
        value: &str,
    ) -> impl Future<Output = PgResult<Vec<Document>>> + Send;

    /// Finds a document by id.
    fn find_document(
        &mut self,
        collection: DocumentCollection,
        document_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Document>>> + Send;

    /// Inserts a new document.
    fn create_document(
        &mut self,
        new_document: NewDocument,
    ) -> impl Future<Output = PgResult<Document>> + Send;

    /// Merges the top-level keys of `patch` into the stored body.
    ///
    /// Returns `None` if the document does not exist.
    fn merge_document(
        &mut self,
        collection: DocumentCollection,
        document_id: Uuid,
        patch: serde_json::Value,
    ) -> impl Future<Output = PgResult<Option<Document>>> + Send;

    /// Deletes a document, returning whether a row was removed.
    fn delete_document(
        &mut self,
        collection: DocumentCollection,
        document_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;
}

impl DocumentRepository for PgConnection {
    async fn list_documents(
        &mut self,
        collection: DocumentCollection,
        limit: i64,
    ) -> PgResult<Vec<Document>> {
        use schema::documents::{self, dsl};

        documents::table
            .filter(dsl::collection.eq(collection.as_str()))
            .order((dsl::created_at.asc(), dsl::id.asc()))
            .limit(limit)
            .select(Document::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_documents_by_field(
        &mut self,
        collection: DocumentCollection,
        field: &str,
        value: &str,
    ) -> PgResult<Vec<Document>> {
        use schema::documents::{self, dsl};

        let field = field.to_owned();
        let value = value.to_owned();

        documents::table
            .filter(dsl::collection.eq(collection.as_str()))
            .filter(PgAnyJsonExpressionMethods::retrieve_as_text(dsl::body, field).eq(value))
            .order((dsl::created_at.asc(), dsl::id.asc()))
            .select(Document::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_document(
        &mut self,
        collection: DocumentCollection,
        document_id: Uuid,
    ) -> PgResult<Option<Document>> {
        use schema::documents::{self, dsl};

        documents::table
            .filter(dsl::id.eq(document_id))
            .filter(dsl::collection.eq(collection.as_str()))
            .select(Document::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn create_document(&mut self, new_document: NewDocument) -> PgResult<Document> {
        use schema::documents;

        let document = diesel::insert_into(documents::table)
            .values(&new_document)
            .returning(Document::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            document_id = %document.id,
            collection = %document.collection,
            "Document created"
        );

        Ok(document)
    }

    async fn merge_document(
        &mut self,
        collection: DocumentCollection,
        document_id: Uuid,
        patch: serde_json::Value,
    ) -> PgResult<Option<Document>> {
        use schema::documents::{self, dsl};

        let target = documents::table
            .filter(dsl::id.eq(document_id))
            .filter(dsl::collection.eq(collection.as_str()));

        diesel::update(target)
            .set((
                dsl::body.eq(PgJsonbExpressionMethods::concat(dsl::body, patch)),
                dsl::updated_at.eq(jiff_diesel::Timestamp::from(Timestamp::now())),
            ))
            .returning(Document::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn delete_document(
        &mut self,
        collection: DocumentCollection,
        document_id: Uuid,
    ) -> PgResult<bool> {
        use schema::documents::{self, dsl};

        let target = documents::table
            .filter(dsl::id.eq(document_id))
            .filter(dsl::collection.eq(collection.as_str()));

        let deleted = diesel::delete(target)
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }
}
