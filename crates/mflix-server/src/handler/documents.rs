//! Shared CRUD logic for the document collections.
//!
//! The movie, comment and theater handlers differ only in their collection
//! and in the names used in responses and error messages.

use axum::http::StatusCode;
use uuid::Uuid;

use crate::extract::Json;
use crate::handler::request::DocumentPayload;
use crate::handler::response::{Data, Document, Message, Named};
use crate::handler::{ErrorKind, Result};
use crate::service::{DocumentCollection, DocumentService};

/// Tracing target for document operations.
const TRACING_TARGET: &str = "mflix_server::handler::documents";

/// Number of documents returned by an unfiltered listing.
pub(crate) const LIST_LIMIT: usize = 10;

/// Names under which a collection appears in responses.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entity {
    pub collection: DocumentCollection,
    /// Lowercase singular, as in `"movie"`.
    pub name: &'static str,
    /// Capitalized singular, as in `"Movie"`.
    pub title: &'static str,
}

pub(crate) const MOVIE: Entity = Entity {
    collection: DocumentCollection::Movies,
    name: "movie",
    title: "Movie",
};

pub(crate) const COMMENT: Entity = Entity {
    collection: DocumentCollection::Comments,
    name: "comment",
    title: "Comment",
};

pub(crate) const THEATER: Entity = Entity {
    collection: DocumentCollection::Theaters,
    name: "theater",
    title: "Theater",
};

impl Entity {
    /// Parses a path id, rejecting anything that is not a UUID.
    pub fn parse_id(self, raw: &str) -> Result<Uuid> {
        Uuid::parse_str(raw).map_err(|e| {
            ErrorKind::BadRequest
                .with_message(format!("Invalid {} ID", self.name))
                .with_resource(self.name)
                .with_context(e.to_string())
        })
    }

    fn not_found(self) -> crate::handler::Error<'static> {
        ErrorKind::NotFound
            .with_message(format!("{} not found", self.title))
            .with_resource(self.name)
    }

    pub async fn list(self, documents: &DocumentService) -> Result<Json<Data<Vec<Document>>>> {
        let stored = documents.list(self.collection, LIST_LIMIT).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            collection = %self.collection.as_str(),
            count = stored.len(),
            "documents listed"
        );

        Ok(Json(Data::new(Document::from_stored_many(stored))))
    }

    pub async fn get(
        self,
        documents: &DocumentService,
        raw_id: &str,
    ) -> Result<Json<Data<Named<Document>>>> {
        let id = self.parse_id(raw_id)?;
        let stored = documents
            .find(self.collection, id)
            .await?
            .ok_or_else(|| self.not_found())?;

        Ok(Json(Data::new(Named::new(
            self.name,
            Document::from_stored(stored),
        ))))
    }

    pub async fn create(
        self,
        documents: &DocumentService,
        payload: DocumentPayload,
    ) -> Result<(StatusCode, Json<Data<Document>>)> {
        let stored = documents
            .insert(self.collection, payload.into_body())
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            collection = %self.collection.as_str(),
            document_id = %stored.id,
            "document created"
        );

        Ok((
            StatusCode::CREATED,
            Json(Data::new(Document::from_stored(stored))),
        ))
    }

    pub async fn update(
        self,
        documents: &DocumentService,
        raw_id: &str,
        payload: DocumentPayload,
    ) -> Result<Json<Data<Document>>> {
        let id = self.parse_id(raw_id)?;
        let stored = documents
            .update(self.collection, id, payload.into_body())
            .await?
            .ok_or_else(|| self.not_found())?;

        tracing::info!(
            target: TRACING_TARGET,
            collection = %self.collection.as_str(),
            document_id = %stored.id,
            "document updated"
        );

        Ok(Json(Data::new(Document::from_stored(stored))))
    }

    pub async fn delete(self, documents: &DocumentService, raw_id: &str) -> Result<Json<Message>> {
        let id = self.parse_id(raw_id)?;
        if !documents.delete(self.collection, id).await? {
            return Err(self.not_found());
        }

        tracing::info!(
            target: TRACING_TARGET,
            collection = %self.collection.as_str(),
            document_id = %id,
            "document deleted"
        );

        Ok(Json(Message::new(format!(
            "{} deleted successfully",
            self.title
        ))))
    }
}
