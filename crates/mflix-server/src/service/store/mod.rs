//! Credential and document stores.
//!
//! Each backend implements [`CredentialStore`] and [`DocumentStore`]; handlers
//! only see the [`CredentialService`] and [`DocumentService`] wrappers.

mod credential;
mod document;
#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod postgres;

pub use credential::{CredentialRecord, CredentialService, CredentialStore};
pub use document::{
    DocumentBody, DocumentCollection, DocumentService, DocumentStore, StoredDocument,
};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::{MemoryCredentialStore, MemoryDocumentStore};
pub use postgres::PgStore;
