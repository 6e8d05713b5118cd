//! Application state and dependency injection.

mod config;
mod security;
mod store;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::security::{
    Authenticator, IdentityClaim, PasswordHasher, SessionClaims, SessionConfig, SessionKeys,
    SessionToken,
};
#[cfg(any(test, feature = "test-utils"))]
pub use crate::service::store::{MemoryCredentialStore, MemoryDocumentStore};
pub use crate::service::store::{
    CredentialRecord, CredentialService, CredentialStore, DocumentBody, DocumentCollection,
    DocumentService, DocumentStore, PgStore, StoredDocument,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // Stores:
    pub documents: DocumentService,

    // Internal services:
    pub authenticator: Authenticator,
    pub session_keys: SessionKeys,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to Postgres, applies migrations and derives the session keys.
    pub async fn new(service_config: ServiceConfig) -> Result<Self> {
        service_config.validate()?;

        let session_keys = service_config.load_session_keys()?;
        let pg_store = PgStore::new(service_config.connect_postgres().await?);

        Self::from_stores(pg_store.clone(), pg_store, session_keys)
    }

    /// Builds state over arbitrary store implementations.
    pub fn from_stores<C, D>(
        credentials: C,
        documents: D,
        session_keys: SessionKeys,
    ) -> Result<Self>
    where
        C: CredentialStore + 'static,
        D: DocumentStore + 'static,
    {
        let credentials = CredentialService::from_store(credentials);
        let password_hasher = PasswordHasher::new()?;

        Ok(Self {
            authenticator: Authenticator::new(credentials, password_hasher),
            documents: DocumentService::from_store(documents),
            session_keys,
        })
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// Stores:
impl_di!(documents: DocumentService);

// Internal services:
impl_di!(authenticator: Authenticator);
impl_di!(session_keys: SessionKeys);
