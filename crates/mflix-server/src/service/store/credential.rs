//! Credential records and the store that holds them.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::{Result, TRACING_TARGET_STORE as TRACING_TARGET};

/// Stored credential for one account.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Account id.
    pub id: Uuid,
    /// Unique, case-sensitive username.
    pub username: String,
    /// PHC-format password hash.
    pub password_hash: String,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Backend holding credential records.
///
/// Records are only created and read.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Finds the record with exactly this username.
    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>>;

    /// Inserts a record and returns its id.
    ///
    /// Fails with [`ErrorKind::DuplicateUsername`] if the username is taken.
    ///
    /// [`ErrorKind::DuplicateUsername`]: crate::ErrorKind::DuplicateUsername
    async fn insert(&self, username: &str, password_hash: &str) -> Result<Uuid>;
}

/// Shared handle to a [`CredentialStore`] with logging.
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
}

impl CredentialService {
    /// Wraps a store implementation.
    pub fn from_store<S>(store: S) -> Self
    where
        S: CredentialStore + 'static,
    {
        Self {
            store: Arc::new(store),
        }
    }

    /// Finds the record with exactly this username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>> {
        let result = self.store.find_by_username(username).await;

        if let Err(error) = &result {
            tracing::error!(
                target: TRACING_TARGET,
                error = %error,
                "credential lookup failed"
            );
        }

        result
    }

    /// Inserts a record and returns its id.
    pub async fn insert(&self, username: &str, password_hash: &str) -> Result<Uuid> {
        let result = self.store.insert(username, password_hash).await;

        match &result {
            Ok(account_id) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    account_id = %account_id,
                    "credential record created"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %error.kind(),
                    "credential insert failed"
                );
            }
        }

        result
    }
}

impl fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialService").finish_non_exhaustive()
    }
}
