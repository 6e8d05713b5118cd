//! Username and password checks against the credential store.

use uuid::Uuid;

use crate::service::security::{IdentityClaim, PasswordHasher};
use crate::service::store::CredentialService;
use crate::{Error, Result, TRACING_TARGET_AUTHENTICATION as TRACING_TARGET};

/// Verifies credentials and registers new accounts.
///
/// Hashing runs on the blocking pool so a burst of logins does not stall the
/// async workers.
#[derive(Debug, Clone)]
pub struct Authenticator {
    credentials: CredentialService,
    password_hasher: PasswordHasher,
}

impl Authenticator {
    /// Creates a new [`Authenticator`].
    pub fn new(credentials: CredentialService, password_hasher: PasswordHasher) -> Self {
        Self {
            credentials,
            password_hasher,
        }
    }

    /// Checks a username and password pair.
    ///
    /// Fails with [`ErrorKind::InvalidCredentialsFormat`] if either input is
    /// empty, and with [`ErrorKind::AuthenticationFailed`] if the account is
    /// missing or the password does not match. Both failure paths perform a
    /// full password verification.
    ///
    /// [`ErrorKind::InvalidCredentialsFormat`]: crate::ErrorKind::InvalidCredentialsFormat
    /// [`ErrorKind::AuthenticationFailed`]: crate::ErrorKind::AuthenticationFailed
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<IdentityClaim> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::invalid_credentials_format());
        }

        let record = self.credentials.find_by_username(username).await?;

        let hasher = self.password_hasher.clone();
        let password = password.to_owned();
        let stored_hash = record.as_ref().map(|record| record.password_hash.clone());
        let password_valid = tokio::task::spawn_blocking(move || match stored_hash {
            Some(stored_hash) => hasher.verify_password(&password, &stored_hash),
            None => hasher.verify_dummy_password(&password),
        })
        .await
        .map_err(|e| Error::internal("authenticator", "verification task failed").with_source(e))?;

        match record {
            Some(record) if password_valid => {
                tracing::info!(
                    target: TRACING_TARGET,
                    account_id = %record.id,
                    "login succeeded"
                );
                Ok(IdentityClaim::new(record.id, record.username))
            }
            record => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    account_exists = record.is_some(),
                    "login failed"
                );
                Err(Error::authentication_failed())
            }
        }
    }

    /// Hashes the password and stores a new credential record.
    ///
    /// Fails with [`ErrorKind::InvalidCredentialsFormat`] if either input is
    /// empty and [`ErrorKind::DuplicateUsername`] if the username is taken.
    ///
    /// [`ErrorKind::InvalidCredentialsFormat`]: crate::ErrorKind::InvalidCredentialsFormat
    /// [`ErrorKind::DuplicateUsername`]: crate::ErrorKind::DuplicateUsername
    pub async fn register(&self, username: &str, password: &str) -> Result<Uuid> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::invalid_credentials_format());
        }

        let hasher = self.password_hasher.clone();
        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| Error::internal("authenticator", "hashing task failed").with_source(e))??;

        let account_id = self.credentials.insert(username, &password_hash).await?;

        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account_id,
            "account registered"
        );

        Ok(account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::service::store::{CredentialStore, MemoryCredentialStore};

    fn authenticator(store: MemoryCredentialStore) -> anyhow::Result<Authenticator> {
        Ok(Authenticator::new(
            CredentialService::from_store(store),
            PasswordHasher::new()?,
        ))
    }

    #[tokio::test]
    async fn register_then_authenticate() -> anyhow::Result<()> {
        let authenticator = authenticator(MemoryCredentialStore::new())?;

        let account_id = authenticator.register("alice", "secret123").await?;
        let claim = authenticator.authenticate("alice", "secret123").await?;

        assert_eq!(claim.id, account_id);
        assert_eq!(claim.display_name, "alice");
        Ok(())
    }

    #[tokio::test]
    async fn stored_hash_is_not_plaintext() -> anyhow::Result<()> {
        let store = MemoryCredentialStore::new();
        let authenticator = authenticator(store.clone())?;
        authenticator.register("alice", "secret123").await?;

        let record = store
            .find_by_username("alice")
            .await?
            .ok_or_else(|| anyhow::anyhow!("record missing"))?;
        assert_ne!(record.password_hash, "secret123");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_fail_identically() -> anyhow::Result<()> {
        let authenticator = authenticator(MemoryCredentialStore::new())?;
        authenticator.register("alice", "secret123").await?;

        let wrong_password = authenticator.authenticate("alice", "wrong").await.unwrap_err();
        let unknown_user = authenticator.authenticate("bob", "secret123").await.unwrap_err();

        assert_eq!(wrong_password.kind(), ErrorKind::AuthenticationFailed);
        assert_eq!(unknown_user.kind(), ErrorKind::AuthenticationFailed);
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        Ok(())
    }

    #[tokio::test]
    async fn only_unknown_user_runs_dummy_verification() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let authenticator = Authenticator::new(
            CredentialService::from_store(MemoryCredentialStore::new()),
            hasher.clone(),
        );
        authenticator.register("alice", "secret123").await?;

        authenticator.authenticate("alice", "wrong").await.unwrap_err();
        authenticator.authenticate("alice", "secret123").await?;
        assert_eq!(hasher.dummy_verifications(), 0);

        authenticator.authenticate("bob", "secret123").await.unwrap_err();
        assert_eq!(hasher.dummy_verifications(), 1);

        authenticator.authenticate("", "secret123").await.unwrap_err();
        assert_eq!(hasher.dummy_verifications(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn username_is_case_sensitive() -> anyhow::Result<()> {
        let authenticator = authenticator(MemoryCredentialStore::new())?;
        authenticator.register("alice", "secret123").await?;

        let error = authenticator.authenticate("Alice", "secret123").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::AuthenticationFailed);
        Ok(())
    }

    #[tokio::test]
    async fn empty_inputs_are_rejected() -> anyhow::Result<()> {
        let authenticator = authenticator(MemoryCredentialStore::new())?;

        for (username, password) in [("", "secret123"), ("alice", ""), ("", "")] {
            let error = authenticator.authenticate(username, password).await.unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidCredentialsFormat);

            let error = authenticator.register(username, password).await.unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidCredentialsFormat);
        }
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_registration_fails() -> anyhow::Result<()> {
        let authenticator = authenticator(MemoryCredentialStore::new())?;
        authenticator.register("alice", "secret123").await?;

        let error = authenticator.register("alice", "other456").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DuplicateUsername);
        Ok(())
    }

    #[tokio::test]
    async fn store_outage_is_reported() -> anyhow::Result<()> {
        let store = MemoryCredentialStore::new();
        let authenticator = authenticator(store.clone())?;
        store.set_unavailable(true);

        let error = authenticator.authenticate("alice", "secret123").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::StoreUnavailable);
        Ok(())
    }
}
