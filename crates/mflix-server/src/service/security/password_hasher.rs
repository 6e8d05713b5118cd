//! Salted password hashing and verification using Argon2id.

use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::rngs::OsRng;

use crate::{Error, Result, TRACING_TARGET_AUTHENTICATION as TRACING_TARGET};

/// Plaintext behind the precomputed dummy hash. Never a valid account password
/// because nothing ever stores its hash.
const DUMMY_PASSWORD: &str = "mflix-dummy-password";

/// Argon2id password hashing service.
///
/// Every hash gets a fresh random salt. Verification reads the salt and
/// parameters back out of the PHC string and compares in constant time.
#[derive(Clone)]
pub struct PasswordHasher {
    inner: Arc<PasswordHasherInner>,
}

struct PasswordHasherInner {
    argon2: Argon2<'static>,
    dummy_hash: String,
    #[cfg(test)]
    dummy_verifications: AtomicUsize,
}

impl PasswordHasher {
    /// Creates a new [`PasswordHasher`] with the default Argon2id parameters.
    ///
    /// Computes one dummy hash up front so that verifying against an unknown
    /// account costs the same as verifying against a real one.
    pub fn new() -> Result<Self> {
        let argon2 = Argon2::default();
        let dummy_hash = Self::hash_with(&argon2, DUMMY_PASSWORD)?;

        let inner = PasswordHasherInner {
            argon2,
            dummy_hash,
            #[cfg(test)]
            dummy_verifications: AtomicUsize::new(0),
        };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Hashes a password into a PHC string suitable for storage.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidInput`] for an empty password and
    /// [`ErrorKind::Internal`] if the hashing operation itself fails.
    ///
    /// [`ErrorKind::InvalidInput`]: crate::ErrorKind::InvalidInput
    /// [`ErrorKind::Internal`]: crate::ErrorKind::Internal
    pub fn hash_password(&self, password: &str) -> Result<String> {
        if password.is_empty() {
            return Err(Error::invalid_input("Password must not be empty"));
        }

        Self::hash_with(&self.inner.argon2, password)
    }

    /// Verifies a password against a stored hash.
    ///
    /// Returns `false` on mismatch. A stored hash that cannot be parsed also
    /// yields `false` and is logged, since it points at corrupted data.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(parsed_hash) => parsed_hash,
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %e,
                    "stored password hash has an invalid format"
                );
                return false;
            }
        };

        match self
            .inner
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => true,
            Err(ArgonError::Password) => false,
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification failed unexpectedly"
                );
                false
            }
        }
    }

    /// Runs a full verification against the precomputed dummy hash.
    ///
    /// Used when no account matches a username, so the request takes as long
    /// as a real password check. Always returns `false`.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        #[cfg(test)]
        self.inner.dummy_verifications.fetch_add(1, Ordering::SeqCst);

        let _ = self.verify_password(password, &self.inner.dummy_hash);
        false
    }

    /// Number of dummy verifications run by this hasher and its clones.
    #[cfg(test)]
    pub(crate) fn dummy_verifications(&self) -> usize {
        self.inner.dummy_verifications.load(Ordering::SeqCst)
    }

    fn hash_with(argon2: &Argon2<'static>, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password hashing operation failed"
                );
                Error::internal("password_hasher", "hash generation failed")
            })?;

        Ok(password_hash.to_string())
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}
