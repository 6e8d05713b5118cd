//! Signed, time-bounded session tokens.
//!
//! Tokens are HS256 JWTs signed with a single server-held secret. Sessions
//! are stateless: a token is valid iff its signature verifies and its expiry
//! lies in the future.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "config")]
use clap::Args;
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::security::IdentityClaim;
use crate::{Error, Result, TRACING_TARGET_AUTHENTICATION as TRACING_TARGET};

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Default session lifetime (24 hours).
pub const DEFAULT_TTL_SECS: u64 = 86_400;

/// Longest accepted session lifetime (365 days).
pub const MAX_TTL_SECS: u64 = 365 * DEFAULT_TTL_SECS;

/// Session signing configuration.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct SessionConfig {
    /// Symmetric secret used to sign and verify session tokens
    #[cfg_attr(feature = "config", arg(long, env = "SESSION_SECRET"))]
    pub session_secret: String,

    /// Session token lifetime in seconds
    #[cfg_attr(
        feature = "config",
        arg(long, env = "SESSION_TTL_SECS", default_value_t = DEFAULT_TTL_SECS)
    )]
    #[serde(default = "SessionConfig::default_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl SessionConfig {
    /// Creates a new configuration with the default lifetime.
    pub fn new(session_secret: impl Into<String>) -> Self {
        Self {
            session_secret: session_secret.into(),
            session_ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    /// Sets the session lifetime in seconds.
    pub fn with_ttl_secs(mut self, secs: u64) -> Self {
        self.session_ttl_secs = secs;
        self
    }

    /// Validates the secret and lifetime.
    pub fn validate(&self) -> Result<()> {
        if self.session_secret.trim().is_empty() {
            return Err(Error::config("SESSION_SECRET must be set"));
        }

        if self.session_secret.len() < MIN_SECRET_LEN {
            return Err(Error::config(format!(
                "SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        if !(1..=MAX_TTL_SECS).contains(&self.session_ttl_secs) {
            return Err(Error::config(format!(
                "session lifetime must be between 1 and {MAX_TTL_SECS} seconds"
            )));
        }

        Ok(())
    }

    fn default_ttl_secs() -> u64 {
        DEFAULT_TTL_SECS
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("session_secret", &"***")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .finish()
    }
}

/// JWT claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Issuer.
    #[serde(rename = "iss")]
    issued_by: Cow<'static, str>,
    /// Audience.
    #[serde(rename = "aud")]
    audience: Cow<'static, str>,

    /// Account id.
    #[serde(rename = "sub")]
    pub account_id: Uuid,
    /// Display name of the account.
    #[serde(rename = "displayName")]
    pub display_name: String,

    /// Issued at.
    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiration time.
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,
}

impl SessionClaims {
    const JWT_AUDIENCE: &str = "mflix:server";
    const JWT_ISSUER: &str = "mflix";

    fn new(claim: &IdentityClaim, issued_at: Timestamp, expires_at: Timestamp) -> Self {
        Self {
            issued_by: Cow::Borrowed(Self::JWT_ISSUER),
            audience: Cow::Borrowed(Self::JWT_AUDIENCE),
            account_id: claim.id,
            display_name: claim.display_name.clone(),
            issued_at,
            expires_at,
        }
    }

    /// Returns whether the token has expired at `now`.
    #[inline]
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// Returns the identity carried by these claims.
    pub fn identity(&self) -> IdentityClaim {
        IdentityClaim::new(self.account_id, self.display_name.clone())
    }
}

/// A freshly issued session token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Encoded JWT.
    pub token: String,
    /// When the token was issued.
    pub issued_at: Timestamp,
    /// When the token stops being accepted.
    pub expires_at: Timestamp,
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Session token issuer and verifier.
///
/// Holds the signing keys derived from the configured secret. Cloning is
/// cheap and every clone shares the same keys.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
    ttl: SignedDuration,
}

impl SessionKeys {
    /// Creates the keys from the configured secret.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Config`] if the secret is missing or too short.
    ///
    /// [`ErrorKind::Config`]: crate::ErrorKind::Config
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        config.validate()?;

        let secret = config.session_secret.as_bytes();
        let ttl_secs = i64::try_from(config.session_ttl_secs)
            .map_err(|_| Error::config("session lifetime is out of range"))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[SessionClaims::JWT_ISSUER]);
        validation.set_audience(&[SessionClaims::JWT_AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        let inner = SessionKeysInner {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            validation,
            ttl: SignedDuration::from_secs(ttl_secs),
        };

        tracing::info!(
            target: TRACING_TARGET,
            ttl_secs = config.session_ttl_secs,
            "Session keys initialized"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the configured session lifetime.
    #[inline]
    pub fn ttl(&self) -> SignedDuration {
        self.inner.ttl
    }

    /// Issues a token for `claim` that expires one lifetime from now.
    pub fn issue(&self, claim: &IdentityClaim) -> Result<SessionToken> {
        self.issue_at(claim, Timestamp::now())
    }

    /// Issues a token as if the current time were `now`.
    pub(crate) fn issue_at(&self, claim: &IdentityClaim, now: Timestamp) -> Result<SessionToken> {
        // Claims carry whole seconds, so the returned timestamps do too.
        let issued_at = Timestamp::from_second(now.as_second())
            .map_err(|e| Error::internal("session_keys", "timestamp out of range").with_source(e))?;
        let expires_at = issued_at
            .checked_add(self.inner.ttl)
            .map_err(|e| Error::internal("session_keys", "expiry out of range").with_source(e))?;

        let claims = SessionClaims::new(claim, issued_at, expires_at);
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, &self.inner.encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to encode session token"
            );
            Error::internal("session_keys", "token encoding failed").with_source(e)
        })?;

        Ok(SessionToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Verifies a token and returns the identity it carries.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ExpiredToken`] once the expiry has passed and
    /// [`ErrorKind::InvalidToken`] for every other failure.
    ///
    /// [`ErrorKind::ExpiredToken`]: crate::ErrorKind::ExpiredToken
    /// [`ErrorKind::InvalidToken`]: crate::ErrorKind::InvalidToken
    pub fn verify(&self, token: &str) -> Result<IdentityClaim> {
        let claims = self.decode(token)?;

        if claims.is_expired_at(Timestamp::now()) {
            return Err(Error::expired_token());
        }

        Ok(claims.identity())
    }

    fn decode(&self, token: &str) -> Result<SessionClaims> {
        decode::<SessionClaims>(token, &self.inner.decoding_key, &self.inner.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => Error::expired_token(),
                _ => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        error = %e,
                        "session token rejected"
                    );
                    Error::invalid_token("session token failed verification").with_source(e)
                }
            })
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("ttl", &self.inner.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const SECRET: &str = "test-session-secret-with-32-bytes!!";

    fn keys() -> anyhow::Result<SessionKeys> {
        Ok(SessionKeys::from_config(&SessionConfig::new(SECRET))?)
    }

    fn alice() -> IdentityClaim {
        IdentityClaim::new(Uuid::new_v4(), "alice")
    }

    #[test]
    fn issue_then_verify_round_trips_identity() -> anyhow::Result<()> {
        let keys = keys()?;
        let claim = alice();

        let token = keys.issue(&claim)?;
        let verified = keys.verify(&token.token)?;

        assert_eq!(verified, claim);
        assert_eq!(token.expires_at, token.issued_at.checked_add(keys.ttl())?);
        Ok(())
    }

    #[test]
    fn claims_use_display_name_field() -> anyhow::Result<()> {
        let keys = keys()?;
        let token = keys.issue(&alice())?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_aud = false;
        let data = decode::<serde_json::Value>(
            &token.token,
            &DecodingKey::from_secret(&[]),
            &validation,
        )?;

        assert_eq!(data.claims["displayName"], "alice");
        assert_eq!(data.claims["iss"], "mflix");
        assert!(data.claims["exp"].is_i64());
        Ok(())
    }

    #[test]
    fn tampered_payload_is_invalid() -> anyhow::Result<()> {
        let keys = keys()?;
        let token = keys.issue(&alice())?.token;

        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        let payload = &mut parts[1];
        let middle = payload.len() / 2;
        let replacement = if payload.as_bytes()[middle] == b'A' { "B" } else { "A" };
        payload.replace_range(middle..middle + 1, replacement);
        let tampered = parts.join(".");

        let error = keys.verify(&tampered).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidToken);
        Ok(())
    }

    #[test]
    fn foreign_secret_is_invalid() -> anyhow::Result<()> {
        let keys = keys()?;
        let other = SessionKeys::from_config(&SessionConfig::new(
            "another-session-secret-with-32-bytes",
        ))?;
        let token = other.issue(&alice())?.token;

        let error = keys.verify(&token).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidToken);
        Ok(())
    }

    #[test]
    fn garbage_is_invalid() -> anyhow::Result<()> {
        let keys = keys()?;

        let error = keys.verify("not.a.token").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidToken);
        Ok(())
    }

    #[test]
    fn token_past_ttl_is_expired() -> anyhow::Result<()> {
        let keys = SessionKeys::from_config(&SessionConfig::new(SECRET).with_ttl_secs(60))?;
        let issued_at = Timestamp::now().checked_sub(SignedDuration::from_hours(1))?;
        let token = keys.issue_at(&alice(), issued_at)?.token;

        let error = keys.verify(&token).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ExpiredToken);
        Ok(())
    }

    #[test]
    fn missing_or_short_secret_is_fatal() {
        for secret in ["", "   ", "short"] {
            let error = SessionKeys::from_config(&SessionConfig::new(secret)).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Config);
        }
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let config = SessionConfig::new(SECRET).with_ttl_secs(0);
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn oversized_ttl_is_rejected_at_startup() {
        let config = SessionConfig::new(SECRET).with_ttl_secs(1_000_000_000_000);
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Config);

        let error = SessionKeys::from_config(&config).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn longest_ttl_still_issues_tokens() -> anyhow::Result<()> {
        let config = SessionConfig::new(SECRET).with_ttl_secs(MAX_TTL_SECS);
        let keys = SessionKeys::from_config(&config)?;
        let claim = alice();

        let token = keys.issue(&claim)?;
        assert_eq!(keys.verify(&token.token)?, claim);
        Ok(())
    }

    #[test]
    fn debug_hides_secret() {
        let config = SessionConfig::new(SECRET);
        assert!(!format!("{config:?}").contains(SECRET));
    }
}
