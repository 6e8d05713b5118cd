//! Session check in front of protected path prefixes.
//!
//! The guard runs before routing, so it also covers unknown paths under a
//! protected prefix. A request either carries a valid bearer token and
//! continues with its [`IdentityClaim`] attached, or is answered with a bare
//! `401 {"error":"Unauthorized"}`.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Response};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::extract::AuthHeader;
use crate::handler::ErrorKind;
use crate::service::{IdentityClaim, SessionKeys};

/// Tracing target for the access guard.
const TRACING_TARGET: &str = "mflix_server::middleware::access_guard";

/// Path prefixes protected when none are configured.
pub const DEFAULT_PROTECTED_PREFIXES: [&str; 2] = ["/api/movies", "/api/theaters"];

/// Configuration for the access guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct GuardConfig {
    /// Path prefixes that require a valid session token.
    #[cfg_attr(
        feature = "config",
        arg(
            long,
            env = "PROTECTED_PREFIXES",
            value_delimiter = ',',
            default_values_t = DEFAULT_PROTECTED_PREFIXES.map(String::from)
        )
    )]
    pub protected_prefixes: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: DEFAULT_PROTECTED_PREFIXES.map(String::from).to_vec(),
        }
    }
}

impl GuardConfig {
    /// Creates a configuration protecting the given prefixes.
    pub fn new<I, P>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            protected_prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Verifies session tokens on requests under protected prefixes.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    prefixes: Arc<[String]>,
    session_keys: SessionKeys,
}

impl AccessGuard {
    /// Creates a guard for the configured prefixes.
    ///
    /// Trailing slashes are ignored and empty entries are skipped.
    pub fn new(config: &GuardConfig, session_keys: SessionKeys) -> Self {
        let prefixes = config
            .protected_prefixes
            .iter()
            .map(|prefix| prefix.trim().trim_end_matches('/'))
            .filter(|prefix| !prefix.is_empty())
            .map(|prefix| {
                if prefix.starts_with('/') {
                    prefix.to_owned()
                } else {
                    format!("/{prefix}")
                }
            })
            .collect();

        Self {
            prefixes,
            session_keys,
        }
    }

    /// Returns `true` if `path` equals a protected prefix or lies below one.
    pub fn is_protected(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

/// Lets the request through when it is unprotected or carries a valid token.
///
/// The verified [`IdentityClaim`] is inserted into the request extensions,
/// where [`AuthState`] picks it up.
///
/// [`AuthState`]: crate::extract::AuthState
pub async fn require_session(
    State(guard): State<AccessGuard>,
    request: Request,
    next: Next,
) -> Response {
    if !guard.is_protected(request.uri().path()) {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let identity = match AuthHeader::from_parts(&mut parts).await {
        Ok(auth_header) => guard.session_keys.verify(auth_header.token()),
        Err(error) => return error.into_response(),
    };

    match identity {
        Ok(identity) => {
            tracing::trace!(
                target: TRACING_TARGET,
                path = parts.uri.path(),
                account_id = %identity.id,
                "session accepted"
            );

            parts.extensions.insert::<IdentityClaim>(identity);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(error) => {
            tracing::debug!(
                target: TRACING_TARGET,
                path = parts.uri.path(),
                kind = %error.kind(),
                "session rejected"
            );

            ErrorKind::Unauthorized.into_response()
        }
    }
}

/// Extension trait for `axum::`[`Router`] to apply the access guard.
pub trait RouterAccessGuardExt<S> {
    /// Layers [`require_session`] over every route of the router.
    fn with_access_guard(self, config: &GuardConfig, session_keys: SessionKeys) -> Self;
}

impl<S> RouterAccessGuardExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_access_guard(self, config: &GuardConfig, session_keys: SessionKeys) -> Self {
        let guard = AccessGuard::new(config, session_keys);
        self.layer(from_fn_with_state(guard, require_session))
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;
    use jiff::{SignedDuration, Timestamp};
    use uuid::Uuid;

    use super::*;
    use crate::extract::AuthState;
    use crate::service::SessionConfig;

    const SECRET: &str = "access-guard-test-secret-0123456789abcdef";

    fn session_keys() -> anyhow::Result<SessionKeys> {
        Ok(SessionKeys::from_config(&SessionConfig::new(SECRET))?)
    }

    async fn whoami(AuthState(identity): AuthState) -> String {
        identity.display_name
    }

    fn test_server(keys: SessionKeys) -> anyhow::Result<TestServer> {
        let router = Router::new()
            .route("/api/movies", get(whoami))
            .route("/api/movies/{movie_id}", get(whoami))
            .route("/api/moviesx", get(|| async { "open" }))
            .route("/public", get(|| async { "open" }))
            .with_access_guard(&GuardConfig::default(), keys.clone())
            .with_state(keys);

        Ok(TestServer::new(router)?)
    }

    #[test]
    fn prefix_matching_respects_segments() -> anyhow::Result<()> {
        let config = GuardConfig::new(["/api/movies/", "api/theaters", " "]);
        let guard = AccessGuard::new(&config, session_keys()?);

        assert!(guard.is_protected("/api/movies"));
        assert!(guard.is_protected("/api/movies/"));
        assert!(guard.is_protected("/api/movies/comments/42"));
        assert!(guard.is_protected("/api/theaters"));
        assert!(!guard.is_protected("/api/moviesx"));
        assert!(!guard.is_protected("/auth/login"));
        assert!(!guard.is_protected("/"));
        Ok(())
    }

    #[test]
    fn default_config_protects_movies_and_theaters() {
        let config = GuardConfig::default();
        assert_eq!(config.protected_prefixes, ["/api/movies", "/api/theaters"]);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_identity() -> anyhow::Result<()> {
        let keys = session_keys()?;
        let claim = IdentityClaim::new(Uuid::new_v4(), "alice");
        let token = keys.issue(&claim)?;
        let server = test_server(keys)?;

        let response = server
            .get("/api/movies/123")
            .authorization_bearer(&token.token)
            .await;

        response.assert_status_ok();
        response.assert_text("alice");
        Ok(())
    }

    #[tokio::test]
    async fn missing_token_is_rejected() -> anyhow::Result<()> {
        let server = test_server(session_keys()?)?;

        let response = server.get("/api/movies").await;
        response.assert_status_unauthorized();
        response.assert_json(&serde_json::json!({ "error": "Unauthorized" }));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_path_under_prefix_is_rejected() -> anyhow::Result<()> {
        let server = test_server(session_keys()?)?;

        let response = server.get("/api/theaters/nowhere").await;
        response.assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn expired_and_foreign_tokens_are_rejected() -> anyhow::Result<()> {
        let keys = session_keys()?;
        let claim = IdentityClaim::new(Uuid::new_v4(), "alice");
        let issued_at = Timestamp::now() - SignedDuration::from_hours(48);
        let expired = keys.issue_at(&claim, issued_at)?;

        let foreign_keys = SessionKeys::from_config(&SessionConfig::new(
            "another-secret-that-is-long-enough-0123",
        ))?;
        let foreign = foreign_keys.issue(&claim)?;

        let server = test_server(keys)?;
        for token in [expired.token, foreign.token, "garbage".to_owned()] {
            let response = server.get("/api/movies").authorization_bearer(&token).await;
            response.assert_status_unauthorized();
            response.assert_json(&serde_json::json!({ "error": "Unauthorized" }));
        }
        Ok(())
    }

    #[tokio::test]
    async fn unprotected_paths_pass_without_token() -> anyhow::Result<()> {
        let server = test_server(session_keys()?)?;

        server.get("/public").await.assert_text("open");
        server.get("/api/moviesx").await.assert_text("open");
        Ok(())
    }
}
