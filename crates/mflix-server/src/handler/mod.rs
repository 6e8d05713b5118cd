//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! [`routes`] assembles the public authentication and health routes with the
//! document routes, and layers the access guard over all of them.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod authentication;
mod comments;
mod documents;
mod error;
mod monitors;
mod movies;
pub mod request;
pub mod response;
mod theaters;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::ErrorResponse;
use crate::middleware::{GuardConfig, RouterAccessGuardExt};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with every route and the access guard applied.
///
/// The guard wraps the fallback too, so unknown paths under a protected
/// prefix answer `401` rather than `404` without a session.
pub fn routes(guard_config: &GuardConfig, state: &ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(authentication::routes())
        .merge(monitors::routes())
        .merge(movies::routes())
        .merge(comments::routes())
        .merge(theaters::routes())
        .fallback(fallback)
        .with_access_guard(guard_config, state.session_keys.clone())
}

#[cfg(test)]
pub(crate) mod test {
    use axum::Router;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use jiff::{SignedDuration, Timestamp};
    use serde_json::json;
    use uuid::Uuid;

    use crate::handler::routes;
    use crate::middleware::GuardConfig;
    use crate::service::{
        IdentityClaim, MemoryCredentialStore, MemoryDocumentStore, ServiceState, SessionConfig,
        SessionKeys,
    };

    /// Secret used by every test server.
    const TEST_SECRET: &str = "mflix-handler-test-secret-0123456789abcdef";

    /// Handles into the state behind a test server.
    pub struct TestContext {
        pub credentials: MemoryCredentialStore,
        pub documents: MemoryDocumentStore,
        pub session_keys: SessionKeys,
    }

    impl TestContext {
        /// Issues a token without going through registration.
        pub fn token_for(&self, display_name: &str) -> anyhow::Result<String> {
            let claim = IdentityClaim::new(Uuid::new_v4(), display_name);
            Ok(self.session_keys.issue(&claim)?.token)
        }
    }

    fn create_state() -> anyhow::Result<(ServiceState, TestContext)> {
        let context = TestContext {
            credentials: MemoryCredentialStore::new(),
            documents: MemoryDocumentStore::new(),
            session_keys: SessionKeys::from_config(&SessionConfig::new(TEST_SECRET))?,
        };

        let state = ServiceState::from_stores(
            context.credentials.clone(),
            context.documents.clone(),
            context.session_keys.clone(),
        )?;

        Ok((state, context))
    }

    /// Returns a new [`TestServer`] serving the given router without the guard.
    pub fn create_test_server_with_router(
        router: impl Fn(&ServiceState) -> Router<ServiceState>,
    ) -> anyhow::Result<(TestServer, TestContext)> {
        let (state, context) = create_state()?;
        let app = router(&state).with_state(state);
        Ok((TestServer::new(app)?, context))
    }

    /// Returns a new [`TestServer`] with every route and the default guard.
    pub fn create_test_server() -> anyhow::Result<(TestServer, TestContext)> {
        create_test_server_with_router(|state| routes(&GuardConfig::default(), state))
    }

    #[tokio::test]
    async fn unknown_public_path_is_not_found() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server.get("/nowhere").await;
        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Not Found" }));
        Ok(())
    }

    #[tokio::test]
    async fn register_login_and_access_protected_routes() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let credentials = json!({ "username": "alice", "password": "secret123" });

        server
            .post("/auth/register")
            .json(&credentials)
            .await
            .assert_status(StatusCode::CREATED);

        server
            .post("/auth/register")
            .json(&credentials)
            .await
            .assert_status_bad_request();

        server
            .post("/auth/login")
            .json(&json!({ "username": "alice", "password": "wrong" }))
            .await
            .assert_status_unauthorized();

        let response = server.post("/auth/login").json(&credentials).await;
        response.assert_status_ok();
        let token = response.json::<serde_json::Value>()["token"]
            .as_str()
            .unwrap_or_default()
            .to_owned();
        assert!(!token.is_empty());

        server
            .get("/api/movies")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let response = server.get("/api/movies").await;
        response.assert_status_unauthorized();
        response.assert_json(&json!({ "error": "Unauthorized" }));

        let identity = context.session_keys.verify(&token)?;
        let issued_at = Timestamp::now() - SignedDuration::from_hours(25);
        let expired = context.session_keys.issue_at(&identity, issued_at)?;

        let response = server
            .get("/api/theaters")
            .authorization_bearer(&expired.token)
            .await;
        response.assert_status_unauthorized();
        response.assert_json(&json!({ "error": "Unauthorized" }));
        Ok(())
    }
}
