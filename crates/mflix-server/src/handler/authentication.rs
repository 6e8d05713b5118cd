//! Registration and login handlers.
//!
//! Both routes are public. Login answers every credential mismatch with the
//! same `401 {"error":"Unauthorized"}` body whether or not the account exists.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;

use crate::extract::{AuthHeader, Json, ValidateJson};
use crate::handler::Result;
use crate::handler::request::{LoginRequest, RegisterRequest};
use crate::handler::response::{LoginResponse, Registered};
use crate::service::{Authenticator, ServiceState, SessionKeys};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "mflix_server::handler::authentication";

/// Creates an account.
#[tracing::instrument(skip_all)]
async fn register(
    State(authenticator): State<Authenticator>,
    ValidateJson(request): ValidateJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Registered>)> {
    tracing::trace!(target: TRACING_TARGET, "registration attempt");

    let id = authenticator
        .register(&request.username, &request.password)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %id,
        "account registered"
    );

    Ok((StatusCode::CREATED, Json(Registered { id })))
}

/// Verifies credentials and issues a session token.
///
/// The token is returned in the body and in the `Authorization` header.
#[tracing::instrument(skip_all)]
async fn login(
    State(authenticator): State<Authenticator>,
    State(session_keys): State<SessionKeys>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, AuthHeader, Json<LoginResponse>)> {
    tracing::trace!(target: TRACING_TARGET, "login attempt");

    let identity = authenticator
        .authenticate(request.username(), request.password())
        .await?;
    let session_token = session_keys.issue(&identity)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %identity.id,
        expires_at = %session_token.expires_at,
        "session issued"
    );

    let auth_header = AuthHeader::new(session_token.token.clone());
    let response = LoginResponse::new(identity, &session_token);

    Ok((StatusCode::OK, auth_header, Json(response)))
}

/// Returns a [`Router`] with all authentication routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}
