//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - [`RouterAccessGuardExt`] rejects unauthenticated requests to protected prefixes.
//! - [`RouterRecoveryExt`] turns timeouts and panics into JSON errors.
//! - [`RouterObservabilityExt`] adds request ids and request spans.
//! - [`RouterSecurityExt`] adds CORS, a body limit and security headers.

mod access_guard;
mod observability;
mod recovery;
mod security;

pub use access_guard::{
    AccessGuard, DEFAULT_PROTECTED_PREFIXES, GuardConfig, RouterAccessGuardExt, require_session,
};
pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, DEFAULT_MAX_BODY_SIZE, RouterSecurityExt};
