use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;

use super::AuthHeader;
use crate::handler::{Error, Result};
use crate::service::{IdentityClaim, SessionKeys};

/// Identity of the caller behind a verified session token.
///
/// Behind the access guard the claim is already in the request extensions.
/// Anywhere else the bearer token is verified on extraction.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub IdentityClaim);

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<IdentityClaim>() {
            return Ok(Self(identity.clone()));
        }

        let auth_header = AuthHeader::from_parts(parts).await?;
        let identity = SessionKeys::from_ref(state).verify(auth_header.token())?;
        parts.extensions.insert(identity.clone());

        Ok(Self(identity))
    }
}
