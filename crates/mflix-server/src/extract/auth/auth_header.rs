//! Bearer tokens in the `Authorization` header.
//!
//! [`AuthHeader`] reads the raw token from incoming requests and writes a
//! freshly issued token to outgoing responses.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};

type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;

/// Raw session token carried as `Authorization: Bearer <token>`.
///
/// Extraction only checks that the header is present and well formed; the
/// token itself is verified by [`SessionKeys`].
///
/// [`SessionKeys`]: crate::service::SessionKeys
#[must_use]
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader(String);

impl AuthHeader {
    /// Wraps an encoded token.
    #[inline]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the encoded token.
    #[inline]
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Reads the bearer token from request parts.
    ///
    /// Every failure is reported as a bare [`ErrorKind::Unauthorized`].
    pub async fn from_parts(parts: &mut Parts) -> Result<Self> {
        match AuthBearerHeader::from_request_parts(parts, &()).await {
            Ok(TypedHeader(Authorization(bearer))) => Ok(Self::new(bearer.token())),
            Err(rejection) => {
                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    reason = %rejection,
                    "missing or malformed bearer token"
                );
                Err(ErrorKind::Unauthorized.with_context(rejection.to_string()))
            }
        }
    }

    fn into_header(self) -> Result<AuthBearerHeader> {
        let authorization = Authorization::bearer(&self.0).map_err(|e| {
            ErrorKind::InternalServerError
                .with_message("Failed to build authorization header")
                .with_context(e.to_string())
        })?;

        Ok(TypedHeader(authorization))
    }
}

impl std::fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthHeader").field(&"***").finish()
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts).await
    }
}

impl IntoResponseParts for AuthHeader {
    type Error = Error<'static>;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let header = self.into_header()?;
        match header.into_response_parts(res) {
            Ok(res) => Ok(res),
            Err(infallible) => match infallible {},
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, header};

    use super::*;

    #[tokio::test]
    async fn reads_bearer_token() -> anyhow::Result<()> {
        let (mut parts, ()) = Request::builder()
            .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(())?
            .into_parts();

        let auth_header = AuthHeader::from_parts(&mut parts).await?;
        assert_eq!(auth_header.token(), "abc.def.ghi");
        Ok(())
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() -> anyhow::Result<()> {
        let (mut parts, ()) = Request::builder().body(())?.into_parts();

        let error = AuthHeader::from_parts(&mut parts).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        assert_eq!(error.message(), None);
        Ok(())
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() -> anyhow::Result<()> {
        let (mut parts, ()) = Request::builder()
            .header(header::AUTHORIZATION, "Basic YWxpY2U6c2VjcmV0")
            .body(())?
            .into_parts();

        let error = AuthHeader::from_parts(&mut parts).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }

    #[test]
    fn debug_hides_token() {
        let auth_header = AuthHeader::new("abc.def.ghi");
        assert!(!format!("{auth_header:?}").contains("abc"));
    }
}
