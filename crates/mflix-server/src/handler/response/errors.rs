use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Tracing target for rendered error responses.
const TRACING_TARGET: &str = "mflix_server::handler::response";

/// JSON error body returned by every failing route.
///
/// Only `error` is always present. The unauthorized response never carries
/// anything else, so clients cannot tell why a credential or token was rejected.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Short title of the error class.
    pub error: Cow<'a, str>,
    /// Message safe for client display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Cow<'a, str>>,
    /// The resource that the error relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    /// Internal context for debugging, logged but never serialized.
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code.
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    pub const BAD_REQUEST: Self = Self::new("Bad Request", StatusCode::BAD_REQUEST);
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "Internal Server Error",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const NOT_FOUND: Self = Self::new("Not Found", StatusCode::NOT_FOUND);
    pub const UNAUTHORIZED: Self = Self::new("Unauthorized", StatusCode::UNAUTHORIZED);
    pub const UNSUPPORTED_MEDIA_TYPE: Self = Self::new(
        "Unsupported Media Type",
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
    );
    pub const VALIDATION_ERROR: Self = Self::new("Validation Error", StatusCode::BAD_REQUEST);

    /// Creates a new error response.
    #[inline]
    pub const fn new(error: &'a str, status: StatusCode) -> Self {
        Self {
            error: Cow::Borrowed(error),
            message: None,
            resource: None,
            context: None,
            status,
        }
    }

    /// Sets the client-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the resource, joining with an existing one by `/`.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        let new_resource = resource.into();
        self.resource = Some(match self.resource {
            Some(existing) => Cow::Owned(format!("{}/{}", existing, new_resource)),
            None => new_resource,
        });
        self
    }

    /// Attaches context, joining with existing context by `; `.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        tracing::warn!(
            target: TRACING_TARGET,
            status = %self.status,
            error = %self.error,
            message = ?self.message,
            resource = ?self.resource,
            context = ?self.context,
            "HTTP error response"
        );
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_serializes_title_only() -> anyhow::Result<()> {
        let response = ErrorResponse::UNAUTHORIZED.with_context("signature mismatch");
        let json = serde_json::to_value(&response)?;

        assert_eq!(json, serde_json::json!({ "error": "Unauthorized" }));
        Ok(())
    }

    #[test]
    fn error_response_merging_resource() {
        let response = ErrorResponse::NOT_FOUND
            .with_resource("movies")
            .with_resource("comments");

        assert_eq!(response.resource.as_deref(), Some("movies/comments"));
    }

    #[test]
    fn error_response_merging_context() {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("Database connection failed")
            .with_context("Pool exhausted");

        assert_eq!(
            response.context.as_deref(),
            Some("Database connection failed; Pool exhausted")
        );
    }

    #[test]
    fn error_response_serialization() -> anyhow::Result<()> {
        let response = ErrorResponse::BAD_REQUEST
            .with_resource("movies")
            .with_message("Invalid movie ID")
            .with_context("not a uuid");

        let json = serde_json::to_string(&response)?;

        assert!(json.contains("\"error\":\"Bad Request\""));
        assert!(json.contains("Invalid movie ID"));
        assert!(json.contains("movies"));
        assert!(!json.contains("context"));
        assert!(!json.contains("status"));
        Ok(())
    }
}
