//! Service error to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::ErrorKind as ServiceErrorKind;

/// Tracing target for service error conversions.
const TRACING_TARGET: &str = "mflix_server::handler::service";

impl From<crate::Error> for HttpError<'static> {
    fn from(error: crate::Error) -> Self {
        let kind = error.kind();
        let context = error.to_string();

        match kind {
            ServiceErrorKind::InvalidInput => ErrorKind::BadRequest
                .with_message(error.message().to_owned())
                .with_context(context),

            ServiceErrorKind::InvalidCredentialsFormat => ErrorKind::BadRequest
                .with_message("Invalid credentials format")
                .with_context(context),

            ServiceErrorKind::DuplicateUsername => ErrorKind::BadRequest
                .with_message("User already exists")
                .with_context(context),

            // Every authentication failure renders the same body.
            ServiceErrorKind::AuthenticationFailed
            | ServiceErrorKind::InvalidToken
            | ServiceErrorKind::ExpiredToken => ErrorKind::Unauthorized.with_context(context),

            ServiceErrorKind::StoreUnavailable
            | ServiceErrorKind::Config
            | ServiceErrorKind::Internal => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %kind,
                    "Service operation failed"
                );
                ErrorKind::InternalServerError
                    .with_message("Internal server error")
                    .with_context(context)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn authentication_kinds_are_indistinguishable() {
        let errors = [
            crate::Error::authentication_failed(),
            crate::Error::invalid_token("signature mismatch"),
            crate::Error::expired_token(),
        ];

        for error in errors {
            let http: HttpError<'static> = error.into();
            assert_eq!(http.kind(), ErrorKind::Unauthorized);
            assert_eq!(http.message(), None);
            assert_eq!(http.resource(), None);
        }
    }

    #[test]
    fn duplicate_username_is_bad_request() {
        let http: HttpError<'static> = crate::Error::duplicate_username().into();
        assert_eq!(http.kind(), ErrorKind::BadRequest);
        assert_eq!(http.message(), Some("User already exists"));
    }

    #[test]
    fn store_failure_is_generic() {
        let http: HttpError<'static> =
            crate::Error::store_unavailable("postgres", "connection refused").into();

        assert_eq!(http.message(), Some("Internal server error"));
        assert_eq!(
            http.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
