//! JSON extractor that also runs `validator` checks.

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// Tracing target for request validation.
const TRACING_TARGET: &str = "mflix_server::extract::validate";

/// JSON extractor that validates the payload after deserialization.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Returns the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self(data))
    }
}

fn format_validation_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return format!("Field '{}': {}", field, custom_message);
    }

    match (error.code.as_ref(), error.params.get("max")) {
        ("length", Some(max)) => {
            format!("Field '{}' must be at most {} characters long", field, max)
        }
        (code, _) => format!("Field '{}' failed validation: {}", field, code),
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut error_messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors
                    .iter()
                    .map(move |error| format_validation_error(field, error))
            })
            .collect();
        error_messages.sort();

        tracing::warn!(
            target: TRACING_TARGET,
            errors = ?errors.field_errors(),
            "Request validation failed"
        );

        let user_message = match error_messages.as_slice() {
            [] => "Validation failed".to_string(),
            messages => messages.join(". "),
        };

        ErrorKind::ValidationError
            .with_message(user_message)
            .with_resource("request")
    }
}
