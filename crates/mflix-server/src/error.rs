//! Service layer error types.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Boxed error used as the source of an [`Error`].
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of service layer failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or empty input.
    InvalidInput,
    /// Username or password missing or empty; never says which.
    InvalidCredentialsFormat,
    /// Registration with a username that already exists.
    DuplicateUsername,
    /// Unknown username or wrong password; never says which.
    AuthenticationFailed,
    /// Token signature, structure or claims do not verify.
    InvalidToken,
    /// Token verified but its expiry has passed.
    ExpiredToken,
    /// The backing store could not be reached or failed.
    StoreUnavailable,
    /// Invalid or missing configuration.
    Config,
    /// Internal service logic errors.
    Internal,
}

impl ErrorKind {
    /// Returns the error kind as a string for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidCredentialsFormat => "invalid_credentials_format",
            Self::DuplicateUsername => "duplicate_username",
            Self::AuthenticationFailed => "authentication_failed",
            Self::InvalidToken => "invalid_token",
            Self::ExpiredToken => "expired_token",
            Self::StoreUnavailable => "store_unavailable",
            Self::Config => "config",
            Self::Internal => "internal_service",
        }
    }

    /// Returns whether this kind must surface as a generic 401.
    #[must_use]
    pub const fn is_unauthorized(self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed | Self::InvalidToken | Self::ExpiredToken
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service layer error with a kind, message and optional source.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    /// Creates a new [`Error`].
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a source error.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creates a new invalid input error.
    #[inline]
    pub fn invalid_input(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Creates the error returned for missing or empty credentials.
    #[inline]
    pub fn invalid_credentials_format() -> Self {
        Self::new(
            ErrorKind::InvalidCredentialsFormat,
            "Username and password are required",
        )
    }

    /// Creates the error returned when a username is already registered.
    #[inline]
    pub fn duplicate_username() -> Self {
        Self::new(ErrorKind::DuplicateUsername, "User already exists")
    }

    /// Creates the generic login failure.
    #[inline]
    pub fn authentication_failed() -> Self {
        Self::new(ErrorKind::AuthenticationFailed, "Invalid credentials")
    }

    /// Creates a new invalid token error.
    #[inline]
    pub fn invalid_token(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    /// Creates a new expired token error.
    #[inline]
    pub fn expired_token() -> Self {
        Self::new(ErrorKind::ExpiredToken, "Session token has expired")
    }

    /// Creates a new store error for the named store.
    #[inline]
    pub fn store_unavailable(
        store: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let full_message = format!("{}: {}", store.into(), message.into());
        Self::new(ErrorKind::StoreUnavailable, full_message)
    }

    /// Creates a new configuration error.
    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Creates a new internal service error.
    #[inline]
    pub fn internal(
        service: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let full_message = format!("{}: {}", service.into(), message.into());
        Self::new(ErrorKind::Internal, full_message)
    }
}
