use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Request payload for login.
///
/// Fields accept any JSON value. Missing and non-string credentials are read
/// as empty strings so that every malformed credential produces the same
/// generic error.
#[must_use]
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username of the account.
    pub username: Value,
    /// Password of the account.
    pub password: Value,
}

impl LoginRequest {
    /// Returns the username, or an empty string if it is not a string.
    #[inline]
    pub fn username(&self) -> &str {
        self.username.as_str().unwrap_or_default()
    }

    /// Returns the password, or an empty string if it is not a string.
    #[inline]
    pub fn password(&self) -> &str {
        self.password.as_str().unwrap_or_default()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Request payload for registration.
#[must_use]
#[derive(Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Username of the new account.
    #[validate(length(max = 128))]
    pub username: String,
    /// Password of the new account.
    #[validate(length(max = 1024))]
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
