use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::{IdentityClaim, SessionToken};

/// Response returned after successful registration.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    /// ID of the new account.
    pub id: Uuid,
}

/// Response returned after successful login.
#[must_use]
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Session token, also sent in the `Authorization` header.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: Timestamp,
    /// ID of the account.
    pub id: Uuid,
    /// Name shown for the account.
    pub display_name: String,
}

impl LoginResponse {
    pub fn new(identity: IdentityClaim, session_token: &SessionToken) -> Self {
        Self {
            token: session_token.token.clone(),
            expires_at: session_token.expires_at,
            id: identity.id,
            display_name: identity.display_name,
        }
    }
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("expires_at", &self.expires_at)
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}
