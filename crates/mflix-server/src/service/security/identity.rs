use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of an authenticated account.
///
/// Produced by the authenticator after a successful password check and
/// recovered from a verified session token. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaim {
    /// Account id.
    pub id: Uuid,
    /// Name shown for the account; currently the username.
    pub display_name: String,
}

impl IdentityClaim {
    /// Creates a new [`IdentityClaim`].
    pub fn new(id: Uuid, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}
