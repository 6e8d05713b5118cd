//! Credential records.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::accounts;

/// Stored credential record.
#[derive(Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Unique, case-sensitive login name.
    pub username: String,
    /// Argon2 PHC string; never plaintext.
    pub password_hash: String,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
}

/// Data for creating a new account.
#[derive(Clone, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    /// Unique, case-sensitive login name.
    pub username: String,
    /// Argon2 PHC string; never plaintext.
    pub password_hash: String,
}

// Debug output omits the password hash so records can be logged safely.
impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
