//! Account repository for credential records.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Account, NewAccount};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for credential records.
///
/// Accounts are only created and read; the authentication flow never
/// updates or deletes them.
pub trait AccountRepository {
    /// Inserts a new account.
    ///
    /// Fails with a [`UsernameUnique`] constraint violation when the
    /// username is already taken.
    ///
    /// [`UsernameUnique`]: crate::types::AccountConstraints::UsernameUnique
    fn create_account(
        &mut self,
        new_account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Finds an account by its exact, case-sensitive username.
    fn find_account_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;
}

impl AccountRepository for PgConnection {
    async fn create_account(&mut self, new_account: NewAccount) -> PgResult<Account> {
        use schema::accounts;

        diesel::insert_into(accounts::table)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_account_by_username(&mut self, username: &str) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::username.eq(username))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }
}
