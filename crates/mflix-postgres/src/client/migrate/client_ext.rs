use std::future::Future;

use super::run_migration;
use super::{MigrationResult, MigrationStatus};
use crate::{PgClient, PgResult};

/// Migration capabilities for [`PgClient`].
pub trait PgClientMigrationExt {
    /// Applies every embedded migration that has not been applied yet.
    ///
    /// Safe to call on every startup.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>> + Send;

    /// Compares the embedded migrations with the ones recorded in the database.
    fn get_migration_status(&self) -> impl Future<Output = PgResult<MigrationStatus>> + Send;
}

impl PgClientMigrationExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        run_migration::run_pending_migrations(self).await
    }

    async fn get_migration_status(&self) -> PgResult<MigrationStatus> {
        run_migration::get_migration_status(self).await
    }
}
