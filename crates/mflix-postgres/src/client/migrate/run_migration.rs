use std::time::Instant;

use diesel::migration::Result as HarnessResult;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use super::{MigrationResult, MigrationStatus};
use crate::{MIGRATIONS, PgClient, PgError, PgResult, PooledConnection, TRACING_TARGET_MIGRATION};

type HarnessConnection = AsyncConnectionWrapper<PooledConnection>;

/// Runs `f` against a synchronous migration harness on the blocking pool.
async fn with_harness<F, T>(pg: &PgClient, f: F) -> PgResult<T>
where
    F: FnOnce(&mut HarnessConnection) -> HarnessResult<T> + Send + 'static,
    T: Send + 'static,
{
    let conn = pg.get_connection().await?.into_inner();
    let mut conn: HarnessConnection = conn.into();

    spawn_blocking(move || f(&mut conn))
        .await
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                error = %err,
                "Migration task panicked"
            );
            PgError::Migration(err.into())
        })?
        .map_err(PgError::Migration)
}

/// Applies all pending embedded migrations.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub(super) async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    tracing::info!(target: TRACING_TARGET_MIGRATION, "Starting database migration process");

    let start_time = Instant::now();
    let result = with_harness(pg, |conn| {
        let versions = conn.run_pending_migrations(MIGRATIONS)?;
        Ok(versions.into_iter().map(|v| v.to_string()).collect())
    })
    .await;

    let duration = start_time.elapsed();
    let versions: Vec<String> = result.inspect_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "Database migration process failed"
        );
    })?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        migrations_count = versions.len(),
        "Database migration process completed"
    );

    Ok(MigrationResult::new(duration, versions))
}

/// Reads the applied versions and compares them with the embedded set.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub(super) async fn get_migration_status(pg: &PgClient) -> PgResult<MigrationStatus> {
    let status = with_harness(pg, |conn| {
        let applied = conn
            .applied_migrations()?
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>();
        let pending = conn
            .pending_migrations(MIGRATIONS)?
            .into_iter()
            .map(|m| m.name().version().to_string())
            .collect::<Vec<_>>();
        Ok(MigrationStatus::new(applied, pending))
    })
    .await?;

    tracing::debug!(
        target: TRACING_TARGET_MIGRATION,
        pending_count = status.pending_migrations(),
        is_up_to_date = status.is_up_to_date(),
        "Migration status retrieved"
    );

    Ok(status)
}
