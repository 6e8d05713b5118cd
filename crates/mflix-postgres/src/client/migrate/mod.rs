//! Embedded migration management for [`PgClient`].
//!
//! [`PgClient`]: crate::PgClient

mod client_ext;
mod migrate_result;
mod run_migration;

pub use client_ext::PgClientMigrationExt;
pub use migrate_result::{MigrationResult, MigrationStatus};
