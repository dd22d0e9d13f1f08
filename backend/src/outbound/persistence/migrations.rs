//! Embedded schema migrations for the relational store.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure while bringing the schema up to date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationRunError {
    /// The database could not be reached.
    #[error("migration connection failed: {message}")]
    Connection { message: String },
    /// A migration failed to apply.
    #[error("migration failed: {message}")]
    Apply { message: String },
}

/// Apply every pending migration, blocking the calling thread.
///
/// # Errors
///
/// Returns [`MigrationRunError`] when the database is unreachable or a
/// migration fails.
pub fn run_migrations(database_url: &str) -> Result<usize, MigrationRunError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationRunError::Connection {
            message: err.to_string(),
        }
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationRunError::Apply {
            message: err.to_string(),
        })?;
    info!(applied = applied.len(), "schema migrations applied");
    Ok(applied.len())
}

/// Async wrapper for [`run_migrations`] that keeps the blocking connection
/// off the runtime's worker threads.
///
/// # Errors
///
/// See [`run_migrations`].
pub async fn run_migrations_async(database_url: String) -> Result<usize, MigrationRunError> {
    tokio::task::spawn_blocking(move || run_migrations(&database_url))
        .await
        .map_err(|err| MigrationRunError::Apply {
            message: format!("migration task failed: {err}"),
        })?
}
