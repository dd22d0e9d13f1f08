//! Ports used by the relational-to-document migration.

use async_trait::async_trait;

use crate::domain::{MigrationStats, RelationalSnapshot};

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading the source or writing the target.
    pub enum MigrationError {
        /// A store could not be reached.
        Connection { message: String } =>
            "migration store connection failed: {message}",
        /// Reading the relational source failed.
        Source { message: String } =>
            "reading relational source failed: {message}",
        /// Writing the document target failed.
        Target { message: String } =>
            "writing document target failed: {message}",
    }
}

/// Reads every entity from the relational store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationalSnapshotSource: Send + Sync {
    /// Load a consistent snapshot of the relational store.
    async fn load_snapshot(&self) -> Result<RelationalSnapshot, MigrationError>;
}

/// Replaces the document collections with a translated snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentImport: Send + Sync {
    /// Clear every collection, then write the snapshot and rebuild caches.
    async fn replace_all(
        &self,
        snapshot: &RelationalSnapshot,
    ) -> Result<MigrationStats, MigrationError>;
}

/// Source with no data, used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRelationalSnapshotSource;

#[async_trait]
impl RelationalSnapshotSource for FixtureRelationalSnapshotSource {
    async fn load_snapshot(&self) -> Result<RelationalSnapshot, MigrationError> {
        Ok(RelationalSnapshot::default())
    }
}
