//! Backend switching and relational-to-document migration.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    BackendAdmin, DocumentImport, MigrationError, RelationalSnapshotSource,
};
use crate::domain::{BackendSelector, Error, MigrationStats, StorageBackend};

/// Service implementing [`BackendAdmin`].
#[derive(Clone)]
pub struct BackendAdminService {
    selector: Arc<BackendSelector>,
    source: Arc<dyn RelationalSnapshotSource>,
    target: Arc<dyn DocumentImport>,
}

impl BackendAdminService {
    /// Create the service over the shared selector and migration adapters.
    pub fn new(
        selector: Arc<BackendSelector>,
        source: Arc<dyn RelationalSnapshotSource>,
        target: Arc<dyn DocumentImport>,
    ) -> Self {
        Self {
            selector,
            source,
            target,
        }
    }

    fn map_migration_error(error: MigrationError) -> Error {
        match error {
            MigrationError::Connection { message } => {
                Error::service_unavailable(format!("migration store unavailable: {message}"))
            }
            other @ (MigrationError::Source { .. } | MigrationError::Target { .. }) => {
                Error::internal(other.to_string())
            }
        }
    }
}

#[async_trait]
impl BackendAdmin for BackendAdminService {
    fn current(&self) -> StorageBackend {
        self.selector.current()
    }

    async fn switch_to(&self, backend: StorageBackend) -> Result<StorageBackend, Error> {
        let previous = self.selector.switch_to(backend);
        info!(from = %previous, to = %backend, "storage backend switched");
        Ok(backend)
    }

    /// Copy every relational entity into the document store.
    ///
    /// Not incremental: the document collections are cleared first, so a
    /// re-run replaces rather than duplicates.
    async fn migrate(&self) -> Result<MigrationStats, Error> {
        let snapshot = self
            .source
            .load_snapshot()
            .await
            .map_err(Self::map_migration_error)?;
        let stats = self
            .target
            .replace_all(&snapshot)
            .await
            .map_err(Self::map_migration_error)?;
        info!(
            departments = stats.departments,
            students = stats.students,
            professors = stats.professors,
            courses = stats.courses,
            enrollments = stats.enrollments,
            "relational data migrated to document store"
        );
        Ok(stats)
    }
}
