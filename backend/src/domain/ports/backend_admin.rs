//! Driving port for switching and migrating storage backends.

use async_trait::async_trait;

use crate::domain::{BackendSelector, Error, MigrationStats, StorageBackend};

/// Administrative use-cases over the storage backends.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendAdmin: Send + Sync {
    /// Backend consulted by the next operation.
    fn current(&self) -> StorageBackend;

    /// Point subsequent operations at `backend`.
    async fn switch_to(&self, backend: StorageBackend) -> Result<StorageBackend, Error>;

    /// Copy the relational store into the document store.
    async fn migrate(&self) -> Result<MigrationStats, Error>;
}

/// Admin double that switches an in-memory selector and migrates nothing.
#[derive(Debug, Default)]
pub struct FixtureBackendAdmin {
    selector: BackendSelector,
}

#[async_trait]
impl BackendAdmin for FixtureBackendAdmin {
    fn current(&self) -> StorageBackend {
        self.selector.current()
    }

    async fn switch_to(&self, backend: StorageBackend) -> Result<StorageBackend, Error> {
        self.selector.switch_to(backend);
        Ok(backend)
    }

    async fn migrate(&self) -> Result<MigrationStats, Error> {
        Ok(MigrationStats::default())
    }
}
