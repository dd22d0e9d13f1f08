//! Routes store calls to whichever backend the selector points at.

use std::sync::Arc;

use super::backend_selector::{BackendSelector, StorageBackend};
use super::ports::EnrollmentStore;

/// Both storage adapters plus the selector choosing between them.
#[derive(Clone)]
pub struct StoreRouter {
    selector: Arc<BackendSelector>,
    relational: Arc<dyn EnrollmentStore>,
    document: Arc<dyn EnrollmentStore>,
}

impl StoreRouter {
    /// Bundle the adapters with a shared selector.
    pub fn new(
        selector: Arc<BackendSelector>,
        relational: Arc<dyn EnrollmentStore>,
        document: Arc<dyn EnrollmentStore>,
    ) -> Self {
        Self {
            selector,
            relational,
            document,
        }
    }

    /// Shared selector.
    pub fn selector(&self) -> &Arc<BackendSelector> {
        &self.selector
    }

    /// Adapter for `backend`.
    pub fn store(&self, backend: StorageBackend) -> &dyn EnrollmentStore {
        match backend {
            StorageBackend::Relational => self.relational.as_ref(),
            StorageBackend::Document => self.document.as_ref(),
        }
    }

    /// Snapshot of the active backend and its adapter.
    ///
    /// Callers use the returned pair for the whole operation so a concurrent
    /// switch cannot split one request across stores.
    pub fn active(&self) -> (StorageBackend, &dyn EnrollmentStore) {
        let backend = self.selector.current();
        (backend, self.store(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CourseId;
    use crate::domain::ports::{FixtureEnrollmentStore, MockEnrollmentStore};

    #[tokio::test]
    async fn follows_selector_switches() {
        let mut document = MockEnrollmentStore::new();
        document
            .expect_count_enrollments()
            .times(1)
            .return_once(|_| Ok(7));
        let selector = Arc::new(BackendSelector::new(StorageBackend::Relational));
        let router = StoreRouter::new(
            Arc::clone(&selector),
            Arc::new(FixtureEnrollmentStore),
            Arc::new(document),
        );
        let course = CourseId::new(1).expect("positive");

        let (backend, store) = router.active();
        assert_eq!(backend, StorageBackend::Relational);
        assert_eq!(store.count_enrollments(course).await.expect("count"), 0);

        selector.switch_to(StorageBackend::Document);
        let (backend, store) = router.active();
        assert_eq!(backend, StorageBackend::Document);
        assert_eq!(store.count_enrollments(course).await.expect("count"), 7);
    }
}
