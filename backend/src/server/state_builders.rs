//! Builders wiring adapters into services and HTTP state ports.

use std::sync::Arc;

use actix_web::web;

use registrar::domain::ports::{
    DatabaseResetRepository, DocumentImport, EnrollmentStore, FixtureDatabaseResetRepository,
    FixtureEnrollmentStore, FixtureRelationalSnapshotSource, PlaintextPasswordVerifier,
    RelationalSnapshotSource,
};
use registrar::domain::{
    BackendAdminService, BackendSelector, CourseLocks, DatabaseResetService, EnrollmentService,
    StoreLoginService, StoreRouter,
};
use registrar::inbound::http::state::{HttpState, HttpStatePorts};
use registrar::outbound::document::{DocumentEnrollmentStore, DocumentImporter};
use registrar::outbound::persistence::{
    DbPool, DieselDatabaseReset, DieselEnrollmentStore, DieselSnapshotSource,
};

use super::ServerConfig;

/// Adapters backed by PostgreSQL, or fixtures when no pool is configured.
struct RelationalAdapters {
    store: Arc<dyn EnrollmentStore>,
    snapshots: Arc<dyn RelationalSnapshotSource>,
    reset: Arc<dyn DatabaseResetRepository>,
}

impl RelationalAdapters {
    fn from_pool(pool: Option<&DbPool>) -> Self {
        match pool {
            Some(pool) => Self {
                store: Arc::new(DieselEnrollmentStore::new(pool.clone())),
                snapshots: Arc::new(DieselSnapshotSource::new(pool.clone())),
                reset: Arc::new(DieselDatabaseReset::new(pool.clone())),
            },
            None => Self {
                store: Arc::new(FixtureEnrollmentStore),
                snapshots: Arc::new(FixtureRelationalSnapshotSource),
                reset: Arc::new(FixtureDatabaseResetRepository),
            },
        }
    }
}

/// Build the HTTP state shared by every worker.
///
/// One selector instance backs the router, the login service and the admin
/// service so a switch is observed by all of them.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let relational = RelationalAdapters::from_pool(config.db_pool.as_ref());
    let document: Arc<dyn EnrollmentStore> =
        Arc::new(DocumentEnrollmentStore::new(config.collections.clone()));
    let importer: Arc<dyn DocumentImport> =
        Arc::new(DocumentImporter::new(config.collections.clone()));

    let selector = Arc::new(BackendSelector::new(config.initial_backend));
    let stores = StoreRouter::new(selector.clone(), relational.store, document);

    let enrollments = Arc::new(
        EnrollmentService::new(
            stores.clone(),
            config.notifier.clone(),
            Arc::new(CourseLocks::new(config.lock_timeout)),
        )
        .with_notification_policy(config.notification_policy),
    );

    web::Data::new(HttpState::new(HttpStatePorts {
        enrollments: enrollments.clone(),
        courses: enrollments,
        admin: Arc::new(BackendAdminService::new(
            selector,
            relational.snapshots,
            importer,
        )),
        login: Arc::new(StoreLoginService::new(
            stores,
            Arc::new(PlaintextPasswordVerifier),
        )),
        reset: Arc::new(DatabaseResetService::new(relational.reset)),
    }))
}
