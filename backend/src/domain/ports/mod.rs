//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`EnrollmentStore`, `EnrollmentNotifier`, `PasswordVerifier`,
//! the migration and reset ports) are implemented by outbound adapters.
//! Driving ports (`EnrollmentCommand`, `CourseQuery`, `BackendAdmin`,
//! `LoginService`, `DatabaseResetCommand`) are implemented by domain services
//! and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod backend_admin;
mod database_reset_repository;
mod enrollment_command;
mod enrollment_notifier;
mod enrollment_store;
mod login_service;
mod migration;
mod password_verifier;

#[cfg(test)]
pub use backend_admin::MockBackendAdmin;
pub use backend_admin::{BackendAdmin, FixtureBackendAdmin};
#[cfg(test)]
pub use database_reset_repository::MockDatabaseResetRepository;
pub use database_reset_repository::{
    DatabaseResetError, DatabaseResetRepository, FixtureDatabaseResetRepository,
};
#[cfg(test)]
pub use enrollment_command::{MockCourseQuery, MockEnrollmentCommand};
pub use enrollment_command::{
    CourseOverview, CourseQuery, EnrollmentCommand, EnrollmentReceipt, FixtureEnrollmentCommand,
};
#[cfg(test)]
pub use enrollment_notifier::MockEnrollmentNotifier;
pub use enrollment_notifier::{
    EnrollmentNotifier, FixtureEnrollmentNotifier, NotificationError,
};
#[cfg(test)]
pub use enrollment_store::MockEnrollmentStore;
pub use enrollment_store::{EnrollmentStore, EnrollmentStoreError, FixtureEnrollmentStore};
#[cfg(test)]
pub use login_service::{MockDatabaseResetCommand, MockLoginService};
pub use login_service::{AuthenticatedUser, DatabaseResetCommand, LoginService};
#[cfg(test)]
pub use migration::{MockDocumentImport, MockRelationalSnapshotSource};
pub use migration::{
    DocumentImport, FixtureRelationalSnapshotSource, MigrationError, RelationalSnapshotSource,
};
#[cfg(test)]
pub use password_verifier::MockPasswordVerifier;
pub use password_verifier::{PasswordVerifier, PlaintextPasswordVerifier};
