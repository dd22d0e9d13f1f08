//! PostgreSQL persistence adapters using Diesel.
//!
//! The relational store is the source of truth for the university. Adapters
//! here implement the storage ports on top of `diesel-async` with `bb8`
//! pooling:
//!
//! - [`DieselEnrollmentStore`]: the relational [`EnrollmentStore`], with
//!   row-locked transactional enrollment writes.
//! - [`DieselSnapshotSource`]: consistent full read for the document
//!   migration.
//! - [`DieselDatabaseReset`]: truncate-and-seed in one transaction.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module.
//!
//! [`EnrollmentStore`]: crate::domain::ports::EnrollmentStore

mod diesel_database_reset;
mod diesel_enrollment_store;
mod diesel_error_mapping;
mod diesel_snapshot_source;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_database_reset::DieselDatabaseReset;
pub use diesel_enrollment_store::DieselEnrollmentStore;
pub use diesel_snapshot_source::DieselSnapshotSource;
pub use migrations::{MigrationRunError, run_migrations, run_migrations_async};
pub use pool::{DbPool, PoolConfig, PoolError};
