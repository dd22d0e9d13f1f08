//! Port for wiping the relational store and loading a generated dataset.

use async_trait::async_trait;
use seed_data::UniversityDataset;

use crate::domain::SeedSummary;

use super::define_port_error;

define_port_error! {
    /// Errors raised by database reset adapters.
    pub enum DatabaseResetError {
        /// The database could not be reached.
        Connection { message: String } =>
            "database reset connection failed: {message}",
        /// A statement failed; the reset was rolled back.
        Query { message: String } =>
            "database reset failed: {message}",
    }
}

/// Replaces every relational row with the dataset.
///
/// Implementations must be all-or-nothing: on error the previous data stays.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatabaseResetRepository: Send + Sync {
    /// Wipe the store and insert `dataset`.
    async fn reset(&self, dataset: &UniversityDataset) -> Result<SeedSummary, DatabaseResetError>;
}

/// Reset adapter that writes nothing and reports the dataset's sizes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDatabaseResetRepository;

#[async_trait]
impl DatabaseResetRepository for FixtureDatabaseResetRepository {
    async fn reset(&self, dataset: &UniversityDataset) -> Result<SeedSummary, DatabaseResetError> {
        Ok(SeedSummary::of(dataset))
    }
}
