//! Database reset: generate seed data and hand it to the reset adapter.

use std::sync::Arc;

use async_trait::async_trait;
use seed_data::{DatasetPlan, generate_university};
use tracing::info;

use crate::domain::ports::{DatabaseResetCommand, DatabaseResetError, DatabaseResetRepository};
use crate::domain::{Error, SeedSummary};

/// Service implementing [`DatabaseResetCommand`].
#[derive(Clone)]
pub struct DatabaseResetService {
    repository: Arc<dyn DatabaseResetRepository>,
    plan: DatasetPlan,
}

impl DatabaseResetService {
    /// Create a service seeding with the default plan.
    pub fn new(repository: Arc<dyn DatabaseResetRepository>) -> Self {
        Self {
            repository,
            plan: DatasetPlan::default(),
        }
    }

    /// Replace the dataset plan.
    #[must_use]
    pub fn with_plan(mut self, plan: DatasetPlan) -> Self {
        self.plan = plan;
        self
    }

    fn map_reset_error(error: DatabaseResetError) -> Error {
        match error {
            DatabaseResetError::Connection { message } => {
                Error::service_unavailable(format!("database unavailable: {message}"))
            }
            DatabaseResetError::Query { message } => {
                Error::internal(format!("database reset failed: {message}"))
            }
        }
    }
}

#[async_trait]
impl DatabaseResetCommand for DatabaseResetService {
    async fn reset(&self) -> Result<SeedSummary, Error> {
        let dataset = generate_university(&self.plan)
            .map_err(|err| Error::internal(format!("seed generation failed: {err}")))?;
        let summary = self
            .repository
            .reset(&dataset)
            .await
            .map_err(Self::map_reset_error)?;
        info!(
            seed = self.plan.seed(),
            departments = summary.departments,
            professors = summary.professors,
            students = summary.students,
            courses = summary.courses,
            enrollments = summary.enrollments,
            "database reset"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{FixtureDatabaseResetRepository, MockDatabaseResetRepository};

    #[tokio::test]
    async fn reset_reports_generated_counts() {
        let service = DatabaseResetService::new(Arc::new(FixtureDatabaseResetRepository));

        let summary = service.reset().await.expect("reset");

        assert_eq!(summary.departments, 8);
        assert_eq!(summary.students, 100);
        assert_eq!(summary.professors, 16);
    }

    #[tokio::test]
    async fn reset_uses_configured_plan() {
        let mut repository = MockDatabaseResetRepository::new();
        repository
            .expect_reset()
            .withf(|dataset| dataset.students.len() == 12 && dataset.courses.len() == 4)
            .times(1)
            .returning(|dataset| Ok(SeedSummary::of(dataset)));
        let service = DatabaseResetService::new(Arc::new(repository)).with_plan(
            DatasetPlan::default()
                .with_students(12)
                .with_courses(4)
                .with_enrollment_attempts(10),
        );

        let summary = service.reset().await.expect("reset");

        assert_eq!(summary.students, 12);
    }

    #[tokio::test]
    async fn invalid_plans_fail_before_touching_the_database() {
        let mut repository = MockDatabaseResetRepository::new();
        repository.expect_reset().never();
        let service = DatabaseResetService::new(Arc::new(repository))
            .with_plan(DatasetPlan::default().with_courses(0));

        let err = service.reset().await.expect_err("invalid plan");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn connection_failures_are_unavailable() {
        let mut repository = MockDatabaseResetRepository::new();
        repository
            .expect_reset()
            .returning(|_| Err(DatabaseResetError::connection("refused")));
        let service = DatabaseResetService::new(Arc::new(repository));

        let err = service.reset().await.expect_err("db down");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
