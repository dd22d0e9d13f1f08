//! Driving ports for enrollment mutations and course reads.

use async_trait::async_trait;

use crate::domain::{
    Course, CourseId, EnrollmentId, EnrollmentRecord, Error, Grade, StorageBackend, StudentId,
};

/// Outcome of a successful enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentReceipt {
    /// Stored enrollment.
    pub enrollment: EnrollmentRecord,
    /// Identifier as the active backend presents it.
    pub external_id: String,
    /// Backend that handled the request.
    pub backend: StorageBackend,
}

/// Course together with its live enrollment count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOverview {
    /// Course and seat counters.
    pub course: Course,
    /// Enrollments referencing the course.
    pub enrolled: i64,
    /// Backend that answered.
    pub backend: StorageBackend,
}

/// Enrollment use-cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentCommand: Send + Sync {
    /// Enroll a student, taking one seat.
    async fn enroll(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<EnrollmentReceipt, Error>;

    /// Drop an enrollment, giving its seat back.
    async fn drop_enrollment(&self, enrollment_id: EnrollmentId) -> Result<(), Error>;

    /// Overwrite the grade on an enrollment.
    async fn record_grade(
        &self,
        enrollment_id: EnrollmentId,
        grade: Option<Grade>,
    ) -> Result<(), Error>;

    /// Delete a course and everything referencing it.
    async fn delete_course(&self, course_id: CourseId) -> Result<(), Error>;
}

/// Course reads exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseQuery: Send + Sync {
    /// Load a course with its seat counters.
    async fn get_course(&self, course_id: CourseId) -> Result<CourseOverview, Error>;
}

/// Command double that finds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEnrollmentCommand;

#[async_trait]
impl EnrollmentCommand for FixtureEnrollmentCommand {
    async fn enroll(
        &self,
        _student_id: StudentId,
        _course_id: CourseId,
    ) -> Result<EnrollmentReceipt, Error> {
        Err(Error::not_found("Course not found"))
    }

    async fn drop_enrollment(&self, _enrollment_id: EnrollmentId) -> Result<(), Error> {
        Err(Error::not_found("Enrollment not found"))
    }

    async fn record_grade(
        &self,
        _enrollment_id: EnrollmentId,
        _grade: Option<Grade>,
    ) -> Result<(), Error> {
        Err(Error::not_found("Enrollment not found"))
    }

    async fn delete_course(&self, _course_id: CourseId) -> Result<(), Error> {
        Err(Error::not_found("Course not found"))
    }
}

#[async_trait]
impl CourseQuery for FixtureEnrollmentCommand {
    async fn get_course(&self, _course_id: CourseId) -> Result<CourseOverview, Error> {
        Err(Error::not_found("Course not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_command_reports_missing_entities() {
        let command = FixtureEnrollmentCommand;
        let err = command
            .enroll(
                StudentId::new(1).expect("positive"),
                CourseId::new(1).expect("positive"),
            )
            .await
            .expect_err("nothing to enroll in");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
