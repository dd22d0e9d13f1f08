//! Port shared by the relational and document storage adapters.
//!
//! Both adapters expose the same logical operations. `create_enrollment`,
//! `drop_enrollment`, `record_grade` and `delete_course` carry every side
//! effect of the operation, including seat counters and, for the document
//! adapter, the denormalised caches, so callers stay storage-agnostic.

use async_trait::async_trait;

use crate::domain::{
    Course, CourseId, EnrollmentId, EnrollmentRecord, Grade, StudentId, StudentProfile,
    UserAccount,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by enrollment store adapters.
    pub enum EnrollmentStoreError {
        /// The store could not be reached.
        Connection { message: String } =>
            "enrollment store connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } =>
            "enrollment store query failed: {message}",
        /// The (student, course) pair already has an enrollment.
        DuplicateEnrollment { student_id: StudentId, course_id: CourseId } =>
            "student {student_id} already enrolled in course {course_id}",
        /// The course had no seat left when the write was attempted.
        CapacityExceeded { course_id: CourseId } =>
            "course {course_id} has no seats available",
        /// The course does not exist.
        CourseNotFound { course_id: CourseId } =>
            "course {course_id} not found",
        /// The student does not exist.
        StudentNotFound { student_id: StudentId } =>
            "student {student_id} not found",
        /// The enrollment does not exist.
        EnrollmentNotFound { enrollment_id: EnrollmentId } =>
            "enrollment {enrollment_id} not found",
    }
}

/// Storage capability used by the enrollment service.
///
/// # Atomicity
///
/// `create_enrollment` re-checks the duplicate and capacity rules before its
/// first write. The relational adapter runs the whole operation in one
/// transaction; the document adapter performs every read before any write
/// and offers no rollback once writing has started.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Resolve an account by email across students and professors.
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, EnrollmentStoreError>;

    /// Load the student's contact details.
    async fn find_student(
        &self,
        student_id: StudentId,
    ) -> Result<Option<StudentProfile>, EnrollmentStoreError>;

    /// Load a course with its seat counters.
    async fn find_course_by_id(
        &self,
        course_id: CourseId,
    ) -> Result<Option<Course>, EnrollmentStoreError>;

    /// Number of enrollments referencing the course.
    async fn count_enrollments(&self, course_id: CourseId) -> Result<i64, EnrollmentStoreError>;

    /// Whether the (student, course) pair is already enrolled.
    async fn enrollment_exists(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<bool, EnrollmentStoreError>;

    /// Load a single enrollment.
    async fn find_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<EnrollmentRecord>, EnrollmentStoreError>;

    /// Persist an enrollment and take one seat.
    async fn create_enrollment(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<EnrollmentRecord, EnrollmentStoreError>;

    /// Remove an enrollment and give its seat back.
    async fn drop_enrollment(&self, enrollment_id: EnrollmentId)
    -> Result<(), EnrollmentStoreError>;

    /// Overwrite the enrollment's grade; `None` clears it.
    async fn record_grade(
        &self,
        enrollment_id: EnrollmentId,
        grade: Option<Grade>,
    ) -> Result<(), EnrollmentStoreError>;

    /// Remove a course together with its enrollments and teaching links.
    async fn delete_course(&self, course_id: CourseId) -> Result<(), EnrollmentStoreError>;
}

/// Store holding no data, used when no database is configured.
///
/// Lookups return nothing and mutations report the missing entity.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEnrollmentStore;

#[async_trait]
impl EnrollmentStore for FixtureEnrollmentStore {
    async fn find_user_by_email(
        &self,
        _email: &str,
    ) -> Result<Option<UserAccount>, EnrollmentStoreError> {
        Ok(None)
    }

    async fn find_student(
        &self,
        _student_id: StudentId,
    ) -> Result<Option<StudentProfile>, EnrollmentStoreError> {
        Ok(None)
    }

    async fn find_course_by_id(
        &self,
        _course_id: CourseId,
    ) -> Result<Option<Course>, EnrollmentStoreError> {
        Ok(None)
    }

    async fn count_enrollments(&self, _course_id: CourseId) -> Result<i64, EnrollmentStoreError> {
        Ok(0)
    }

    async fn enrollment_exists(
        &self,
        _student_id: StudentId,
        _course_id: CourseId,
    ) -> Result<bool, EnrollmentStoreError> {
        Ok(false)
    }

    async fn find_enrollment(
        &self,
        _enrollment_id: EnrollmentId,
    ) -> Result<Option<EnrollmentRecord>, EnrollmentStoreError> {
        Ok(None)
    }

    async fn create_enrollment(
        &self,
        _student_id: StudentId,
        course_id: CourseId,
    ) -> Result<EnrollmentRecord, EnrollmentStoreError> {
        Err(EnrollmentStoreError::course_not_found(course_id))
    }

    async fn drop_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<(), EnrollmentStoreError> {
        Err(EnrollmentStoreError::enrollment_not_found(enrollment_id))
    }

    async fn record_grade(
        &self,
        enrollment_id: EnrollmentId,
        _grade: Option<Grade>,
    ) -> Result<(), EnrollmentStoreError> {
        Err(EnrollmentStoreError::enrollment_not_found(enrollment_id))
    }

    async fn delete_course(&self, course_id: CourseId) -> Result<(), EnrollmentStoreError> {
        Err(EnrollmentStoreError::course_not_found(course_id))
    }
}
