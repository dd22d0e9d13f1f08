//! Failure taxonomy for enrollment operations.

use serde_json::json;

use super::Error;
use super::backend_selector::StorageBackend;
use super::identifier::{CourseId, EnrollmentId, StudentId};

/// Errors surfaced by the enrollment service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentError {
    /// The student already holds an enrollment for the course.
    #[error("student {student_id} is already enrolled in course {course_id}")]
    DuplicateEnrollment {
        /// Student key.
        student_id: StudentId,
        /// Course key.
        course_id: CourseId,
    },
    /// The course does not exist.
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    /// The student does not exist.
    #[error("student {0} not found")]
    StudentNotFound(StudentId),
    /// No seat is left in the course.
    #[error("no seats available in course {0}")]
    CapacityExceeded(CourseId),
    /// The enrollment does not exist.
    #[error("enrollment {0} not found")]
    EnrollmentNotFound(EnrollmentId),
    /// The active storage adapter failed.
    #[error("{backend} storage failed: {message}")]
    StorageFailure {
        /// Adapter that failed.
        backend: StorageBackend,
        /// Adapter error text.
        message: String,
        /// The adapter could not be reached at all.
        unavailable: bool,
    },
    /// The confirmation could not be delivered and the policy made it fatal.
    #[error("enrollment confirmation failed: {0}")]
    NotificationFailure(String),
    /// The per-course lock was not acquired in time.
    #[error("timed out waiting for course {0}")]
    LockTimeout(CourseId),
}

impl From<EnrollmentError> for Error {
    fn from(value: EnrollmentError) -> Self {
        match value {
            EnrollmentError::DuplicateEnrollment { .. } => {
                Error::invalid_request("Student is already enrolled in this course")
                    .with_details(json!({ "code": "duplicate_enrollment" }))
            }
            EnrollmentError::CapacityExceeded(_) => {
                Error::invalid_request("No seats available in this course")
                    .with_details(json!({ "code": "capacity_exceeded" }))
            }
            EnrollmentError::CourseNotFound(_) => Error::not_found("Course not found"),
            EnrollmentError::StudentNotFound(_) => Error::not_found("Student not found"),
            EnrollmentError::EnrollmentNotFound(_) => Error::not_found("Enrollment not found"),
            EnrollmentError::StorageFailure {
                backend,
                message,
                unavailable: true,
            } => Error::service_unavailable(format!("{backend} store unavailable: {message}")),
            error @ (EnrollmentError::StorageFailure { .. }
            | EnrollmentError::NotificationFailure(_)) => Error::internal(error.to_string()),
            EnrollmentError::LockTimeout(_) => {
                Error::service_unavailable("Course is busy, try again")
            }
        }
    }
}
