//! Enrollment orchestration over the active storage backend.
//!
//! The service serialises check-then-write sequences per course with
//! [`CourseLocks`], delegates the write to whichever [`EnrollmentStore`] the
//! selector points at, and sends the confirmation afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    CourseOverview, CourseQuery, EnrollmentCommand, EnrollmentNotifier, EnrollmentReceipt,
    EnrollmentStore, EnrollmentStoreError,
};
use crate::domain::{
    Course, CourseGuard, CourseId, CourseLocks, EnrollmentError, EnrollmentId, EnrollmentRecord,
    Error, Grade, LockTimeout, StorageBackend, StoreRouter, StudentId, StudentProfile,
};

/// How a failed confirmation affects the enrollment outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationPolicy {
    /// Failures are logged; the enrollment stands.
    #[default]
    BestEffort,
    /// On the relational backend a failure undoes the enrollment and is
    /// reported to the caller; the document backend stays best-effort.
    StrictOnRelational,
}

impl NotificationPolicy {
    const fn is_fatal(self, backend: StorageBackend) -> bool {
        matches!(
            (self, backend),
            (Self::StrictOnRelational, StorageBackend::Relational)
        )
    }
}

/// Enrollment service implementing [`EnrollmentCommand`] and [`CourseQuery`].
#[derive(Clone)]
pub struct EnrollmentService {
    stores: StoreRouter,
    notifier: Arc<dyn EnrollmentNotifier>,
    locks: Arc<CourseLocks>,
    policy: NotificationPolicy,
}

impl EnrollmentService {
    /// Create a service over the routed stores.
    pub fn new(
        stores: StoreRouter,
        notifier: Arc<dyn EnrollmentNotifier>,
        locks: Arc<CourseLocks>,
    ) -> Self {
        Self {
            stores,
            notifier,
            locks,
            policy: NotificationPolicy::default(),
        }
    }

    /// Replace the notification policy.
    #[must_use]
    pub fn with_notification_policy(mut self, policy: NotificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn storage_error(backend: StorageBackend) -> impl Fn(EnrollmentStoreError) -> EnrollmentError {
        move |error| match error {
            EnrollmentStoreError::Connection { message } => EnrollmentError::StorageFailure {
                backend,
                message,
                unavailable: true,
            },
            EnrollmentStoreError::Query { message } => EnrollmentError::StorageFailure {
                backend,
                message,
                unavailable: false,
            },
            EnrollmentStoreError::DuplicateEnrollment {
                student_id,
                course_id,
            } => EnrollmentError::DuplicateEnrollment {
                student_id,
                course_id,
            },
            EnrollmentStoreError::CapacityExceeded { course_id } => {
                EnrollmentError::CapacityExceeded(course_id)
            }
            EnrollmentStoreError::CourseNotFound { course_id } => {
                EnrollmentError::CourseNotFound(course_id)
            }
            EnrollmentStoreError::StudentNotFound { student_id } => {
                EnrollmentError::StudentNotFound(student_id)
            }
            EnrollmentStoreError::EnrollmentNotFound { enrollment_id } => {
                EnrollmentError::EnrollmentNotFound(enrollment_id)
            }
        }
    }

    async fn lock(&self, course_id: CourseId) -> Result<CourseGuard, EnrollmentError> {
        self.locks
            .acquire(course_id)
            .await
            .map_err(|LockTimeout(id)| EnrollmentError::LockTimeout(id))
    }

    /// Identifier as presented by `backend`.
    ///
    /// # Examples
    /// ```
    /// use registrar::domain::{EnrollmentId, EnrollmentService, StorageBackend};
    ///
    /// let id = EnrollmentId::new(12).unwrap();
    /// assert_eq!(EnrollmentService::external_id(StorageBackend::Relational, id), "12");
    /// assert_eq!(EnrollmentService::external_id(StorageBackend::Document, id), "ENR00012");
    /// ```
    pub fn external_id(backend: StorageBackend, id: EnrollmentId) -> String {
        match backend {
            StorageBackend::Relational => id.to_string(),
            StorageBackend::Document => id.to_opaque(),
        }
    }

    /// Enroll `student_id` in `course_id`.
    ///
    /// The duplicate check, course lookup and capacity check run under the
    /// course lock, in that order, before the store writes anything.
    pub async fn enroll_student(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<EnrollmentReceipt, EnrollmentError> {
        let (backend, store) = self.stores.active();
        let map_err = Self::storage_error(backend);
        let guard = self.lock(course_id).await?;

        if store
            .enrollment_exists(student_id, course_id)
            .await
            .map_err(&map_err)?
        {
            return Err(EnrollmentError::DuplicateEnrollment {
                student_id,
                course_id,
            });
        }
        let course = store
            .find_course_by_id(course_id)
            .await
            .map_err(&map_err)?
            .ok_or(EnrollmentError::CourseNotFound(course_id))?;
        let enrolled = store.count_enrollments(course_id).await.map_err(&map_err)?;
        if !course.has_capacity(enrolled) {
            return Err(EnrollmentError::CapacityExceeded(course_id));
        }
        let student = store
            .find_student(student_id)
            .await
            .map_err(&map_err)?
            .ok_or(EnrollmentError::StudentNotFound(student_id))?;

        let enrollment = store
            .create_enrollment(student_id, course_id)
            .await
            .map_err(&map_err)?;
        info!(
            student_id = %student_id,
            course_id = %course_id,
            enrollment_id = %enrollment.id,
            backend = %backend,
            "enrollment created"
        );

        if self.policy.is_fatal(backend) {
            self.notify_or_undo(store, &student, &course, &enrollment)
                .await?;
            drop(guard);
        } else {
            drop(guard);
            self.notify_best_effort(backend, &student, &course).await;
        }

        Ok(EnrollmentReceipt {
            external_id: Self::external_id(backend, enrollment.id),
            enrollment,
            backend,
        })
    }

    async fn notify_best_effort(
        &self,
        backend: StorageBackend,
        student: &StudentProfile,
        course: &Course,
    ) {
        if let Err(error) = self
            .notifier
            .send_enrollment_confirmation(&student.email, &student.name, course.name())
            .await
        {
            warn!(
                student_id = %student.id,
                course_id = %course.id(),
                backend = %backend,
                %error,
                "enrollment confirmation failed"
            );
        }
    }

    async fn notify_or_undo(
        &self,
        store: &dyn EnrollmentStore,
        student: &StudentProfile,
        course: &Course,
        enrollment: &EnrollmentRecord,
    ) -> Result<(), EnrollmentError> {
        let Err(error) = self
            .notifier
            .send_enrollment_confirmation(&student.email, &student.name, course.name())
            .await
        else {
            return Ok(());
        };
        warn!(
            student_id = %student.id,
            course_id = %course.id(),
            enrollment_id = %enrollment.id,
            %error,
            "enrollment confirmation failed; undoing enrollment"
        );
        store
            .drop_enrollment(enrollment.id)
            .await
            .map_err(Self::storage_error(StorageBackend::Relational))?;
        Err(EnrollmentError::NotificationFailure(error.to_string()))
    }

    /// Drop an enrollment and return the removed record.
    pub async fn drop_by_id(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<EnrollmentRecord, EnrollmentError> {
        let (backend, store) = self.stores.active();
        let map_err = Self::storage_error(backend);
        let enrollment = store
            .find_enrollment(enrollment_id)
            .await
            .map_err(&map_err)?
            .ok_or(EnrollmentError::EnrollmentNotFound(enrollment_id))?;
        let _guard = self.lock(enrollment.course_id).await?;
        store
            .drop_enrollment(enrollment_id)
            .await
            .map_err(&map_err)?;
        info!(
            enrollment_id = %enrollment_id,
            course_id = %enrollment.course_id,
            backend = %backend,
            "enrollment dropped"
        );
        Ok(enrollment)
    }

    /// Overwrite the grade on an enrollment; no transition rules apply.
    pub async fn grade(
        &self,
        enrollment_id: EnrollmentId,
        grade: Option<Grade>,
    ) -> Result<(), EnrollmentError> {
        let (backend, store) = self.stores.active();
        store
            .record_grade(enrollment_id, grade)
            .await
            .map_err(Self::storage_error(backend))?;
        info!(
            enrollment_id = %enrollment_id,
            grade = grade.map_or("none", Grade::as_str),
            backend = %backend,
            "grade recorded"
        );
        Ok(())
    }

    /// Delete a course with its enrollments and teaching links.
    pub async fn remove_course(&self, course_id: CourseId) -> Result<(), EnrollmentError> {
        let (backend, store) = self.stores.active();
        let guard = self.lock(course_id).await?;
        store
            .delete_course(course_id)
            .await
            .map_err(Self::storage_error(backend))?;
        drop(guard);
        info!(course_id = %course_id, backend = %backend, "course deleted");
        Ok(())
    }

    /// Load a course with its live enrollment count.
    pub async fn overview(&self, course_id: CourseId) -> Result<CourseOverview, EnrollmentError> {
        let (backend, store) = self.stores.active();
        let map_err = Self::storage_error(backend);
        let course = store
            .find_course_by_id(course_id)
            .await
            .map_err(&map_err)?
            .ok_or(EnrollmentError::CourseNotFound(course_id))?;
        let enrolled = store.count_enrollments(course_id).await.map_err(&map_err)?;
        Ok(CourseOverview {
            course,
            enrolled,
            backend,
        })
    }
}

#[async_trait]
impl EnrollmentCommand for EnrollmentService {
    async fn enroll(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<EnrollmentReceipt, Error> {
        self.enroll_student(student_id, course_id)
            .await
            .map_err(Error::from)
    }

    async fn drop_enrollment(&self, enrollment_id: EnrollmentId) -> Result<(), Error> {
        self.drop_by_id(enrollment_id)
            .await
            .map(|_| ())
            .map_err(Error::from)
    }

    async fn record_grade(
        &self,
        enrollment_id: EnrollmentId,
        grade: Option<Grade>,
    ) -> Result<(), Error> {
        self.grade(enrollment_id, grade).await.map_err(Error::from)
    }

    async fn delete_course(&self, course_id: CourseId) -> Result<(), Error> {
        self.remove_course(course_id).await.map_err(Error::from)
    }
}

#[async_trait]
impl CourseQuery for EnrollmentService {
    async fn get_course(&self, course_id: CourseId) -> Result<CourseOverview, Error> {
        self.overview(course_id).await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "enrollment_service_tests.rs"]
mod tests;
