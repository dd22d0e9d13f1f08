//! Document-backed `EnrollmentStore` adapter.
//!
//! Operations read everything they need before their first write, so a
//! rejected enrollment leaves no trace. The collections offer no
//! multi-document transaction: once writing has started a failure can leave
//! the caches behind the enrollment documents until the next migration
//! rebuilds them. The `(student, course)` pair index is claimed with an
//! insert-if-absent before any other write, which turns a lost duplicate race
//! into a clean rejection.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::ports::{EnrollmentStore, EnrollmentStoreError};
use crate::domain::{
    Course, CourseId, EnrollmentId, EnrollmentRecord, Grade, ProfessorId, StoredPassword,
    StudentId, StudentProfile, UserAccount, UserRef, decrement_seats, increment_seats,
};

use super::collections::{Collection, DocumentCollections, DocumentStoreError};
use super::documents::{
    CourseDocument, EnrolledCourse, EnrollmentDocument, RecentEnrollment, UserDocument, decode,
    encode, pair_key,
};

/// Enrollment store over document collections.
#[derive(Clone)]
pub struct DocumentEnrollmentStore {
    collections: Arc<dyn DocumentCollections>,
}

impl DocumentEnrollmentStore {
    /// Create a store over the given collections.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use registrar::outbound::document::{DocumentEnrollmentStore, InMemoryCollections};
    ///
    /// let store = DocumentEnrollmentStore::new(Arc::new(InMemoryCollections::new()));
    /// # let _ = store;
    /// ```
    pub fn new(collections: Arc<dyn DocumentCollections>) -> Self {
        Self { collections }
    }

    async fn load<T: serde::de::DeserializeOwned>(
        &self,
        collection: Collection,
        key: &str,
    ) -> Result<Option<T>, EnrollmentStoreError> {
        self.collections
            .get(collection, key)
            .await
            .map_err(map_document_error)?
            .map(|raw| decode(&raw))
            .transpose()
            .map_err(map_document_error)
    }

    async fn save<T: serde::Serialize>(
        &self,
        collection: Collection,
        key: &str,
        document: &T,
    ) -> Result<(), EnrollmentStoreError> {
        let raw = encode(document).map_err(map_document_error)?;
        self.collections
            .put(collection, key, raw)
            .await
            .map_err(map_document_error)
    }

    async fn load_course(
        &self,
        course_id: CourseId,
    ) -> Result<Option<CourseDocument>, EnrollmentStoreError> {
        self.load(Collection::Courses, &course_id.to_opaque()).await
    }

    async fn load_user(&self, user_id: &str) -> Result<Option<UserDocument>, EnrollmentStoreError> {
        self.load(Collection::Users, user_id).await
    }

    async fn load_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<EnrollmentDocument>, EnrollmentStoreError> {
        self.load(Collection::Enrollments, &enrollment_id.to_opaque())
            .await
    }

    async fn enrollments_for_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<EnrollmentDocument>, EnrollmentStoreError> {
        let opaque = course_id.to_opaque();
        let raw = self
            .collections
            .list(Collection::Enrollments)
            .await
            .map_err(map_document_error)?;
        let mut matching = Vec::new();
        for document in raw {
            let enrollment: EnrollmentDocument =
                decode(&document).map_err(map_document_error)?;
            if enrollment.course_id == opaque {
                matching.push(enrollment);
            }
        }
        Ok(matching)
    }

    /// Remove an enrollment's own documents and the student's cached entry.
    async fn remove_enrollment_documents(
        &self,
        enrollment: &EnrollmentDocument,
        student: Option<UserDocument>,
    ) -> Result<(), EnrollmentStoreError> {
        self.collections
            .delete(Collection::Enrollments, &enrollment.enrollment_id)
            .await
            .map_err(map_document_error)?;
        self.collections
            .delete(
                Collection::EnrollmentPairs,
                &format!("{}:{}", enrollment.student_id, enrollment.course_id),
            )
            .await
            .map_err(map_document_error)?;

        if let Some(mut student) = student {
            if student.remove_course(&enrollment.enrollment_id) {
                self.save(Collection::Users, &student.user_id, &student)
                    .await?;
            } else {
                warn!(
                    enrollment_id = %enrollment.enrollment_id,
                    student_id = %enrollment.student_id,
                    "student course list had no entry for the removed enrollment"
                );
            }
        }
        Ok(())
    }
}

fn map_document_error(error: DocumentStoreError) -> EnrollmentStoreError {
    match error {
        DocumentStoreError::Connection { message } => EnrollmentStoreError::connection(message),
        DocumentStoreError::Backend { message } | DocumentStoreError::Codec { message } => {
            EnrollmentStoreError::query(message)
        }
    }
}

fn course_from_document(document: &CourseDocument) -> Result<Course, EnrollmentStoreError> {
    document.to_course().map_err(map_document_error)
}

fn account_from_document(document: UserDocument) -> Result<UserAccount, EnrollmentStoreError> {
    let id = if document.role.is_student() {
        StudentId::from_external(&document.user_id).map(UserRef::Student)
    } else {
        ProfessorId::from_external(&document.user_id).map(UserRef::Professor)
    }
    .ok_or_else(|| {
        EnrollmentStoreError::query(format!("malformed user id {:?}", document.user_id))
    })?;
    Ok(UserAccount {
        id,
        name: document.name,
        email: document.email,
        role: document.role,
        password: StoredPassword::new(document.password),
    })
}

#[async_trait]
impl EnrollmentStore for DocumentEnrollmentStore {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, EnrollmentStoreError> {
        let Some(user_id) = self
            .collections
            .get(Collection::UserEmails, email)
            .await
            .map_err(map_document_error)?
        else {
            return Ok(None);
        };
        self.load_user(&user_id)
            .await?
            .map(account_from_document)
            .transpose()
    }

    async fn find_student(
        &self,
        student_id: StudentId,
    ) -> Result<Option<StudentProfile>, EnrollmentStoreError> {
        let user = self.load_user(&student_id.to_opaque()).await?;
        Ok(user
            .filter(|user| user.role.is_student())
            .map(|user| StudentProfile {
                id: student_id,
                name: user.name,
                email: user.email,
            }))
    }

    async fn find_course_by_id(
        &self,
        course_id: CourseId,
    ) -> Result<Option<Course>, EnrollmentStoreError> {
        self.load_course(course_id)
            .await?
            .as_ref()
            .map(course_from_document)
            .transpose()
    }

    async fn count_enrollments(&self, course_id: CourseId) -> Result<i64, EnrollmentStoreError> {
        let count = self.enrollments_for_course(course_id).await?.len();
        i64::try_from(count).map_err(|_| EnrollmentStoreError::query("enrollment count overflow"))
    }

    async fn enrollment_exists(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<bool, EnrollmentStoreError> {
        Ok(self
            .collections
            .get(Collection::EnrollmentPairs, &pair_key(student_id, course_id))
            .await
            .map_err(map_document_error)?
            .is_some())
    }

    async fn find_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<EnrollmentRecord>, EnrollmentStoreError> {
        self.load_enrollment(enrollment_id)
            .await?
            .map(|document| document.to_record().map_err(map_document_error))
            .transpose()
    }

    async fn create_enrollment(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<EnrollmentRecord, EnrollmentStoreError> {
        // Reads first: any rejection below leaves the collections untouched.
        let mut course_document = self
            .load_course(course_id)
            .await?
            .ok_or_else(|| EnrollmentStoreError::course_not_found(course_id))?;
        let course = course_from_document(&course_document)?;
        let mut student = self
            .load_user(&student_id.to_opaque())
            .await?
            .filter(|user| user.role.is_student())
            .ok_or_else(|| EnrollmentStoreError::student_not_found(student_id))?;
        if self.enrollment_exists(student_id, course_id).await? {
            return Err(EnrollmentStoreError::duplicate_enrollment(
                student_id, course_id,
            ));
        }
        let enrolled = self.count_enrollments(course_id).await?;
        if !course.has_capacity(enrolled) {
            return Err(EnrollmentStoreError::capacity_exceeded(course_id));
        }

        let sequence = self
            .collections
            .next_sequence(Collection::Enrollments)
            .await
            .map_err(map_document_error)?;
        let enrollment_id = EnrollmentId::new(sequence)
            .map_err(|err| EnrollmentStoreError::query(err.to_string()))?;
        let record = EnrollmentRecord {
            id: enrollment_id,
            student_id,
            course_id,
            grade: None,
            enrolled_at: Utc::now(),
        };
        let document = EnrollmentDocument::from_record(&record);

        let claimed = self
            .collections
            .insert_new(
                Collection::EnrollmentPairs,
                &pair_key(student_id, course_id),
                document.enrollment_id.clone(),
            )
            .await
            .map_err(map_document_error)?;
        if !claimed {
            return Err(EnrollmentStoreError::duplicate_enrollment(
                student_id, course_id,
            ));
        }

        self.save(Collection::Enrollments, &document.enrollment_id, &document)
            .await?;

        course_document.seats_available = decrement_seats(course_document.seats_available);
        course_document.enrollment_count = course_document.enrollment_count.saturating_add(1);
        course_document.record_recent(RecentEnrollment {
            enrollment_id: document.enrollment_id.clone(),
            student_id: document.student_id.clone(),
            student_name: student.name.clone(),
            enrolled_at: record.enrolled_at,
        });
        self.save(
            Collection::Courses,
            &course_document.course_id,
            &course_document,
        )
        .await?;

        student.push_course(EnrolledCourse {
            enrollment_id: document.enrollment_id.clone(),
            course_id: course_document.course_id.clone(),
            course_name: course_document.name.clone(),
            credits: course_document.credits,
            grade: None,
            enrolled_at: record.enrolled_at,
        });
        self.save(Collection::Users, &student.user_id, &student)
            .await?;

        debug!(enrollment_id = %document.enrollment_id, "enrollment document written");
        Ok(record)
    }

    async fn drop_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<(), EnrollmentStoreError> {
        let enrollment = self
            .load_enrollment(enrollment_id)
            .await?
            .ok_or_else(|| EnrollmentStoreError::enrollment_not_found(enrollment_id))?;
        let course: Option<CourseDocument> =
            self.load(Collection::Courses, &enrollment.course_id).await?;
        let student = self.load_user(&enrollment.student_id).await?;

        self.remove_enrollment_documents(&enrollment, student)
            .await?;

        if let Some(mut course) = course {
            course.seats_available = increment_seats(course.seats_available, course.total_seats);
            course.enrollment_count = course.enrollment_count.saturating_sub(1).max(0);
            course.forget_recent(&enrollment.enrollment_id);
            self.save(Collection::Courses, &course.course_id, &course)
                .await?;
        }
        Ok(())
    }

    async fn record_grade(
        &self,
        enrollment_id: EnrollmentId,
        grade: Option<Grade>,
    ) -> Result<(), EnrollmentStoreError> {
        let mut enrollment = self
            .load_enrollment(enrollment_id)
            .await?
            .ok_or_else(|| EnrollmentStoreError::enrollment_not_found(enrollment_id))?;
        let student = self.load_user(&enrollment.student_id).await?;

        enrollment.grade = grade;
        self.save(Collection::Enrollments, &enrollment.enrollment_id, &enrollment)
            .await?;

        if let Some(mut student) = student {
            if student.set_grade(&enrollment.enrollment_id, grade) {
                self.save(Collection::Users, &student.user_id, &student)
                    .await?;
            } else {
                warn!(
                    enrollment_id = %enrollment.enrollment_id,
                    "student course list had no entry to mirror the grade into"
                );
            }
        }
        Ok(())
    }

    async fn delete_course(&self, course_id: CourseId) -> Result<(), EnrollmentStoreError> {
        let opaque = course_id.to_opaque();
        if self.load_course(course_id).await?.is_none() {
            return Err(EnrollmentStoreError::course_not_found(course_id));
        }
        let enrollments = self.enrollments_for_course(course_id).await?;

        for enrollment in &enrollments {
            let student = self.load_user(&enrollment.student_id).await?;
            self.remove_enrollment_documents(enrollment, student)
                .await?;
        }
        self.collections
            .delete(Collection::Courses, &opaque)
            .await
            .map_err(map_document_error)?;
        debug!(course_id = %opaque, removed_enrollments = enrollments.len(), "course document deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
