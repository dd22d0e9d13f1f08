//! Bulk import of a relational snapshot into the document collections.
//!
//! The import clears every collection first, then writes departments, users,
//! courses and enrollments with their ids translated through the identifier
//! codec. Denormalised caches (course lists, credit totals, enrollment
//! counters, recent-enrollment logs) are rebuilt from the snapshot's
//! enrollments rather than copied.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{DocumentImport, MigrationError};
use crate::domain::snapshot::count;
use crate::domain::{
    DepartmentId, MigrationStats, RelationalSnapshot, StudentId, StudentSnapshot,
};

use super::collections::{Collection, DocumentCollections, DocumentStoreError};
use super::documents::{
    CourseDocument, DepartmentDocument, EnrolledCourse, EnrollmentDocument, RecentEnrollment,
    UserDocument, encode,
};

/// Writes relational snapshots into document collections.
#[derive(Clone)]
pub struct DocumentImporter {
    collections: Arc<dyn DocumentCollections>,
}

impl DocumentImporter {
    /// Create an importer over the given collections.
    pub fn new(collections: Arc<dyn DocumentCollections>) -> Self {
        Self { collections }
    }

    async fn write<T: serde::Serialize>(
        &self,
        collection: Collection,
        key: &str,
        document: &T,
    ) -> Result<(), MigrationError> {
        let raw = encode(document).map_err(map_target_error)?;
        self.collections
            .put(collection, key, raw)
            .await
            .map_err(map_target_error)
    }

    async fn clear_all(&self) -> Result<(), MigrationError> {
        for collection in Collection::ALL {
            self.collections
                .clear(collection)
                .await
                .map_err(map_target_error)?;
        }
        Ok(())
    }
}

fn map_target_error(error: DocumentStoreError) -> MigrationError {
    match error {
        DocumentStoreError::Connection { message } => MigrationError::connection(message),
        DocumentStoreError::Backend { message } | DocumentStoreError::Codec { message } => {
            MigrationError::target(message)
        }
    }
}

fn department_keys(ids: &[DepartmentId]) -> Vec<String> {
    ids.iter().map(|id| id.to_opaque()).collect()
}

fn student_document(student: &StudentSnapshot) -> UserDocument {
    UserDocument {
        user_id: student.id.to_opaque(),
        name: student.name.clone(),
        email: student.email.clone(),
        password: student.password.clone(),
        role: student.role,
        advisor_id: student.advisor_id.map(StudentId::to_opaque),
        departments: department_keys(&student.department_ids),
        enrolled_courses: Vec::new(),
        total_credits: 0,
    }
}

/// Documents built from a snapshot, caches included.
struct ImportPlan {
    departments: Vec<DepartmentDocument>,
    users: Vec<UserDocument>,
    courses: Vec<CourseDocument>,
    enrollments: Vec<EnrollmentDocument>,
    highest_enrollment: i64,
}

fn plan(snapshot: &RelationalSnapshot) -> ImportPlan {
    let departments = snapshot
        .departments
        .iter()
        .map(|department| DepartmentDocument {
            department_id: department.id.to_opaque(),
            name: department.name.clone(),
            location: department.location.clone(),
        })
        .collect();

    let mut students: HashMap<StudentId, UserDocument> = snapshot
        .students
        .iter()
        .map(|student| (student.id, student_document(student)))
        .collect();
    let mut courses: HashMap<_, CourseDocument> = snapshot
        .courses
        .iter()
        .map(|course| (course.id(), CourseDocument::from_course(course)))
        .collect();

    let mut ordered: Vec<_> = snapshot.enrollments.iter().collect();
    ordered.sort_by_key(|record| (record.enrolled_at, record.id));

    let mut enrollments = Vec::with_capacity(ordered.len());
    let mut highest_enrollment = 0;
    for record in ordered {
        let document = EnrollmentDocument::from_record(record);
        highest_enrollment = highest_enrollment.max(record.id.get());
        let student = students.get_mut(&record.student_id);
        if let Some(course) = courses.get_mut(&record.course_id) {
            course.enrollment_count = course.enrollment_count.saturating_add(1);
            if let Some(student) = student {
                course.record_recent(RecentEnrollment {
                    enrollment_id: document.enrollment_id.clone(),
                    student_id: document.student_id.clone(),
                    student_name: student.name.clone(),
                    enrolled_at: record.enrolled_at,
                });
                student.push_course(EnrolledCourse {
                    enrollment_id: document.enrollment_id.clone(),
                    course_id: course.course_id.clone(),
                    course_name: course.name.clone(),
                    credits: course.credits,
                    grade: record.grade,
                    enrolled_at: record.enrolled_at,
                });
            }
        }
        enrollments.push(document);
    }

    let mut users: Vec<UserDocument> = snapshot
        .students
        .iter()
        .filter_map(|student| students.remove(&student.id))
        .collect();
    users.extend(snapshot.professors.iter().map(|professor| UserDocument {
        user_id: professor.id.to_opaque(),
        name: professor.name.clone(),
        email: professor.email.clone(),
        password: professor.password.clone(),
        role: professor.role,
        advisor_id: None,
        departments: department_keys(&professor.department_ids),
        enrolled_courses: Vec::new(),
        total_credits: 0,
    }));

    let courses = snapshot
        .courses
        .iter()
        .filter_map(|course| courses.remove(&course.id()))
        .collect();

    ImportPlan {
        departments,
        users,
        courses,
        enrollments,
        highest_enrollment,
    }
}

#[async_trait]
impl DocumentImport for DocumentImporter {
    async fn replace_all(
        &self,
        snapshot: &RelationalSnapshot,
    ) -> Result<MigrationStats, MigrationError> {
        let plan = plan(snapshot);
        self.clear_all().await?;

        for department in &plan.departments {
            self.write(Collection::Departments, &department.department_id, department)
                .await?;
        }
        for user in &plan.users {
            self.write(Collection::Users, &user.user_id, user).await?;
            self.collections
                .put(Collection::UserEmails, &user.email, user.user_id.clone())
                .await
                .map_err(map_target_error)?;
        }
        for course in &plan.courses {
            self.write(Collection::Courses, &course.course_id, course)
                .await?;
        }
        for enrollment in &plan.enrollments {
            self.write(Collection::Enrollments, &enrollment.enrollment_id, enrollment)
                .await?;
            self.collections
                .put(
                    Collection::EnrollmentPairs,
                    &format!("{}:{}", enrollment.student_id, enrollment.course_id),
                    enrollment.enrollment_id.clone(),
                )
                .await
                .map_err(map_target_error)?;
        }
        self.collections
            .set_sequence(Collection::Enrollments, plan.highest_enrollment)
            .await
            .map_err(map_target_error)?;

        let stats = MigrationStats {
            departments: count(plan.departments.len()),
            students: count(snapshot.students.len()),
            professors: count(snapshot.professors.len()),
            courses: count(plan.courses.len()),
            enrollments: count(plan.enrollments.len()),
        };
        debug!(?stats, "document collections rebuilt");
        Ok(stats)
    }
}
