//! Shared harness: a small university behind the enrollment service, with
//! the relational data supplied as a snapshot and the document backend held
//! in process memory.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use registrar::domain::ports::{
    BackendAdmin, DocumentImport, EnrollmentNotifier, FixtureEnrollmentStore, MigrationError, NotificationError,
    RelationalSnapshotSource,
};
use registrar::domain::{
    BackendAdminService, BackendSelector, Course, CourseDraft, CourseId, CourseLocks, Department,
    DepartmentId, EnrollmentId, EnrollmentRecord, EnrollmentService, Grade, NotificationPolicy,
    ProfessorId,
    ProfessorSnapshot, RelationalSnapshot, Role, StorageBackend, StoreRouter, StudentId,
    StudentSnapshot,
};
use registrar::outbound::document::{
    Collection, CourseDocument, DocumentCollections, DocumentEnrollmentStore, DocumentImporter,
    InMemoryCollections, UserDocument,
};

/// Course with one seat.
pub const SMALL_COURSE: i64 = 1;
/// Course with plenty of seats and one existing enrollment.
pub const LARGE_COURSE: i64 = 2;
/// Course with no seats left.
pub const FULL_COURSE: i64 = 3;
/// Course with four untouched seats; it stops admitting after two.
pub const HALF_COURSE: i64 = 4;

/// Relational source answering with a fixed snapshot.
pub struct StaticSnapshot(pub RelationalSnapshot);

#[async_trait]
impl RelationalSnapshotSource for StaticSnapshot {
    async fn load_snapshot(&self) -> Result<RelationalSnapshot, MigrationError> {
        Ok(self.0.clone())
    }
}

/// Notifier remembering every confirmation.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().expect("notifier lock").clone()
    }
}

#[async_trait]
impl EnrollmentNotifier for RecordingNotifier {
    async fn send_enrollment_confirmation(
        &self,
        to: &str,
        student_name: &str,
        course_name: &str,
    ) -> Result<(), NotificationError> {
        self.sent.lock().expect("notifier lock").push((
            to.to_owned(),
            student_name.to_owned(),
            course_name.to_owned(),
        ));
        Ok(())
    }
}

/// Notifier whose relay is always down.
pub struct FailingNotifier;

#[async_trait]
impl EnrollmentNotifier for FailingNotifier {
    async fn send_enrollment_confirmation(
        &self,
        _to: &str,
        _student_name: &str,
        _course_name: &str,
    ) -> Result<(), NotificationError> {
        Err(NotificationError::transport("relay down"))
    }
}

pub fn student_id(id: i64) -> StudentId {
    StudentId::new(id).expect("positive id")
}

pub fn course_id(id: i64) -> CourseId {
    CourseId::new(id).expect("positive id")
}

fn student(id: i64) -> StudentSnapshot {
    StudentSnapshot {
        id: student_id(id),
        name: format!("Student {id}"),
        email: format!("student{id}@student.com"),
        password: "password123".to_owned(),
        role: Role::Student,
        advisor_id: None,
        department_ids: vec![DepartmentId::new(1).expect("positive id")],
    }
}

fn course(id: i64, total_seats: i32, seats_available: i32) -> Course {
    Course::try_new(CourseDraft {
        id: course_id(id),
        name: format!("Course {id}"),
        credits: 4,
        total_seats,
        seats_available,
        professor_id: Some(ProfessorId::new(1).expect("positive id")),
    })
    .expect("valid course")
}

/// Three students, one professor and four courses.
///
/// Student 3 already holds an enrollment in the large course.
pub fn snapshot() -> RelationalSnapshot {
    RelationalSnapshot {
        departments: vec![Department {
            id: DepartmentId::new(1).expect("positive id"),
            name: "Computer Science".to_owned(),
            location: "Building A".to_owned(),
        }],
        students: vec![student(1), student(2), student(3)],
        professors: vec![ProfessorSnapshot {
            id: ProfessorId::new(1).expect("positive id"),
            name: "Grace Hopper".to_owned(),
            email: "hopper@university.com".to_owned(),
            password: "secret".to_owned(),
            role: Role::Professor,
            department_ids: vec![DepartmentId::new(1).expect("positive id")],
        }],
        courses: vec![
            course(SMALL_COURSE, 1, 1),
            course(LARGE_COURSE, 30, 29),
            course(FULL_COURSE, 5, 0),
            course(HALF_COURSE, 4, 4),
        ],
        enrollments: vec![EnrollmentRecord {
            id: EnrollmentId::new(4).expect("positive id"),
            student_id: student_id(3),
            course_id: course_id(LARGE_COURSE),
            grade: Some(Grade::C),
            enrolled_at: Utc::now() - Duration::days(1),
        }],
    }
}

/// Service, admin and raw collections over one shared selector.
pub struct University {
    pub service: EnrollmentService,
    pub admin: BackendAdminService,
    pub collections: Arc<InMemoryCollections>,
    pub notifier: Arc<RecordingNotifier>,
}

impl University {
    /// Migrate the snapshot into the document store and select it.
    pub async fn on_document_backend() -> Self {
        let university = Self::new(snapshot());
        university.admin.migrate().await.expect("migration succeeds");
        university
            .admin
            .switch_to(StorageBackend::Document)
            .await
            .expect("switch succeeds");
        university
    }

    pub fn new(snapshot: RelationalSnapshot) -> Self {
        let collections = Arc::new(InMemoryCollections::new());
        let shared: Arc<dyn DocumentCollections> = collections.clone();
        let selector = Arc::new(BackendSelector::new(StorageBackend::Relational));
        let stores = StoreRouter::new(
            selector.clone(),
            Arc::new(FixtureEnrollmentStore),
            Arc::new(DocumentEnrollmentStore::new(shared.clone())),
        );
        let notifier = Arc::new(RecordingNotifier::default());
        let service = EnrollmentService::new(
            stores,
            notifier.clone(),
            Arc::new(CourseLocks::new(std::time::Duration::from_millis(500))),
        );
        let admin = BackendAdminService::new(
            selector,
            Arc::new(StaticSnapshot(snapshot)),
            Arc::new(DocumentImporter::new(shared)),
        );
        Self {
            service,
            admin,
            collections,
            notifier,
        }
    }

    /// Service whose relational slot holds real state, seeded from the
    /// snapshot, with strict notification and a relay that always fails.
    ///
    /// The returned collections back the relational slot.
    pub async fn strict_with_failing_relay() -> (EnrollmentService, Arc<InMemoryCollections>) {
        let collections = Arc::new(InMemoryCollections::new());
        let shared: Arc<dyn DocumentCollections> = collections.clone();
        DocumentImporter::new(shared.clone())
            .replace_all(&snapshot())
            .await
            .expect("seed relational slot");
        let stores = StoreRouter::new(
            Arc::new(BackendSelector::new(StorageBackend::Relational)),
            Arc::new(DocumentEnrollmentStore::new(shared)),
            Arc::new(FixtureEnrollmentStore),
        );
        let service = EnrollmentService::new(
            stores,
            Arc::new(FailingNotifier),
            Arc::new(CourseLocks::default()),
        )
        .with_notification_policy(NotificationPolicy::StrictOnRelational);
        (service, collections)
    }

    pub async fn course_document(&self, id: i64) -> CourseDocument {
        let raw = self
            .collections
            .get(Collection::Courses, &course_id(id).to_opaque())
            .await
            .expect("read course")
            .expect("course exists");
        serde_json::from_str(&raw).expect("course document")
    }

    pub async fn user_document(&self, id: i64) -> UserDocument {
        let raw = self
            .collections
            .get(Collection::Users, &student_id(id).to_opaque())
            .await
            .expect("read user")
            .expect("user exists");
        serde_json::from_str(&raw).expect("user document")
    }

    pub async fn enrollment_documents(&self) -> usize {
        self.collections
            .list(Collection::Enrollments)
            .await
            .expect("list enrollments")
            .len()
    }
}
