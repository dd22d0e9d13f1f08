//! Strict confirmation on the relational backend: a failed relay undoes the
//! enrollment it was confirming.

mod support;

use std::sync::Arc;

use registrar::domain::ports::EnrollmentCommand;
use registrar::domain::{EnrollmentError, ErrorCode};
use registrar::outbound::document::{
    Collection, CourseDocument, DocumentCollections, InMemoryCollections, UserDocument,
};
use support::{LARGE_COURSE, SMALL_COURSE, University, course_id, student_id};

async fn course(collections: &Arc<InMemoryCollections>, id: i64) -> CourseDocument {
    let raw = collections
        .get(Collection::Courses, &course_id(id).to_opaque())
        .await
        .expect("read course")
        .expect("course exists");
    serde_json::from_str(&raw).expect("course document")
}

async fn user(collections: &Arc<InMemoryCollections>, id: i64) -> UserDocument {
    let raw = collections
        .get(Collection::Users, &student_id(id).to_opaque())
        .await
        .expect("read user")
        .expect("user exists");
    serde_json::from_str(&raw).expect("user document")
}

async fn enrollment_count(collections: &Arc<InMemoryCollections>) -> usize {
    collections
        .list(Collection::Enrollments)
        .await
        .expect("list enrollments")
        .len()
}

#[tokio::test]
async fn failed_confirmation_restores_the_seat_and_enrollment_set() {
    let (service, collections) = University::strict_with_failing_relay().await;
    let course_before = course(&collections, SMALL_COURSE).await;
    let enrollments_before = enrollment_count(&collections).await;

    let err = service
        .enroll_student(student_id(1), course_id(SMALL_COURSE))
        .await
        .expect_err("relay is down");

    assert!(matches!(err, EnrollmentError::NotificationFailure(_)));
    let course_after = course(&collections, SMALL_COURSE).await;
    assert_eq!(course_after.seats_available, course_before.seats_available);
    assert_eq!(course_after.enrollment_count, course_before.enrollment_count);
    assert_eq!(enrollment_count(&collections).await, enrollments_before);
    assert!(user(&collections, 1).await.enrolled_courses.is_empty());
}

#[tokio::test]
async fn repeated_failures_leave_no_trace() {
    let (service, collections) = University::strict_with_failing_relay().await;

    for _ in 0..3 {
        let err = service
            .enroll_student(student_id(2), course_id(LARGE_COURSE))
            .await
            .expect_err("relay is down");
        assert!(matches!(err, EnrollmentError::NotificationFailure(_)));
    }

    let course_after = course(&collections, LARGE_COURSE).await;
    assert_eq!(course_after.seats_available, 29);
    assert_eq!(course_after.enrollment_count, 1);
}

#[tokio::test]
async fn failed_confirmation_surfaces_as_internal_error() {
    let (service, _collections) = University::strict_with_failing_relay().await;

    let err = service
        .enroll(student_id(1), course_id(SMALL_COURSE))
        .await
        .expect_err("relay is down");

    assert_eq!(err.code(), ErrorCode::InternalError);
}
