//! End-to-end enrollment behaviour on the document backend.
//!
//! The university is migrated from a relational snapshot first, so these
//! tests also cover the caches the importer rebuilds.

mod support;

use std::sync::Arc;

use registrar::domain::ports::{CourseQuery, EnrollmentCommand};
use registrar::domain::{EnrollmentError, ErrorCode, Grade, StorageBackend};
use registrar::outbound::document::DocumentCollections;
use rstest::rstest;
use serde_json::json;
use support::{
    FULL_COURSE, HALF_COURSE, LARGE_COURSE, SMALL_COURSE, University, course_id, student_id,
};

#[tokio::test]
async fn last_seat_is_released_by_a_drop() {
    let uni = University::on_document_backend().await;

    let first = uni
        .service
        .enroll_student(student_id(1), course_id(SMALL_COURSE))
        .await
        .expect("first student takes the seat");
    assert_eq!(uni.course_document(SMALL_COURSE).await.seats_available, 0);

    let err = uni
        .service
        .enroll_student(student_id(2), course_id(SMALL_COURSE))
        .await
        .expect_err("no seat left");
    assert_eq!(err, EnrollmentError::CapacityExceeded(course_id(SMALL_COURSE)));

    uni.service
        .drop_by_id(first.enrollment.id)
        .await
        .expect("drop succeeds");
    assert_eq!(uni.course_document(SMALL_COURSE).await.seats_available, 1);

    uni.service
        .enroll_student(student_id(2), course_id(SMALL_COURSE))
        .await
        .expect("second student takes the freed seat");
    assert_eq!(uni.course_document(SMALL_COURSE).await.seats_available, 0);
}

#[tokio::test]
async fn course_closes_once_enrollments_reach_the_seat_counter() {
    let uni = University::on_document_backend().await;

    for student in 1..=2 {
        uni.service
            .enroll_student(student_id(student), course_id(HALF_COURSE))
            .await
            .expect("seat available");
    }
    let course = uni.course_document(HALF_COURSE).await;
    assert_eq!(course.seats_available, 2);
    assert_eq!(course.enrollment_count, 2);

    let err = uni
        .service
        .enroll_student(student_id(3), course_id(HALF_COURSE))
        .await
        .expect_err("two enrollments against a counter of two");
    assert_eq!(err, EnrollmentError::CapacityExceeded(course_id(HALF_COURSE)));
    let course = uni.course_document(HALF_COURSE).await;
    assert_eq!(course.seats_available, 2);
    assert_eq!(course.enrollment_count, 2);
    assert_eq!(uni.user_document(3).await.enrolled_courses.len(), 1);
}

#[tokio::test]
async fn repeated_enrollment_takes_one_seat() {
    let uni = University::on_document_backend().await;
    let before = uni.course_document(LARGE_COURSE).await.seats_available;

    uni.service
        .enroll_student(student_id(1), course_id(LARGE_COURSE))
        .await
        .expect("first enrollment");
    let err = uni
        .service
        .enroll_student(student_id(1), course_id(LARGE_COURSE))
        .await
        .expect_err("duplicate");

    assert_eq!(
        err,
        EnrollmentError::DuplicateEnrollment {
            student_id: student_id(1),
            course_id: course_id(LARGE_COURSE),
        }
    );
    let course = uni.course_document(LARGE_COURSE).await;
    assert_eq!(course.seats_available, before - 1);
    assert_eq!(uni.user_document(1).await.enrolled_courses.len(), 1);
}

#[tokio::test]
async fn full_course_rejects_without_side_effects() {
    let uni = University::on_document_backend().await;
    let course_before = uni.course_document(FULL_COURSE).await;
    let user_before = uni.user_document(1).await;
    let documents_before = uni.enrollment_documents().await;

    let err = uni
        .service
        .enroll_student(student_id(1), course_id(FULL_COURSE))
        .await
        .expect_err("full course");

    assert_eq!(err, EnrollmentError::CapacityExceeded(course_id(FULL_COURSE)));
    assert_eq!(uni.course_document(FULL_COURSE).await, course_before);
    assert_eq!(uni.user_document(1).await, user_before);
    assert_eq!(uni.enrollment_documents().await, documents_before);
    assert!(uni.notifier.sent().is_empty());
}

#[tokio::test]
async fn enroll_then_drop_restores_every_counter() {
    let uni = University::on_document_backend().await;
    let course_before = uni.course_document(LARGE_COURSE).await;
    let user_before = uni.user_document(2).await;

    let receipt = uni
        .service
        .enroll_student(student_id(2), course_id(LARGE_COURSE))
        .await
        .expect("enroll");
    let during = uni.user_document(2).await;
    assert_eq!(during.total_credits, user_before.total_credits + 4);
    uni.service
        .drop_by_id(receipt.enrollment.id)
        .await
        .expect("drop");

    let course_after = uni.course_document(LARGE_COURSE).await;
    assert_eq!(course_after.seats_available, course_before.seats_available);
    assert_eq!(course_after.enrollment_count, course_before.enrollment_count);
    assert_eq!(uni.user_document(2).await, user_before);
}

#[tokio::test]
async fn regrading_updates_both_copies() {
    let uni = University::on_document_backend().await;
    let receipt = uni
        .service
        .enroll_student(student_id(1), course_id(LARGE_COURSE))
        .await
        .expect("enroll");

    uni.service
        .grade(receipt.enrollment.id, Some(Grade::A))
        .await
        .expect("grade A");
    uni.service
        .grade(receipt.enrollment.id, Some(Grade::B))
        .await
        .expect("grade B");

    let raw = uni
        .collections
        .get(
            registrar::outbound::document::Collection::Enrollments,
            &receipt.external_id,
        )
        .await
        .expect("read enrollment")
        .expect("enrollment exists");
    let stored: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(stored["grade"], json!("B"));
    let user = uni.user_document(1).await;
    assert_eq!(user.enrolled_courses[0].grade, Some(Grade::B));

    uni.service
        .grade(receipt.enrollment.id, None)
        .await
        .expect("grade cleared");
    assert_eq!(uni.user_document(1).await.enrolled_courses[0].grade, None);
}

#[tokio::test]
async fn confirmations_name_the_student_and_course() {
    let uni = University::on_document_backend().await;

    let receipt = uni
        .service
        .enroll_student(student_id(1), course_id(LARGE_COURSE))
        .await
        .expect("enroll");

    assert_eq!(receipt.backend, StorageBackend::Document);
    assert!(receipt.external_id.starts_with("ENR"));
    assert_eq!(
        uni.notifier.sent(),
        vec![(
            "student1@student.com".to_owned(),
            "Student 1".to_owned(),
            "Course 2".to_owned()
        )]
    );
}

#[tokio::test]
async fn new_enrollment_ids_follow_migrated_ones() {
    let uni = University::on_document_backend().await;

    let receipt = uni
        .service
        .enroll_student(student_id(1), course_id(LARGE_COURSE))
        .await
        .expect("enroll");

    assert_eq!(receipt.enrollment.id.get(), 5);
    assert_eq!(receipt.external_id, "ENR00005");
}

#[tokio::test]
async fn concurrent_enrollments_never_oversell() {
    let uni = Arc::new(University::on_document_backend().await);

    let attempts = (1..=3).map(|student| {
        let uni = Arc::clone(&uni);
        tokio::spawn(async move {
            uni.service
                .enroll_student(student_id(student), course_id(SMALL_COURSE))
                .await
        })
    });
    let mut successes = 0;
    for attempt in attempts {
        match attempt.await.expect("task joins") {
            Ok(_) => successes += 1,
            Err(err) => assert_eq!(err, EnrollmentError::CapacityExceeded(course_id(SMALL_COURSE))),
        }
    }

    assert_eq!(successes, 1);
    let course = uni.course_document(SMALL_COURSE).await;
    assert_eq!(course.seats_available, 0);
    assert_eq!(course.enrollment_count, 1);
}

#[rstest]
#[case(SMALL_COURSE)]
#[case(LARGE_COURSE)]
#[case(FULL_COURSE)]
#[case(HALF_COURSE)]
#[tokio::test]
async fn seat_counters_stay_within_capacity(#[case] course: i64) {
    let uni = University::on_document_backend().await;
    for student in 1..=3 {
        let _ = uni
            .service
            .enroll_student(student_id(student), course_id(course))
            .await;
    }

    let overview = uni
        .service
        .get_course(course_id(course))
        .await
        .expect("course exists");
    let seats = overview.course.seats_available();
    assert!((0..=overview.course.total_seats()).contains(&seats));
    assert!(overview.enrolled <= i64::from(overview.course.total_seats()));
}

#[tokio::test]
async fn command_port_maps_failures_to_client_errors() {
    let uni = University::on_document_backend().await;

    let err = uni
        .service
        .enroll(student_id(1), course_id(FULL_COURSE))
        .await
        .expect_err("full course");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "No seats available in this course");

    let err = uni
        .service
        .enroll(student_id(1), course_id(99))
        .await
        .expect_err("unknown course");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn deleting_a_course_releases_its_enrollments() {
    let uni = University::on_document_backend().await;
    let user_before = uni.user_document(3).await;
    assert_eq!(user_before.enrolled_courses.len(), 1);

    uni.service
        .delete_course(course_id(LARGE_COURSE))
        .await
        .expect("delete");

    let user = uni.user_document(3).await;
    assert!(user.enrolled_courses.is_empty());
    assert_eq!(user.total_credits, 0);
    let err = uni
        .service
        .get_course(course_id(LARGE_COURSE))
        .await
        .expect_err("course gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
