//! Public API tests for dataset generation.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use rstest::rstest;
use seed_data::{
    DEPARTMENTS, DatasetPlan, GenerationError, RoleSeed, TEST_STUDENT_EMAIL, generate_university,
};

#[test]
fn departments_follow_the_fixed_catalogue() {
    let dataset = generate_university(&DatasetPlan::default()).expect("generates");

    let names: Vec<&str> = dataset
        .departments
        .iter()
        .map(|department| department.name.as_str())
        .collect();
    let expected: Vec<&str> = DEPARTMENTS.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, expected);
}

#[test]
fn reduced_department_plans_take_a_prefix() {
    let plan = DatasetPlan::default().with_departments(3);
    let dataset = generate_university(&plan).expect("generates");

    assert_eq!(dataset.departments.len(), 3);
    for professor in &dataset.professors {
        for department_id in &professor.department_ids {
            assert!((1..=3).contains(department_id));
        }
    }
}

#[rstest]
#[case(0)]
#[case(1)]
fn plans_without_room_for_an_advisor_fail(#[case] students: usize) {
    let plan = DatasetPlan::default().with_students(students);
    let result = generate_university(&plan);

    assert_eq!(
        result,
        Err(GenerationError::TooFewStudents {
            requested: students
        })
    );
}

#[test]
fn test_student_is_a_regular_student() {
    let dataset = generate_university(&DatasetPlan::default().with_seed(55)).expect("generates");
    let test_student = dataset
        .students
        .iter()
        .find(|student| student.email == TEST_STUDENT_EMAIL)
        .expect("test student present");

    assert_eq!(test_student.id, 1);
    assert_eq!(test_student.role, RoleSeed::Student);
    assert!(test_student.advisor_id.is_some());
}

#[test]
fn courses_are_taught_by_generated_professors() {
    let dataset = generate_university(&DatasetPlan::default()).expect("generates");
    let professor_count = i64::try_from(dataset.professors.len()).expect("fits");

    for course in &dataset.courses {
        let professor = course.professor_id.expect("every course has a professor");
        assert!((1..=professor_count).contains(&professor));
    }
}
