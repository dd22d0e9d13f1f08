//! Deterministic university generation from a [`DatasetPlan`].
//!
//! The same plan always produces identical output. Enrollment attempts are
//! random (student, course) draws; a draw is skipped when the pair is
//! already enrolled or the course's enrollment count has reached its seat
//! counter, and every accepted draw decrements that counter with a floor of
//! zero.

use std::collections::{HashMap, HashSet};

use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::seq::{IndexedMutRandom, IndexedRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::catalogue::{DEPARTMENTS, course_names};
use crate::dataset::{
    AdministratorSeed, CourseSeed, DepartmentSeed, EnrollmentSeed, GradeSeed, ProfessorSeed,
    RoleSeed, StudentSeed, UniversityDataset,
};
use crate::error::GenerationError;
use crate::plan::{
    ADMIN_EMAIL, ADMIN_PASSWORD, DatasetPlan, TEST_STUDENT_EMAIL, TEST_STUDENT_PASSWORD,
};

const PASSWORD_LENGTH: usize = 10;
const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%&*";

const STUDENT_EMAIL_DOMAIN: &str = "students.university.edu";
const PROFESSOR_EMAIL_DOMAIN: &str = "faculty.university.edu";

const TEST_STUDENT_NAME: &str = "Test Student";
const ADMIN_NAME: &str = "Test Admin";

/// Roughly one student in ten advises other students.
const ADVISOR_NUMERATOR: u32 = 1;
const ADVISOR_DENOMINATOR: u32 = 10;

/// Roughly seven enrollments in ten carry a grade.
const GRADED_NUMERATOR: u32 = 7;
const GRADED_DENOMINATOR: u32 = 10;

const MIN_CREDITS: i32 = 2;
const MAX_CREDITS: i32 = 6;
const MIN_SEATS: i32 = 15;
const MAX_SEATS: i32 = 49;

/// Generate a complete university dataset from `plan`.
///
/// # Errors
///
/// Returns [`GenerationError`] when the plan fails validation or a count
/// cannot be represented as a relational key.
///
/// # Example
///
/// ```
/// use seed_data::{DatasetPlan, generate_university};
///
/// let plan = DatasetPlan::default().with_seed(1);
/// let first = generate_university(&plan).expect("valid plan");
/// let second = generate_university(&plan).expect("valid plan");
/// assert_eq!(first, second);
/// ```
pub fn generate_university(plan: &DatasetPlan) -> Result<UniversityDataset, GenerationError> {
    plan.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(plan.seed());

    let departments = generate_departments(plan.departments())?;
    let department_ids: Vec<i64> = departments.iter().map(|department| department.id).collect();

    let professors = generate_professors(&mut rng, plan.professors(), &department_ids)?;
    let professor_ids: Vec<i64> = professors.iter().map(|professor| professor.id).collect();

    let students = generate_students(&mut rng, plan.students(), &department_ids, &professor_ids)?;
    let student_ids: Vec<i64> = students.iter().map(|student| student.id).collect();

    let mut courses = generate_courses(&mut rng, plan.courses(), &professor_ids)?;
    let enrollments = generate_enrollments(
        &mut rng,
        plan.enrollment_attempts(),
        &student_ids,
        &mut courses,
    )?;

    let administrator = AdministratorSeed {
        id: key_for("professor", plan.professors())?,
        name: ADMIN_NAME.to_owned(),
        email: ADMIN_EMAIL.to_owned(),
        password: ADMIN_PASSWORD.to_owned(),
    };

    Ok(UniversityDataset {
        departments,
        professors,
        students,
        courses,
        enrollments,
        administrator,
    })
}

/// Relational key for the zero-based `index` within an entity kind.
fn key_for(entity: &'static str, index: usize) -> Result<i64, GenerationError> {
    i64::try_from(index)
        .ok()
        .and_then(|value| value.checked_add(1))
        .ok_or(GenerationError::IdentifierOverflow {
            entity,
            count: index,
        })
}

fn sequential_ids(entity: &'static str, count: usize) -> Result<Vec<i64>, GenerationError> {
    (0..count).map(|index| key_for(entity, index)).collect()
}

fn generate_departments(count: usize) -> Result<Vec<DepartmentSeed>, GenerationError> {
    let ids = sequential_ids("department", count)?;
    Ok(DEPARTMENTS
        .iter()
        .zip(ids)
        .map(|((name, location), id)| DepartmentSeed {
            id,
            name: (*name).to_owned(),
            location: (*location).to_owned(),
        })
        .collect())
}

fn generate_professors(
    rng: &mut ChaCha8Rng,
    count: usize,
    department_ids: &[i64],
) -> Result<Vec<ProfessorSeed>, GenerationError> {
    let ids = sequential_ids("professor", count)?;
    Ok(ids
        .into_iter()
        .map(|id| {
            let name = full_name(rng);
            ProfessorSeed {
                id,
                email: email_for(&name, id, PROFESSOR_EMAIL_DOMAIN),
                name,
                password: temp_password(rng),
                department_ids: department_ids.choose(rng).copied().into_iter().collect(),
            }
        })
        .collect())
}

fn generate_students(
    rng: &mut ChaCha8Rng,
    count: usize,
    department_ids: &[i64],
    professor_ids: &[i64],
) -> Result<Vec<StudentSeed>, GenerationError> {
    let ids = sequential_ids("student", count)?;
    let mut students = Vec::with_capacity(count);

    for (index, id) in ids.into_iter().enumerate() {
        let faculty_advisor_id = professor_ids.choose(rng).copied();
        let student = if index == 0 {
            StudentSeed {
                id,
                name: TEST_STUDENT_NAME.to_owned(),
                email: TEST_STUDENT_EMAIL.to_owned(),
                password: TEST_STUDENT_PASSWORD.to_owned(),
                role: RoleSeed::Student,
                advisor_id: None,
                faculty_advisor_id,
                department_ids: department_ids.first().copied().into_iter().collect(),
            }
        } else {
            let name = full_name(rng);
            let role = if rng.random_ratio(ADVISOR_NUMERATOR, ADVISOR_DENOMINATOR) {
                RoleSeed::StudentAdvisor
            } else {
                RoleSeed::Student
            };
            StudentSeed {
                id,
                email: email_for(&name, id, STUDENT_EMAIL_DOMAIN),
                name,
                password: temp_password(rng),
                role,
                advisor_id: None,
                faculty_advisor_id,
                department_ids: department_ids.choose(rng).copied().into_iter().collect(),
            }
        };
        students.push(student);
    }

    ensure_student_advisor(&mut students);
    assign_student_advisors(rng, &mut students);
    Ok(students)
}

/// Promote student 2 when the draw produced no advisors.
fn ensure_student_advisor(students: &mut [StudentSeed]) {
    let has_advisor = students
        .iter()
        .any(|student| student.role == RoleSeed::StudentAdvisor);
    if has_advisor {
        return;
    }
    if let Some(student) = students.get_mut(1) {
        student.role = RoleSeed::StudentAdvisor;
    }
}

fn assign_student_advisors(rng: &mut ChaCha8Rng, students: &mut [StudentSeed]) {
    let advisor_ids: Vec<i64> = students
        .iter()
        .filter(|student| student.role == RoleSeed::StudentAdvisor)
        .map(|student| student.id)
        .collect();

    for student in students
        .iter_mut()
        .filter(|student| student.role == RoleSeed::Student)
    {
        student.advisor_id = advisor_ids.choose(rng).copied();
    }
}

fn generate_courses(
    rng: &mut ChaCha8Rng,
    count: usize,
    professor_ids: &[i64],
) -> Result<Vec<CourseSeed>, GenerationError> {
    let ids = sequential_ids("course", count)?;
    Ok(course_names(count)
        .into_iter()
        .zip(ids)
        .map(|(name, id)| {
            let credits = rng.random_range(MIN_CREDITS..=MAX_CREDITS);
            let total_seats = rng.random_range(MIN_SEATS..=MAX_SEATS);
            CourseSeed {
                id,
                name,
                credits,
                total_seats,
                seats_available: total_seats,
                professor_id: professor_ids.choose(rng).copied(),
            }
        })
        .collect())
}

fn generate_enrollments(
    rng: &mut ChaCha8Rng,
    attempts: usize,
    student_ids: &[i64],
    courses: &mut [CourseSeed],
) -> Result<Vec<EnrollmentSeed>, GenerationError> {
    let mut enrolled_pairs = HashSet::new();
    let mut enrolled_per_course: HashMap<i64, i32> = HashMap::new();
    let mut enrollments = Vec::new();

    for _ in 0..attempts {
        let Some(student_id) = student_ids.choose(rng).copied() else {
            break;
        };
        let Some(course) = courses.choose_mut(rng) else {
            break;
        };

        let pair = (student_id, course.id);
        let enrolled = enrolled_per_course.entry(course.id).or_default();
        if enrolled_pairs.contains(&pair) || *enrolled >= course.seats_available {
            continue;
        }

        let grade = if rng.random_ratio(GRADED_NUMERATOR, GRADED_DENOMINATOR) {
            GradeSeed::ALL.choose(rng).copied()
        } else {
            None
        };

        enrolled_pairs.insert(pair);
        *enrolled = enrolled.saturating_add(1);
        course.seats_available = course.seats_available.saturating_sub(1).max(0);
        enrollments.push(EnrollmentSeed {
            id: key_for("enrollment", enrollments.len())?,
            student_id,
            course_id: course.id,
            grade,
        });
    }

    Ok(enrollments)
}

fn full_name(rng: &mut ChaCha8Rng) -> String {
    let first: String = FirstName(EN).fake_with_rng(rng);
    let last: String = LastName(EN).fake_with_rng(rng);
    format!("{first} {last}")
}

/// Build an address that is unique per entity kind by embedding the key.
fn email_for(name: &str, id: i64, domain: &str) -> String {
    let local: String = name
        .chars()
        .filter_map(|ch| match ch {
            ' ' => Some('.'),
            _ if ch.is_ascii_alphanumeric() => Some(ch.to_ascii_lowercase()),
            _ => None,
        })
        .collect();
    format!("{local}.{id}@{domain}")
}

fn temp_password(rng: &mut ChaCha8Rng) -> String {
    (0..PASSWORD_LENGTH)
        .filter_map(|_| PASSWORD_CHARSET.choose(rng).map(|byte| char::from(*byte)))
        .collect()
}
