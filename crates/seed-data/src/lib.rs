//! Deterministic university dataset generation.
//!
//! This crate produces a believable, reproducible university population
//! (departments, professors, students with advisors, courses and
//! enrollments) from a numeric seed. It is independent of backend domain
//! types so the reset tooling and tests can share it without circular
//! dependencies.
//!
//! # Overview
//!
//! - [`DatasetPlan`] describes how many records of each kind to generate.
//! - [`generate_university`] turns a plan into a [`UniversityDataset`].
//! - Enrollment generation applies the same duplicate and seat-capacity
//!   rules the live enrollment path enforces, so the seat counters in the
//!   output are always consistent with the enrollment set.
//!
//! # Example
//!
//! ```
//! use seed_data::{DatasetPlan, generate_university};
//!
//! let plan = DatasetPlan::default().with_seed(7);
//! let dataset = generate_university(&plan).expect("default plan is valid");
//!
//! assert_eq!(dataset.departments.len(), 8);
//! assert_eq!(dataset.students.len(), 100);
//! ```

mod catalogue;
mod dataset;
mod error;
mod generator;
mod plan;

pub use catalogue::{COURSE_SUBJECTS, DEPARTMENTS};
pub use dataset::{
    AdministratorSeed, CourseSeed, DepartmentSeed, EnrollmentSeed, GradeSeed, ProfessorSeed,
    RoleSeed, StudentSeed, UniversityDataset,
};
pub use error::GenerationError;
pub use generator::generate_university;
pub use plan::{
    ADMIN_EMAIL, ADMIN_PASSWORD, DatasetPlan, TEST_STUDENT_EMAIL, TEST_STUDENT_PASSWORD,
};
