//! Generation plan describing dataset sizes.

use serde::{Deserialize, Serialize};

use crate::catalogue::DEPARTMENTS;
use crate::error::GenerationError;

/// Email of the well-known test student (always student 1).
pub const TEST_STUDENT_EMAIL: &str = "test@student.com";

/// Password of the well-known test student.
pub const TEST_STUDENT_PASSWORD: &str = "password123";

/// Email of the administrator account.
pub const ADMIN_EMAIL: &str = "admin@university.com";

/// Password of the administrator account.
pub const ADMIN_PASSWORD: &str = "admin123";

const DEFAULT_SEED: u64 = 2024;

/// Sizes and seed for a generated dataset.
///
/// # Example
///
/// ```
/// use seed_data::DatasetPlan;
///
/// let plan = DatasetPlan::default().with_seed(99).with_students(10);
/// assert_eq!(plan.seed(), 99);
/// assert_eq!(plan.students(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetPlan {
    seed: u64,
    departments: usize,
    professors: usize,
    students: usize,
    courses: usize,
    enrollment_attempts: usize,
}

impl Default for DatasetPlan {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            departments: DEPARTMENTS.len(),
            professors: 15,
            students: 100,
            courses: 30,
            enrollment_attempts: 200,
        }
    }
}

impl DatasetPlan {
    /// Replace the RNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the department count (at most the fixed catalogue size).
    #[must_use]
    pub const fn with_departments(mut self, departments: usize) -> Self {
        self.departments = departments;
        self
    }

    /// Replace the professor count.
    #[must_use]
    pub const fn with_professors(mut self, professors: usize) -> Self {
        self.professors = professors;
        self
    }

    /// Replace the student count (the test student included).
    #[must_use]
    pub const fn with_students(mut self, students: usize) -> Self {
        self.students = students;
        self
    }

    /// Replace the course count.
    #[must_use]
    pub const fn with_courses(mut self, courses: usize) -> Self {
        self.courses = courses;
        self
    }

    /// Replace the number of random enrollment attempts.
    #[must_use]
    pub const fn with_enrollment_attempts(mut self, attempts: usize) -> Self {
        self.enrollment_attempts = attempts;
        self
    }

    /// RNG seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Department count.
    #[must_use]
    pub const fn departments(&self) -> usize {
        self.departments
    }

    /// Professor count.
    #[must_use]
    pub const fn professors(&self) -> usize {
        self.professors
    }

    /// Student count.
    #[must_use]
    pub const fn students(&self) -> usize {
        self.students
    }

    /// Course count.
    #[must_use]
    pub const fn courses(&self) -> usize {
        self.courses
    }

    /// Enrollment attempts.
    #[must_use]
    pub const fn enrollment_attempts(&self) -> usize {
        self.enrollment_attempts
    }

    /// Check the plan can produce a coherent dataset.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when a required population is empty or
    /// more departments are requested than the catalogue provides.
    pub const fn validate(&self) -> Result<(), GenerationError> {
        if self.departments == 0 {
            return Err(GenerationError::NoDepartments);
        }
        if self.departments > DEPARTMENTS.len() {
            return Err(GenerationError::TooManyDepartments {
                requested: self.departments,
                available: DEPARTMENTS.len(),
            });
        }
        if self.professors == 0 {
            return Err(GenerationError::NoProfessors);
        }
        // Student 2 is promoted to advisor when the draw produces none.
        if self.students < 2 {
            return Err(GenerationError::TooFewStudents {
                requested: self.students,
            });
        }
        if self.courses == 0 {
            return Err(GenerationError::NoCourses);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn default_plan_matches_reset_sizes() {
        let plan = DatasetPlan::default();
        assert_eq!(plan.departments(), 8);
        assert_eq!(plan.professors(), 15);
        assert_eq!(plan.students(), 100);
        assert_eq!(plan.courses(), 30);
        assert_eq!(plan.enrollment_attempts(), 200);
        assert_eq!(plan.validate(), Ok(()));
    }

    #[rstest]
    #[case(DatasetPlan::default().with_departments(0), GenerationError::NoDepartments)]
    #[case(
        DatasetPlan::default().with_departments(9),
        GenerationError::TooManyDepartments { requested: 9, available: 8 }
    )]
    #[case(DatasetPlan::default().with_professors(0), GenerationError::NoProfessors)]
    #[case(
        DatasetPlan::default().with_students(1),
        GenerationError::TooFewStudents { requested: 1 }
    )]
    #[case(DatasetPlan::default().with_courses(0), GenerationError::NoCourses)]
    fn invalid_plans_are_rejected(#[case] plan: DatasetPlan, #[case] expected: GenerationError) {
        assert_eq!(plan.validate(), Err(expected));
    }
}
