//! Generated dataset types.
//!
//! These mirror the backend's university model without depending on it.
//! Identifiers are the numeric keys the relational store will use, assigned
//! sequentially from 1 within each entity kind.

use serde::{Deserialize, Serialize};

/// Role carried by a generated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSeed {
    /// Regular student.
    Student,
    /// Student who advises other students.
    StudentAdvisor,
    /// Teaching staff.
    Professor,
    /// Administrative staff with elevated rights.
    AdministrativeStaff,
}

impl RoleSeed {
    /// Numeric role identifier used by the relational `roles` table.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Student => 1,
            Self::StudentAdvisor => 2,
            Self::Professor => 3,
            Self::AdministrativeStaff => 4,
        }
    }

    /// Stable role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::StudentAdvisor => "student_advisor",
            Self::Professor => "professor",
            Self::AdministrativeStaff => "administrative_staff",
        }
    }

    /// Every role in identifier order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [
            Self::Student,
            Self::StudentAdvisor,
            Self::Professor,
            Self::AdministrativeStaff,
        ]
    }
}

/// Letter grade assigned to a generated enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeSeed {
    /// Excellent.
    A,
    /// Good.
    B,
    /// Satisfactory.
    C,
    /// Sufficient.
    D,
    /// Failed.
    F,
}

impl GradeSeed {
    /// All grades in descending order.
    pub const ALL: [Self; 5] = [Self::A, Self::B, Self::C, Self::D, Self::F];

    /// Letter representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

/// Generated department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentSeed {
    /// Department key.
    pub id: i64,
    /// Department name.
    pub name: String,
    /// Building or campus area.
    pub location: String,
}

/// Generated professor with a login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessorSeed {
    /// Professor key.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Plaintext account password.
    pub password: String,
    /// Department memberships.
    pub department_ids: Vec<i64>,
}

/// Generated student with a login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSeed {
    /// Student key.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Plaintext account password.
    pub password: String,
    /// Either [`RoleSeed::Student`] or [`RoleSeed::StudentAdvisor`].
    pub role: RoleSeed,
    /// Student advisor for regular students; `None` for advisors.
    pub advisor_id: Option<i64>,
    /// Faculty member recorded in the `advises` relation.
    pub faculty_advisor_id: Option<i64>,
    /// Department memberships.
    pub department_ids: Vec<i64>,
}

/// Generated course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSeed {
    /// Course key.
    pub id: i64,
    /// Course title.
    pub name: String,
    /// Credit value, 2 to 6.
    pub credits: i32,
    /// Capacity fixed at creation.
    pub total_seats: i32,
    /// Seats left after generated enrollments.
    pub seats_available: i32,
    /// Teaching professor.
    pub professor_id: Option<i64>,
}

/// Generated enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentSeed {
    /// Enrollment key.
    pub id: i64,
    /// Enrolled student.
    pub student_id: i64,
    /// Course enrolled in.
    pub course_id: i64,
    /// Grade, or `None` while ungraded.
    pub grade: Option<GradeSeed>,
}

/// Administrator account stored alongside professors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorSeed {
    /// Key in the professor table.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext account password.
    pub password: String,
}

/// Complete generated university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityDataset {
    /// Departments.
    pub departments: Vec<DepartmentSeed>,
    /// Professors (administrator excluded).
    pub professors: Vec<ProfessorSeed>,
    /// Students; the first is the well-known test student.
    pub students: Vec<StudentSeed>,
    /// Courses with seat counters already reflecting `enrollments`.
    pub courses: Vec<CourseSeed>,
    /// Enrollments that passed the duplicate and capacity rules.
    pub enrollments: Vec<EnrollmentSeed>,
    /// Administrator login.
    pub administrator: AdministratorSeed,
}

impl UniversityDataset {
    /// Number of enrollments referencing `course_id`.
    #[must_use]
    pub fn enrollment_count(&self, course_id: i64) -> usize {
        self.enrollments
            .iter()
            .filter(|enrollment| enrollment.course_id == course_id)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(RoleSeed::Student, 1, "student")]
    #[case(RoleSeed::StudentAdvisor, 2, "student_advisor")]
    #[case(RoleSeed::Professor, 3, "professor")]
    #[case(RoleSeed::AdministrativeStaff, 4, "administrative_staff")]
    fn role_ids_and_names_are_stable(
        #[case] role: RoleSeed,
        #[case] id: i32,
        #[case] name: &str,
    ) {
        assert_eq!(role.id(), id);
        assert_eq!(role.as_str(), name);
    }

    #[rstest]
    fn grades_render_as_letters() {
        let letters: Vec<_> = GradeSeed::ALL.iter().map(|grade| grade.as_str()).collect();
        assert_eq!(letters, vec!["A", "B", "C", "D", "F"]);
    }
}
