//! Full relational snapshot consumed by the document migration.
//!
//! The relational store is the source of truth; a snapshot captures every
//! entity the document store needs so its caches can be rebuilt from scratch.

use seed_data::UniversityDataset;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::course::Course;
use super::enrollment::EnrollmentRecord;
use super::identifier::{DepartmentId, ProfessorId, StudentId};
use super::user::Role;

/// Department row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    /// Department key.
    pub id: DepartmentId,
    /// Department name.
    pub name: String,
    /// Building or campus.
    pub location: String,
}

/// Student row with its relationships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentSnapshot {
    /// Student key.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Unique email.
    pub email: String,
    /// Stored credential.
    pub password: String,
    /// `Student` or `StudentAdvisor`.
    pub role: Role,
    /// Advising student, if assigned.
    pub advisor_id: Option<StudentId>,
    /// Department memberships.
    pub department_ids: Vec<DepartmentId>,
}

/// Professor row with its relationships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessorSnapshot {
    /// Professor key.
    pub id: ProfessorId,
    /// Display name.
    pub name: String,
    /// Unique email.
    pub email: String,
    /// Stored credential.
    pub password: String,
    /// `Professor` or `AdministrativeStaff`.
    pub role: Role,
    /// Department memberships.
    pub department_ids: Vec<DepartmentId>,
}

/// Every entity held by the relational store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationalSnapshot {
    /// Departments.
    pub departments: Vec<Department>,
    /// Students and student advisors.
    pub students: Vec<StudentSnapshot>,
    /// Professors and administrators.
    pub professors: Vec<ProfessorSnapshot>,
    /// Courses.
    pub courses: Vec<Course>,
    /// Enrollments.
    pub enrollments: Vec<EnrollmentRecord>,
}

/// Counts of migrated entities per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MigrationStats {
    /// Departments written.
    pub departments: u64,
    /// Students written.
    pub students: u64,
    /// Professors written.
    pub professors: u64,
    /// Courses written.
    pub courses: u64,
    /// Enrollments written.
    pub enrollments: u64,
}

/// Counts of rows written by a database reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeedSummary {
    /// Departments inserted.
    pub departments: u64,
    /// Professors inserted, including the administrator.
    pub professors: u64,
    /// Students inserted.
    pub students: u64,
    /// Courses inserted.
    pub courses: u64,
    /// Enrollments inserted.
    pub enrollments: u64,
}

impl SeedSummary {
    /// Row counts a reset writes for `dataset`.
    pub fn of(dataset: &UniversityDataset) -> Self {
        Self {
            departments: count(dataset.departments.len()),
            professors: count(dataset.professors.len()).saturating_add(1),
            students: count(dataset.students.len()),
            courses: count(dataset.courses.len()),
            enrollments: count(dataset.enrollments.len()),
        }
    }
}

/// Widen a collection length for reporting.
pub(crate) fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
