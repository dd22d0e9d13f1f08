//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types validate
//! invariants and report violations as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Course, CourseDraft, CourseId, EnrollmentId, EnrollmentRecord, Grade, ProfessorId, StudentId,
};

use super::schema::{
    advises, courses, departments, enrollments, professor_accounts, professor_departments,
    professors, student_accounts, student_departments, students, teaches,
};

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: i64,
    pub name: String,
    pub credits: i32,
    pub total_seats: i32,
    pub seats_available: i32,
    pub professor_id: Option<i64>,
}

impl TryFrom<CourseRow> for Course {
    type Error = String;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let id = CourseId::new(row.id).map_err(|err| err.to_string())?;
        let professor_id = row
            .professor_id
            .map(ProfessorId::new)
            .transpose()
            .map_err(|err| err.to_string())?;
        Course::try_new(CourseDraft {
            id,
            name: row.name,
            credits: row.credits,
            total_seats: row.total_seats,
            seats_available: row.seats_available,
            professor_id,
        })
        .map_err(|err| format!("course {}: {err}", row.id))
    }
}

/// Row struct for reading from the enrollments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub grade: Option<String>,
    pub enrolled_at: DateTime<Utc>,
}

impl TryFrom<EnrollmentRow> for EnrollmentRecord {
    type Error = String;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EnrollmentId::new(row.id).map_err(|err| err.to_string())?,
            student_id: StudentId::new(row.student_id).map_err(|err| err.to_string())?,
            course_id: CourseId::new(row.course_id).map_err(|err| err.to_string())?,
            grade: row
                .grade
                .as_deref()
                .map(str::parse::<Grade>)
                .transpose()
                .map_err(|err| err.to_string())?,
            enrolled_at: row.enrolled_at,
        })
    }
}

/// Insertable struct for new enrollments; the key is database-assigned.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = enrollments)]
pub(crate) struct NewEnrollmentRow {
    pub student_id: i64,
    pub course_id: i64,
}

/// Row struct for reading from the students table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub advisor_id: Option<i64>,
    pub role_id: i32,
}

/// Row struct for reading from the professors table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = professors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfessorRow {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Row struct for departments, used for both reads and seeding.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DepartmentRow {
    pub id: i64,
    pub name: String,
    pub location: String,
}

/// Professor–department membership.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = professor_departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfessorDepartmentRow {
    pub professor_id: i64,
    pub department_id: i64,
}

/// Student–department membership.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = student_departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentDepartmentRow {
    pub student_id: i64,
    pub department_id: i64,
}

// ---------------------------------------------------------------------------
// Seed inserts with explicit keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = professors)]
pub(crate) struct NewProfessorRow<'a> {
    pub id: i64,
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = professor_accounts)]
pub(crate) struct NewProfessorAccountRow<'a> {
    pub professor_id: i64,
    pub password: &'a str,
    pub account_type: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub(crate) struct NewStudentRow<'a> {
    pub id: i64,
    pub name: &'a str,
    pub email: &'a str,
    pub advisor_id: Option<i64>,
    pub role_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = student_accounts)]
pub(crate) struct NewStudentAccountRow<'a> {
    pub student_id: i64,
    pub password: &'a str,
    pub account_type: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub(crate) struct NewCourseRow<'a> {
    pub id: i64,
    pub name: &'a str,
    pub credits: i32,
    pub total_seats: i32,
    pub seats_available: i32,
    pub professor_id: Option<i64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = enrollments)]
pub(crate) struct SeedEnrollmentRow<'a> {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub grade: Option<&'a str>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teaches)]
pub(crate) struct TeachesRow {
    pub professor_id: i64,
    pub course_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = advises)]
pub(crate) struct AdvisesRow {
    pub professor_id: i64,
    pub student_id: i64,
}
