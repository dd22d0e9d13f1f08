//! Reads the whole relational store for the document migration.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{MigrationError, RelationalSnapshotSource};
use crate::domain::{
    Course, Department, DepartmentId, EnrollmentRecord, ProfessorId, ProfessorSnapshot,
    RelationalSnapshot, Role, StudentId, StudentSnapshot,
};

use super::diesel_enrollment_store::ADMIN_ACCOUNT_TYPE;
use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    CourseRow, DepartmentRow, EnrollmentRow, ProfessorDepartmentRow, ProfessorRow,
    StudentDepartmentRow, StudentRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    courses, departments, enrollments, professor_accounts, professor_departments, professors,
    student_accounts, student_departments, students,
};

/// Diesel-backed snapshot reader.
#[derive(Clone)]
pub struct DieselSnapshotSource {
    pool: DbPool,
}

impl DieselSnapshotSource {
    /// Create a source over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> MigrationError {
    map_pool_error(error, |message| MigrationError::connection(message))
}

fn map_diesel(error: diesel::result::Error) -> MigrationError {
    map_diesel_error(
        error,
        |message| MigrationError::source(message),
        |message| MigrationError::connection(message),
    )
}

struct SnapshotRows {
    departments: Vec<DepartmentRow>,
    students: Vec<(StudentRow, Option<String>)>,
    student_departments: Vec<StudentDepartmentRow>,
    professors: Vec<(ProfessorRow, Option<String>, Option<String>)>,
    professor_departments: Vec<ProfessorDepartmentRow>,
    courses: Vec<CourseRow>,
    enrollments: Vec<EnrollmentRow>,
}

/// Read every table in one transaction so the snapshot is consistent.
async fn fetch_rows(conn: &mut AsyncPgConnection) -> Result<SnapshotRows, MigrationError> {
    conn.transaction(|conn| {
        async move {
            let departments = departments::table
                .select(DepartmentRow::as_select())
                .order_by(departments::id)
                .load(conn)
                .await?;
            let students = students::table
                .left_join(student_accounts::table)
                .select((
                    StudentRow::as_select(),
                    student_accounts::password.nullable(),
                ))
                .order_by(students::id)
                .load(conn)
                .await?;
            let student_departments = student_departments::table
                .select(StudentDepartmentRow::as_select())
                .order_by((student_departments::student_id, student_departments::department_id))
                .load(conn)
                .await?;
            let professors = professors::table
                .left_join(professor_accounts::table)
                .select((
                    ProfessorRow::as_select(),
                    professor_accounts::password.nullable(),
                    professor_accounts::account_type.nullable(),
                ))
                .order_by(professors::id)
                .load(conn)
                .await?;
            let professor_departments = professor_departments::table
                .select(ProfessorDepartmentRow::as_select())
                .order_by((
                    professor_departments::professor_id,
                    professor_departments::department_id,
                ))
                .load(conn)
                .await?;
            let courses = courses::table
                .select(CourseRow::as_select())
                .order_by(courses::id)
                .load(conn)
                .await?;
            let enrollments = enrollments::table
                .select(EnrollmentRow::as_select())
                .order_by(enrollments::id)
                .load(conn)
                .await?;
            Ok(SnapshotRows {
                departments,
                students,
                student_departments,
                professors,
                professor_departments,
                courses,
                enrollments,
            })
        }
        .scope_boxed()
    })
    .await
    .map_err(map_diesel)
}

fn department_id(raw: i64) -> Result<DepartmentId, MigrationError> {
    DepartmentId::new(raw).map_err(|err| MigrationError::source(err.to_string()))
}

fn group_memberships(
    pairs: impl IntoIterator<Item = (i64, i64)>,
) -> Result<HashMap<i64, Vec<DepartmentId>>, MigrationError> {
    let mut grouped: HashMap<i64, Vec<DepartmentId>> = HashMap::new();
    for (owner, department) in pairs {
        grouped.entry(owner).or_default().push(department_id(department)?);
    }
    Ok(grouped)
}

fn convert(rows: SnapshotRows) -> Result<RelationalSnapshot, MigrationError> {
    let departments = rows
        .departments
        .into_iter()
        .map(|row| {
            Ok(Department {
                id: department_id(row.id)?,
                name: row.name,
                location: row.location,
            })
        })
        .collect::<Result<Vec<_>, MigrationError>>()?;

    let mut student_departments = group_memberships(
        rows.student_departments
            .into_iter()
            .map(|row| (row.student_id, row.department_id)),
    )?;
    let students = rows
        .students
        .into_iter()
        .map(|(row, password)| {
            Ok(StudentSnapshot {
                id: StudentId::new(row.id).map_err(|err| MigrationError::source(err.to_string()))?,
                role: Role::from_id(row.role_id)
                    .map_err(|err| MigrationError::source(err.to_string()))?,
                advisor_id: row
                    .advisor_id
                    .map(StudentId::new)
                    .transpose()
                    .map_err(|err| MigrationError::source(err.to_string()))?,
                department_ids: student_departments.remove(&row.id).unwrap_or_default(),
                name: row.name,
                email: row.email,
                password: password.unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, MigrationError>>()?;

    let mut professor_departments = group_memberships(
        rows.professor_departments
            .into_iter()
            .map(|row| (row.professor_id, row.department_id)),
    )?;
    let professors = rows
        .professors
        .into_iter()
        .map(|(row, password, account_type)| {
            let role = if account_type.as_deref() == Some(ADMIN_ACCOUNT_TYPE) {
                Role::AdministrativeStaff
            } else {
                Role::Professor
            };
            Ok(ProfessorSnapshot {
                id: ProfessorId::new(row.id)
                    .map_err(|err| MigrationError::source(err.to_string()))?,
                role,
                department_ids: professor_departments.remove(&row.id).unwrap_or_default(),
                name: row.name,
                email: row.email,
                password: password.unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, MigrationError>>()?;

    let courses = rows
        .courses
        .into_iter()
        .map(|row| Course::try_from(row).map_err(MigrationError::source))
        .collect::<Result<Vec<_>, _>>()?;
    let enrollments = rows
        .enrollments
        .into_iter()
        .map(|row| EnrollmentRecord::try_from(row).map_err(MigrationError::source))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RelationalSnapshot {
        departments,
        students,
        professors,
        courses,
        enrollments,
    })
}

#[async_trait]
impl RelationalSnapshotSource for DieselSnapshotSource {
    async fn load_snapshot(&self) -> Result<RelationalSnapshot, MigrationError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows = fetch_rows(&mut conn).await?;
        let snapshot = convert(rows)?;
        debug!(
            students = snapshot.students.len(),
            courses = snapshot.courses.len(),
            enrollments = snapshot.enrollments.len(),
            "relational snapshot loaded"
        );
        Ok(snapshot)
    }
}
