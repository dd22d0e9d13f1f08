//! PostgreSQL-backed database reset adapter.
//!
//! Truncates every data table and loads a generated university inside one
//! transaction, so a failed reset leaves the previous data untouched. Key
//! sequences are moved past the seeded keys afterwards so later inserts do
//! not collide with them.

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use seed_data::UniversityDataset;
use tracing::info;

use crate::domain::SeedSummary;
use crate::domain::ports::{DatabaseResetError, DatabaseResetRepository};

use super::diesel_enrollment_store::ADMIN_ACCOUNT_TYPE;
use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    AdvisesRow, DepartmentRow, NewCourseRow, NewProfessorAccountRow, NewProfessorRow,
    NewStudentAccountRow, NewStudentRow, ProfessorDepartmentRow, SeedEnrollmentRow,
    StudentDepartmentRow, TeachesRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    advises, courses, departments, enrollments, professor_accounts, professor_departments,
    professors, student_accounts, student_departments, students, teaches,
};

/// `account_type` of every seeded non-admin account.
const REGULAR_ACCOUNT_TYPE: &str = "regular";

/// Rows per INSERT statement; keeps bind parameters well below the
/// PostgreSQL limit.
const INSERT_BATCH: usize = 500;

const TRUNCATE_SQL: &str = "TRUNCATE TABLE advises, teaches, enrollments, student_departments, \
     student_accounts, students, courses, professor_departments, professor_accounts, \
     professors, departments RESTART IDENTITY CASCADE";

/// Tables whose `id` sequence must follow the seeded keys.
const SEQUENCED_TABLES: [&str; 7] = [
    "departments",
    "professors",
    "professor_accounts",
    "courses",
    "students",
    "student_accounts",
    "enrollments",
];

/// Diesel-backed reset adapter.
#[derive(Clone)]
pub struct DieselDatabaseReset {
    pool: DbPool,
}

impl DieselDatabaseReset {
    /// Create a reset adapter over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> DatabaseResetError {
    map_pool_error(error, |message| DatabaseResetError::connection(message))
}

fn map_diesel(error: diesel::result::Error) -> DatabaseResetError {
    map_diesel_error(
        error,
        |message| DatabaseResetError::query(message),
        |message| DatabaseResetError::connection(message),
    )
}

fn sync_sequence_sql(table: &str) -> String {
    format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
         COALESCE((SELECT MAX(id) FROM {table}), 1), \
         (SELECT COUNT(*) > 0 FROM {table}))"
    )
}

macro_rules! insert_batched {
    ($conn:expr, $table:expr, $rows:expr) => {
        for batch in $rows.chunks(INSERT_BATCH) {
            diesel::insert_into($table)
                .values(batch)
                .execute($conn)
                .await?;
        }
    };
}

/// Every row the reset inserts, borrowed from the dataset.
struct SeedRows<'a> {
    departments: Vec<DepartmentRow>,
    professors: Vec<NewProfessorRow<'a>>,
    professor_accounts: Vec<NewProfessorAccountRow<'a>>,
    professor_departments: Vec<ProfessorDepartmentRow>,
    courses: Vec<NewCourseRow<'a>>,
    teaches: Vec<TeachesRow>,
    students: Vec<NewStudentRow<'a>>,
    student_accounts: Vec<NewStudentAccountRow<'a>>,
    student_departments: Vec<StudentDepartmentRow>,
    advises: Vec<AdvisesRow>,
    enrollments: Vec<SeedEnrollmentRow<'a>>,
}

impl<'a> SeedRows<'a> {
    fn from_dataset(dataset: &'a UniversityDataset) -> Self {
        let admin = &dataset.administrator;
        let professors = dataset
            .professors
            .iter()
            .map(|p| NewProfessorRow {
                id: p.id,
                name: &p.name,
                email: &p.email,
            })
            .chain(std::iter::once(NewProfessorRow {
                id: admin.id,
                name: &admin.name,
                email: &admin.email,
            }))
            .collect();
        let professor_accounts = dataset
            .professors
            .iter()
            .map(|p| NewProfessorAccountRow {
                professor_id: p.id,
                password: &p.password,
                account_type: REGULAR_ACCOUNT_TYPE,
            })
            .chain(std::iter::once(NewProfessorAccountRow {
                professor_id: admin.id,
                password: &admin.password,
                account_type: ADMIN_ACCOUNT_TYPE,
            }))
            .collect();

        // Advisors first so self-references resolve across batches.
        let mut students: Vec<NewStudentRow<'a>> = dataset
            .students
            .iter()
            .map(|s| NewStudentRow {
                id: s.id,
                name: &s.name,
                email: &s.email,
                advisor_id: s.advisor_id,
                role_id: s.role.id(),
            })
            .collect();
        students.sort_by_key(|row| (row.advisor_id.is_some(), row.id));

        Self {
            departments: dataset
                .departments
                .iter()
                .map(|d| DepartmentRow {
                    id: d.id,
                    name: d.name.clone(),
                    location: d.location.clone(),
                })
                .collect(),
            professors,
            professor_accounts,
            professor_departments: dataset
                .professors
                .iter()
                .flat_map(|p| {
                    p.department_ids.iter().map(|&department_id| ProfessorDepartmentRow {
                        professor_id: p.id,
                        department_id,
                    })
                })
                .collect(),
            courses: dataset
                .courses
                .iter()
                .map(|c| NewCourseRow {
                    id: c.id,
                    name: &c.name,
                    credits: c.credits,
                    total_seats: c.total_seats,
                    seats_available: c.seats_available,
                    professor_id: c.professor_id,
                })
                .collect(),
            teaches: dataset
                .courses
                .iter()
                .filter_map(|c| {
                    c.professor_id.map(|professor_id| TeachesRow {
                        professor_id,
                        course_id: c.id,
                    })
                })
                .collect(),
            students,
            student_accounts: dataset
                .students
                .iter()
                .map(|s| NewStudentAccountRow {
                    student_id: s.id,
                    password: &s.password,
                    account_type: REGULAR_ACCOUNT_TYPE,
                })
                .collect(),
            student_departments: dataset
                .students
                .iter()
                .flat_map(|s| {
                    s.department_ids.iter().map(|&department_id| StudentDepartmentRow {
                        student_id: s.id,
                        department_id,
                    })
                })
                .collect(),
            advises: dataset
                .students
                .iter()
                .filter_map(|s| {
                    s.faculty_advisor_id.map(|professor_id| AdvisesRow {
                        professor_id,
                        student_id: s.id,
                    })
                })
                .collect(),
            enrollments: dataset
                .enrollments
                .iter()
                .map(|e| SeedEnrollmentRow {
                    id: e.id,
                    student_id: e.student_id,
                    course_id: e.course_id,
                    grade: e.grade.map(|grade| grade.as_str()),
                })
                .collect(),
        }
    }
}

async fn load(conn: &mut AsyncPgConnection, rows: &SeedRows<'_>) -> Result<(), diesel::result::Error> {
    diesel::sql_query(TRUNCATE_SQL).execute(conn).await?;

    insert_batched!(conn, departments::table, rows.departments);
    insert_batched!(conn, professors::table, rows.professors);
    insert_batched!(conn, professor_accounts::table, rows.professor_accounts);
    insert_batched!(conn, professor_departments::table, rows.professor_departments);
    insert_batched!(conn, courses::table, rows.courses);
    insert_batched!(conn, teaches::table, rows.teaches);
    insert_batched!(conn, students::table, rows.students);
    insert_batched!(conn, student_accounts::table, rows.student_accounts);
    insert_batched!(conn, student_departments::table, rows.student_departments);
    insert_batched!(conn, advises::table, rows.advises);
    insert_batched!(conn, enrollments::table, rows.enrollments);

    for table in SEQUENCED_TABLES {
        diesel::sql_query(sync_sequence_sql(table))
            .execute(conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl DatabaseResetRepository for DieselDatabaseReset {
    async fn reset(&self, dataset: &UniversityDataset) -> Result<SeedSummary, DatabaseResetError> {
        let rows = SeedRows::from_dataset(dataset);
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        conn.transaction(|conn| async move { load(conn, &rows).await }.scope_boxed())
            .await
            .map_err(map_diesel)?;

        let summary = SeedSummary::of(dataset);
        info!(
            departments = summary.departments,
            professors = summary.professors,
            students = summary.students,
            courses = summary.courses,
            enrollments = summary.enrollments,
            "relational store reset"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use seed_data::{DatasetPlan, RoleSeed, generate_university};

    use super::*;

    fn dataset() -> UniversityDataset {
        generate_university(&DatasetPlan::default().with_students(40))
            .expect("default plan generates")
    }

    #[rstest]
    fn administrator_is_seeded_as_an_admin_professor() {
        let dataset = dataset();
        let rows = SeedRows::from_dataset(&dataset);

        assert_eq!(rows.professors.len(), dataset.professors.len() + 1);
        let admin_account = rows
            .professor_accounts
            .iter()
            .find(|account| account.professor_id == dataset.administrator.id)
            .expect("admin account present");
        assert_eq!(admin_account.account_type, ADMIN_ACCOUNT_TYPE);
        assert!(
            rows.professor_accounts
                .iter()
                .filter(|account| account.professor_id != dataset.administrator.id)
                .all(|account| account.account_type == REGULAR_ACCOUNT_TYPE)
        );
    }

    #[rstest]
    fn advisors_are_inserted_before_advisees() {
        let dataset = dataset();
        let rows = SeedRows::from_dataset(&dataset);

        let first_advisee = rows
            .students
            .iter()
            .position(|row| row.advisor_id.is_some())
            .unwrap_or(rows.students.len());
        assert!(
            rows.students[first_advisee..]
                .iter()
                .all(|row| row.advisor_id.is_some())
        );
        let unadvised = dataset
            .students
            .iter()
            .filter(|s| s.advisor_id.is_none())
            .count();
        assert_eq!(first_advisee, unadvised);
        assert!(
            dataset
                .students
                .iter()
                .filter(|s| s.role == RoleSeed::StudentAdvisor)
                .all(|s| s.advisor_id.is_none())
        );
    }

    #[rstest]
    fn teaching_links_follow_course_professors() {
        let dataset = dataset();
        let rows = SeedRows::from_dataset(&dataset);
        let taught = dataset
            .courses
            .iter()
            .filter(|course| course.professor_id.is_some())
            .count();
        assert_eq!(rows.teaches.len(), taught);
        assert_eq!(rows.enrollments.len(), dataset.enrollments.len());
    }

    #[rstest]
    fn sequence_sync_targets_each_table() {
        let sql = sync_sequence_sql("courses");
        assert!(sql.contains("pg_get_serial_sequence('courses', 'id')"));
        assert!(sql.contains("MAX(id) FROM courses"));
    }

    #[rstest]
    fn diesel_errors_are_query_errors() {
        let err = map_diesel(diesel::result::Error::NotFound);
        assert!(matches!(err, DatabaseResetError::Query { .. }));
    }
}
