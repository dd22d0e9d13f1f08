//! PostgreSQL-backed `EnrollmentStore` adapter.
//!
//! Enrollment mutations run inside a transaction that locks the course row
//! with `SELECT ... FOR UPDATE`, re-checks the duplicate and capacity rules,
//! and only then writes. Concurrent requests for the same course serialise on
//! that lock even across processes, and any failure rolls the whole
//! operation back.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{EnrollmentStore, EnrollmentStoreError};
use crate::domain::{
    Course, CourseId, EnrollmentId, EnrollmentRecord, Grade, ProfessorId, Role, StoredPassword,
    StudentId, StudentProfile, UserAccount, UserRef, increment_seats,
};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{CourseRow, EnrollmentRow, NewEnrollmentRow, ProfessorRow, StudentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{
    courses, enrollments, professor_accounts, professors, student_accounts, students, teaches,
};

/// Unique constraint guarding one enrollment per (student, course) pair.
const ENROLLMENT_PAIR_CONSTRAINT: &str = "enrollments_student_course_unique";

/// `account_type` marking the administrator's professor account.
pub(crate) const ADMIN_ACCOUNT_TYPE: &str = "admin";

/// Diesel-backed enrollment store.
#[derive(Clone)]
pub struct DieselEnrollmentStore {
    pool: DbPool,
}

impl DieselEnrollmentStore {
    /// Create a store over the given pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use registrar::outbound::persistence::{DbPool, DieselEnrollmentStore, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/university")).await?;
    /// let store = DieselEnrollmentStore::new(pool);
    /// # let _ = store;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> EnrollmentStoreError {
    map_pool_error(error, |message| EnrollmentStoreError::connection(message))
}

fn map_diesel(error: diesel::result::Error) -> EnrollmentStoreError {
    map_diesel_error(
        error,
        |message| EnrollmentStoreError::query(message),
        |message| EnrollmentStoreError::connection(message),
    )
}

/// Failure inside a transaction: either a rule the adapter enforces or a
/// database error that still needs classifying.
#[derive(Debug)]
enum TxError {
    Rule(EnrollmentStoreError),
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

impl From<EnrollmentStoreError> for TxError {
    fn from(error: EnrollmentStoreError) -> Self {
        Self::Rule(error)
    }
}

fn map_tx_error(
    error: TxError,
    student_id: StudentId,
    course_id: CourseId,
) -> EnrollmentStoreError {
    match error {
        TxError::Rule(rule) => rule,
        // A concurrent writer won the race for the same pair.
        TxError::Database(db) if is_unique_violation(&db, ENROLLMENT_PAIR_CONSTRAINT) => {
            EnrollmentStoreError::duplicate_enrollment(student_id, course_id)
        }
        TxError::Database(db) => map_diesel(db),
    }
}

fn course_from_row(row: CourseRow) -> Result<Course, EnrollmentStoreError> {
    Course::try_from(row).map_err(EnrollmentStoreError::query)
}

fn enrollment_from_row(row: EnrollmentRow) -> Result<EnrollmentRecord, EnrollmentStoreError> {
    EnrollmentRecord::try_from(row).map_err(EnrollmentStoreError::query)
}

fn student_account(row: StudentRow, password: String) -> Result<UserAccount, EnrollmentStoreError> {
    let id = StudentId::new(row.id).map_err(|err| EnrollmentStoreError::query(err.to_string()))?;
    let role = Role::from_id(row.role_id).map_err(|err| EnrollmentStoreError::query(err.to_string()))?;
    Ok(UserAccount {
        id: UserRef::Student(id),
        name: row.name,
        email: row.email,
        role,
        password: StoredPassword::new(password),
    })
}

fn professor_account(
    row: ProfessorRow,
    password: String,
    account_type: &str,
) -> Result<UserAccount, EnrollmentStoreError> {
    let id =
        ProfessorId::new(row.id).map_err(|err| EnrollmentStoreError::query(err.to_string()))?;
    let role = if account_type == ADMIN_ACCOUNT_TYPE {
        Role::AdministrativeStaff
    } else {
        Role::Professor
    };
    Ok(UserAccount {
        id: UserRef::Professor(id),
        name: row.name,
        email: row.email,
        role,
        password: StoredPassword::new(password),
    })
}

#[async_trait]
impl EnrollmentStore for DieselEnrollmentStore {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, EnrollmentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let student: Option<(StudentRow, String)> = students::table
            .inner_join(student_accounts::table)
            .filter(students::email.eq(email))
            .select((StudentRow::as_select(), student_accounts::password))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        if let Some((row, password)) = student {
            return student_account(row, password).map(Some);
        }

        let professor: Option<(ProfessorRow, String, String)> = professors::table
            .inner_join(professor_accounts::table)
            .filter(professors::email.eq(email))
            .select((
                ProfessorRow::as_select(),
                professor_accounts::password,
                professor_accounts::account_type,
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        professor
            .map(|(row, password, account_type)| professor_account(row, password, &account_type))
            .transpose()
    }

    async fn find_student(
        &self,
        student_id: StudentId,
    ) -> Result<Option<StudentProfile>, EnrollmentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<StudentRow> = students::table
            .find(student_id.get())
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(|row| StudentProfile {
            id: student_id,
            name: row.name,
            email: row.email,
        }))
    }

    async fn find_course_by_id(
        &self,
        course_id: CourseId,
    ) -> Result<Option<Course>, EnrollmentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<CourseRow> = courses::table
            .find(course_id.get())
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(course_from_row).transpose()
    }

    async fn count_enrollments(&self, course_id: CourseId) -> Result<i64, EnrollmentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        enrollments::table
            .filter(enrollments::course_id.eq(course_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)
    }

    async fn enrollment_exists(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<bool, EnrollmentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::select(exists(
            enrollments::table
                .filter(enrollments::student_id.eq(student_id.get()))
                .filter(enrollments::course_id.eq(course_id.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel)
    }

    async fn find_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<EnrollmentRecord>, EnrollmentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<EnrollmentRow> = enrollments::table
            .find(enrollment_id.get())
            .select(EnrollmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(enrollment_from_row).transpose()
    }

    async fn create_enrollment(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<EnrollmentRecord, EnrollmentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let locked: Option<CourseRow> = courses::table
                        .find(course_id.get())
                        .select(CourseRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let course = locked
                        .ok_or_else(|| EnrollmentStoreError::course_not_found(course_id))
                        .and_then(course_from_row)?;

                    let student_exists: bool =
                        diesel::select(exists(students::table.find(student_id.get())))
                            .get_result(conn)
                            .await?;
                    if !student_exists {
                        return Err(EnrollmentStoreError::student_not_found(student_id).into());
                    }

                    let duplicate: bool = diesel::select(exists(
                        enrollments::table
                            .filter(enrollments::student_id.eq(student_id.get()))
                            .filter(enrollments::course_id.eq(course_id.get())),
                    ))
                    .get_result(conn)
                    .await?;
                    if duplicate {
                        return Err(EnrollmentStoreError::duplicate_enrollment(
                            student_id, course_id,
                        )
                        .into());
                    }

                    let enrolled: i64 = enrollments::table
                        .filter(enrollments::course_id.eq(course_id.get()))
                        .count()
                        .get_result(conn)
                        .await?;
                    if !course.has_capacity(enrolled) {
                        return Err(EnrollmentStoreError::capacity_exceeded(course_id).into());
                    }

                    let row: EnrollmentRow = diesel::insert_into(enrollments::table)
                        .values(&NewEnrollmentRow {
                            student_id: student_id.get(),
                            course_id: course_id.get(),
                        })
                        .returning(EnrollmentRow::as_returning())
                        .get_result(conn)
                        .await?;

                    diesel::update(courses::table.find(course_id.get()))
                        .set(courses::seats_available.eq(course.decremented_seats()))
                        .execute(conn)
                        .await?;

                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_tx_error(err, student_id, course_id))?;

        debug!(enrollment_id = row.id, "enrollment row inserted");
        enrollment_from_row(row)
    }

    async fn drop_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<(), EnrollmentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let enrollment: Option<EnrollmentRow> = enrollments::table
                    .find(enrollment_id.get())
                    .select(EnrollmentRow::as_select())
                    .first(conn)
                    .await
                    .optional()?;
                let Some(enrollment) = enrollment else {
                    return Err(EnrollmentStoreError::enrollment_not_found(enrollment_id).into());
                };

                // Lock the course before touching its counter.
                let seats: Option<(i32, i32)> = courses::table
                    .find(enrollment.course_id)
                    .select((courses::seats_available, courses::total_seats))
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;

                let deleted = diesel::delete(enrollments::table.find(enrollment_id.get()))
                    .execute(conn)
                    .await?;
                if deleted == 0 {
                    return Err(EnrollmentStoreError::enrollment_not_found(enrollment_id).into());
                }

                if let Some((seats_available, total_seats)) = seats {
                    diesel::update(courses::table.find(enrollment.course_id))
                        .set(
                            courses::seats_available
                                .eq(increment_seats(seats_available, total_seats)),
                        )
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| match err {
            TxError::Rule(rule) => rule,
            TxError::Database(db) => map_diesel(db),
        })
    }

    async fn record_grade(
        &self,
        enrollment_id: EnrollmentId,
        grade: Option<Grade>,
    ) -> Result<(), EnrollmentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let updated = diesel::update(enrollments::table.find(enrollment_id.get()))
            .set(enrollments::grade.eq(grade.map(Grade::as_str)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        if updated == 0 {
            return Err(EnrollmentStoreError::enrollment_not_found(enrollment_id));
        }
        Ok(())
    }

    async fn delete_course(&self, course_id: CourseId) -> Result<(), EnrollmentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let removed_enrollments =
                    diesel::delete(enrollments::table.filter(enrollments::course_id.eq(course_id.get())))
                        .execute(conn)
                        .await?;
                diesel::delete(teaches::table.filter(teaches::course_id.eq(course_id.get())))
                    .execute(conn)
                    .await?;
                let removed = diesel::delete(courses::table.find(course_id.get()))
                    .execute(conn)
                    .await?;
                if removed == 0 {
                    return Err(EnrollmentStoreError::course_not_found(course_id).into());
                }
                debug!(course_id = course_id.get(), removed_enrollments, "course deleted");
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| match err {
            TxError::Rule(rule) => rule,
            TxError::Database(db) => map_diesel(db),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Error classification and row conversion; queries are exercised against
    //! a live database by the integration suite.
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    fn student() -> StudentId {
        StudentId::new(3).expect("positive")
    }

    fn course() -> CourseId {
        CourseId::new(9).expect("positive")
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool(PoolError::checkout("connection refused"));
        assert!(matches!(err, EnrollmentStoreError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let err = map_diesel(DieselError::NotFound);
        assert!(matches!(err, EnrollmentStoreError::Query { .. }));
        assert!(err.to_string().contains("record not found"));
    }

    #[rstest]
    fn rule_failures_pass_through_transactions() {
        let err = map_tx_error(
            EnrollmentStoreError::capacity_exceeded(course()).into(),
            student(),
            course(),
        );
        assert_eq!(err, EnrollmentStoreError::capacity_exceeded(course()));
    }

    #[rstest]
    fn unnamed_unique_violations_stay_query_errors() {
        let db = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_owned()),
        );
        let err = map_tx_error(TxError::Database(db), student(), course());
        assert!(matches!(err, EnrollmentStoreError::Query { .. }));
    }

    #[rstest]
    #[case("admin", Role::AdministrativeStaff)]
    #[case("regular", Role::Professor)]
    fn professor_accounts_derive_role_from_account_type(
        #[case] account_type: &str,
        #[case] expected: Role,
    ) {
        let row = ProfessorRow {
            id: 1,
            name: "Test Admin".to_owned(),
            email: "admin@university.com".to_owned(),
        };
        let account =
            professor_account(row, "admin123".to_owned(), account_type).expect("valid row");
        assert_eq!(account.role, expected);
        assert_eq!(account.id, UserRef::Professor(ProfessorId::new(1).expect("positive")));
    }

    #[rstest]
    #[case(1, Role::Student)]
    #[case(2, Role::StudentAdvisor)]
    fn student_accounts_derive_role_from_role_id(#[case] role_id: i32, #[case] expected: Role) {
        let row = StudentRow {
            id: 7,
            name: "Test Student".to_owned(),
            email: "test@student.com".to_owned(),
            advisor_id: None,
            role_id,
        };
        let account = student_account(row, "password123".to_owned()).expect("valid row");
        assert_eq!(account.role, expected);
        assert_eq!(account.password.expose(), "password123");
    }

    #[rstest]
    fn unknown_role_ids_are_query_errors() {
        let row = StudentRow {
            id: 7,
            name: "Ghost".to_owned(),
            email: "ghost@student.com".to_owned(),
            advisor_id: None,
            role_id: 42,
        };
        let err = student_account(row, String::new()).expect_err("unknown role");
        assert!(matches!(err, EnrollmentStoreError::Query { .. }));
    }
}
