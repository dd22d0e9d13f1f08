//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate them with `diesel print-schema`
//! or update them by hand.

diesel::table! {
    /// Role lookup; keys 1 to 4 are fixed by the initial migration.
    roles (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    /// Academic departments.
    departments (id) {
        id -> Int8,
        name -> Varchar,
        location -> Varchar,
    }
}

diesel::table! {
    /// Professors and administrators.
    professors (id) {
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
    }
}

diesel::table! {
    /// Professor login accounts; `account_type` is `regular` or `admin`.
    professor_accounts (id) {
        id -> Int8,
        professor_id -> Int8,
        password -> Varchar,
        account_type -> Varchar,
    }
}

diesel::table! {
    professor_departments (professor_id, department_id) {
        professor_id -> Int8,
        department_id -> Int8,
    }
}

diesel::table! {
    /// Courses with their seat counters.
    courses (id) {
        id -> Int8,
        name -> Varchar,
        credits -> Int4,
        total_seats -> Int4,
        seats_available -> Int4,
        professor_id -> Nullable<Int8>,
    }
}

diesel::table! {
    /// Students and student advisors.
    students (id) {
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
        advisor_id -> Nullable<Int8>,
        role_id -> Int4,
    }
}

diesel::table! {
    /// Student login accounts.
    student_accounts (id) {
        id -> Int8,
        student_id -> Int8,
        password -> Varchar,
        account_type -> Varchar,
    }
}

diesel::table! {
    student_departments (student_id, department_id) {
        student_id -> Int8,
        department_id -> Int8,
    }
}

diesel::table! {
    /// Enrollments; `(student_id, course_id)` is unique.
    enrollments (id) {
        id -> Int8,
        student_id -> Int8,
        course_id -> Int8,
        grade -> Nullable<Varchar>,
        enrolled_at -> Timestamptz,
    }
}

diesel::table! {
    teaches (professor_id, course_id) {
        professor_id -> Int8,
        course_id -> Int8,
    }
}

diesel::table! {
    advises (professor_id, student_id) {
        professor_id -> Int8,
        student_id -> Int8,
    }
}

diesel::joinable!(professor_accounts -> professors (professor_id));
diesel::joinable!(professor_departments -> professors (professor_id));
diesel::joinable!(professor_departments -> departments (department_id));
diesel::joinable!(courses -> professors (professor_id));
diesel::joinable!(students -> roles (role_id));
diesel::joinable!(student_accounts -> students (student_id));
diesel::joinable!(student_departments -> students (student_id));
diesel::joinable!(student_departments -> departments (department_id));
diesel::joinable!(enrollments -> students (student_id));
diesel::joinable!(enrollments -> courses (course_id));
diesel::joinable!(teaches -> professors (professor_id));
diesel::joinable!(teaches -> courses (course_id));
diesel::joinable!(advises -> professors (professor_id));
diesel::joinable!(advises -> students (student_id));

diesel::allow_tables_to_appear_in_same_query!(
    roles,
    departments,
    professors,
    professor_accounts,
    professor_departments,
    courses,
    students,
    student_accounts,
    student_departments,
    enrollments,
    teaches,
    advises,
);
