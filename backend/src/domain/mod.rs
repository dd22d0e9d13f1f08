//! Domain primitives, services and ports.
//!
//! Purpose: hold the enrollment rules independent of any transport or store.
//! Entities keep their invariants in constructors; services implement the
//! driving ports in [`ports`] and talk to storage only through the driven
//! ports there.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Identifier codec and typed keys (`StudentId`, `CourseId`, ...).
//! - Course, EnrollmentRecord, Grade, Role, UserAccount entities.
//! - EnrollmentService, BackendAdminService, DatabaseResetService,
//!   StoreLoginService.

pub mod auth;
pub mod backend_admin_service;
pub mod backend_selector;
pub mod course;
pub mod course_locks;
pub mod database_reset_service;
pub mod enrollment;
pub mod enrollment_error;
pub mod enrollment_service;
pub mod error;
pub mod identifier;
pub mod login_service;
pub mod ports;
pub mod snapshot;
pub mod store_router;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::backend_admin_service::BackendAdminService;
pub use self::backend_selector::{BackendSelector, StorageBackend, UnknownBackend};
pub use self::course::{
    Course, CourseDraft, CourseValidationError, decrement_seats, increment_seats,
};
pub use self::course_locks::{CourseGuard, CourseLocks, DEFAULT_LOCK_TIMEOUT, LockTimeout};
pub use self::database_reset_service::DatabaseResetService;
pub use self::enrollment::{EnrollmentRecord, Grade, InvalidGrade};
pub use self::enrollment_error::EnrollmentError;
pub use self::enrollment_service::{EnrollmentService, NotificationPolicy};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identifier::{
    CourseId, DepartmentId, EnrollmentId, EntityKind, IdentifierError, ProfessorId, StudentId,
};
pub use self::login_service::StoreLoginService;
pub use self::snapshot::{
    Department, MigrationStats, ProfessorSnapshot, RelationalSnapshot, SeedSummary,
    StudentSnapshot,
};
pub use self::store_router::StoreRouter;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Role, StoredPassword, StudentProfile, UnknownRole, UserAccount, UserRef};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use registrar::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
