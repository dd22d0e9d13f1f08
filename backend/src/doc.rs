//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` endpoint plus the health probes. Swagger
//! UI serves it in debug builds, and `openapi-dump` writes it to stdout for
//! external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{ErrorCode, Grade, MigrationStats, Role, SeedSummary, StorageBackend};
use crate::inbound::http::admin::{
    BackendResponse, MigrationResponse, ResetResponse, SwitchBackendRequest,
};
use crate::inbound::http::courses::CourseResponse;
use crate::inbound::http::enrollments::{EnrollRequest, EnrollResponse, GradeRequest};
use crate::inbound::http::schemas::{ErrorResponse, SuccessResponse};
use crate::inbound::http::users::{LoginRequest, LoginResponse};
use crate::inbound::http::validation::ExternalId;

/// Register the two ways a caller can present its role.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/login.",
            ))),
        );
        components.add_security_scheme(
            "RoleHeader",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-User-Role",
                "Caller role; takes precedence over the session role.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Registrar API",
        description = "Course enrollment over interchangeable relational and document stores."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::enrollments::enroll,
        crate::inbound::http::enrollments::drop_enrollment,
        crate::inbound::http::enrollments::record_grade,
        crate::inbound::http::courses::get_course,
        crate::inbound::http::courses::delete_course,
        crate::inbound::http::admin::switch_backend,
        crate::inbound::http::admin::current_backend,
        crate::inbound::http::admin::migrate,
        crate::inbound::http::admin::reset_database,
        crate::inbound::http::users::login,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SuccessResponse,
        ErrorResponse,
        ErrorCode,
        ExternalId,
        EnrollRequest,
        EnrollResponse,
        GradeRequest,
        CourseResponse,
        SwitchBackendRequest,
        BackendResponse,
        MigrationResponse,
        ResetResponse,
        LoginRequest,
        LoginResponse,
        StorageBackend,
        MigrationStats,
        SeedSummary,
        Grade,
        Role,
    )),
    tags(
        (name = "enrollments", description = "Enroll, drop and grade"),
        (name = "courses", description = "Course lookup and removal"),
        (name = "admin", description = "Backend selection, migration and reset"),
        (name = "users", description = "Login"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
