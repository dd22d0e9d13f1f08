//! Backend administration handlers.
//!
//! ```text
//! POST /api/switch-backend {"database":"document"}
//! GET  /api/current-backend
//! POST /api/migrate
//! POST /api/reset-database
//! ```
//!
//! Mutating endpoints require the `administrative_staff` role.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{MigrationStats, SeedSummary, StorageBackend};
use crate::inbound::http::ApiResult;
use crate::inbound::http::role::CallerRole;
use crate::inbound::http::schemas::ErrorResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, unknown_backend_error};

const DATABASE: FieldName = FieldName::new("database");

/// Backend switch request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SwitchBackendRequest {
    /// `relational` or `document`.
    #[schema(example = "document")]
    pub database: String,
}

/// Backend consulted by subsequent operations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackendResponse {
    pub success: bool,
    pub current_db: StorageBackend,
}

/// Row counts copied by a migration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MigrationResponse {
    pub success: bool,
    pub stats: MigrationStats,
}

/// Row counts inserted by a reset.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResetResponse {
    pub success: bool,
    pub summary: SeedSummary,
}

/// Point subsequent operations at another storage backend.
#[utoipa::path(
    post,
    path = "/api/switch-backend",
    request_body = SwitchBackendRequest,
    params(("X-User-Role" = Option<String>, Header, description = "Caller role")),
    responses(
        (status = 200, description = "Backend switched", body = BackendResponse),
        (status = 400, description = "Unknown backend", body = ErrorResponse),
        (status = 401, description = "Caller role missing", body = ErrorResponse),
        (status = 403, description = "Administrative role required", body = ErrorResponse)
    ),
    tags = ["admin"],
    operation_id = "switchBackend"
)]
#[post("/switch-backend")]
pub async fn switch_backend(
    state: web::Data<HttpState>,
    caller: CallerRole,
    payload: web::Json<SwitchBackendRequest>,
) -> ApiResult<web::Json<BackendResponse>> {
    caller.require_administrative()?;
    let backend = payload
        .database
        .parse::<StorageBackend>()
        .map_err(|_| unknown_backend_error(DATABASE, &payload.database))?;
    let current_db = state.admin.switch_to(backend).await?;
    Ok(web::Json(BackendResponse {
        success: true,
        current_db,
    }))
}

/// Report the active storage backend.
#[utoipa::path(
    get,
    path = "/api/current-backend",
    responses((status = 200, description = "Active backend", body = BackendResponse)),
    tags = ["admin"],
    operation_id = "currentBackend"
)]
#[get("/current-backend")]
pub async fn current_backend(state: web::Data<HttpState>) -> web::Json<BackendResponse> {
    web::Json(BackendResponse {
        success: true,
        current_db: state.admin.current(),
    })
}

/// Copy the relational store into the document store.
#[utoipa::path(
    post,
    path = "/api/migrate",
    params(("X-User-Role" = Option<String>, Header, description = "Caller role")),
    responses(
        (status = 200, description = "Migration finished", body = MigrationResponse),
        (status = 403, description = "Administrative role required", body = ErrorResponse),
        (status = 500, description = "Migration failed", body = ErrorResponse),
        (status = 503, description = "A store is unavailable", body = ErrorResponse)
    ),
    tags = ["admin"],
    operation_id = "migrate"
)]
#[post("/migrate")]
pub async fn migrate(
    state: web::Data<HttpState>,
    caller: CallerRole,
) -> ApiResult<web::Json<MigrationResponse>> {
    caller.require_administrative()?;
    let stats = state.admin.migrate().await?;
    Ok(web::Json(MigrationResponse {
        success: true,
        stats,
    }))
}

/// Wipe the relational store and load freshly generated seed data.
#[utoipa::path(
    post,
    path = "/api/reset-database",
    params(("X-User-Role" = Option<String>, Header, description = "Caller role")),
    responses(
        (status = 200, description = "Database reseeded", body = ResetResponse),
        (status = 403, description = "Administrative role required", body = ErrorResponse),
        (status = 500, description = "Reset failed", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    ),
    tags = ["admin"],
    operation_id = "resetDatabase"
)]
#[post("/reset-database")]
pub async fn reset_database(
    state: web::Data<HttpState>,
    caller: CallerRole,
) -> ApiResult<web::Json<ResetResponse>> {
    let role = caller.require_administrative()?;
    info!(%role, "database reset requested");
    let summary = state.reset.reset().await?;
    Ok(web::Json(ResetResponse {
        success: true,
        summary,
    }))
}
