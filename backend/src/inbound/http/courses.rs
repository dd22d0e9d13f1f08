//! Course handlers.
//!
//! ```text
//! GET    /api/courses/{course_id}
//! DELETE /api/courses/{course_id}
//! ```

use actix_web::{delete, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CourseOverview;
use crate::domain::{CourseId, StorageBackend};
use crate::inbound::http::ApiResult;
use crate::inbound::http::role::CallerRole;
use crate::inbound::http::schemas::{ErrorResponse, SuccessResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_path_id};

const COURSE_ID: FieldName = FieldName::new("courseId");

/// Course with live seat counters.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub success: bool,
    #[schema(example = "CRS003")]
    pub id: String,
    pub name: String,
    pub credits: i32,
    pub total_seats: i32,
    pub seats_available: i32,
    /// Enrollments currently referencing the course.
    pub enrolled: i64,
    #[schema(example = "PROF002")]
    pub professor_id: Option<String>,
    pub backend: StorageBackend,
}

impl From<CourseOverview> for CourseResponse {
    fn from(value: CourseOverview) -> Self {
        let CourseOverview {
            course,
            enrolled,
            backend,
        } = value;
        let id = match backend {
            StorageBackend::Relational => course.id().to_string(),
            StorageBackend::Document => course.id().to_opaque(),
        };
        let professor_id = course.professor_id().map(|professor| match backend {
            StorageBackend::Relational => professor.to_string(),
            StorageBackend::Document => professor.to_opaque(),
        });
        Self {
            success: true,
            id,
            name: course.name().to_owned(),
            credits: course.credits(),
            total_seats: course.total_seats(),
            seats_available: course.seats_available(),
            enrolled,
            professor_id,
            backend,
        }
    }
}

fn course_id(raw: &str) -> ApiResult<CourseId> {
    parse_path_id(raw, COURSE_ID, CourseId::from_external)
}

/// Load a course with its seat counters from the active backend.
#[utoipa::path(
    get,
    path = "/api/courses/{course_id}",
    params(("course_id" = String, Path, description = "Numeric or CRS-prefixed id")),
    responses(
        (status = 200, description = "Course", body = CourseResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tags = ["courses"],
    operation_id = "getCourse"
)]
#[get("/courses/{course_id}")]
pub async fn get_course(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CourseResponse>> {
    let id = course_id(&path)?;
    let overview = state.courses.get_course(id).await?;
    Ok(web::Json(CourseResponse::from(overview)))
}

/// Delete a course with its enrollments and teaching links.
#[utoipa::path(
    delete,
    path = "/api/courses/{course_id}",
    params(
        ("course_id" = String, Path, description = "Numeric or CRS-prefixed id"),
        ("X-User-Role" = Option<String>, Header, description = "Caller role")
    ),
    responses(
        (status = 200, description = "Course deleted", body = SuccessResponse),
        (status = 403, description = "Administrative role required", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tags = ["courses"],
    operation_id = "deleteCourse"
)]
#[delete("/courses/{course_id}")]
pub async fn delete_course(
    state: web::Data<HttpState>,
    caller: CallerRole,
    path: web::Path<String>,
) -> ApiResult<web::Json<SuccessResponse>> {
    caller.require_administrative()?;
    let id = course_id(&path)?;
    state.enrollments.delete_course(id).await?;
    Ok(web::Json(SuccessResponse::ok()))
}
