//! Enrollment API handlers.
//!
//! ```text
//! POST   /api/enroll {"studentId":1,"courseId":"CRS003"}
//! DELETE /api/drop/{enrollment_id}
//! PUT    /api/grade/{enrollment_id} {"grade":"A"}
//! ```

use actix_web::{HttpResponse, delete, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EnrollmentId, StorageBackend};
use crate::inbound::http::ApiResult;
use crate::inbound::http::role::CallerRole;
use crate::inbound::http::schemas::{ErrorResponse, SuccessResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ExternalId, FieldName, parse_course_id, parse_grade, parse_path_id, parse_student_id,
};

const STUDENT_ID: FieldName = FieldName::new("studentId");
const COURSE_ID: FieldName = FieldName::new("courseId");
const ENROLLMENT_ID: FieldName = FieldName::new("enrollmentId");
const GRADE: FieldName = FieldName::new("grade");

/// Enrollment request body. Snake-case keys are accepted too.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    #[serde(alias = "student_id")]
    #[schema(value_type = String, example = "STU001")]
    pub student_id: ExternalId,
    #[serde(alias = "course_id")]
    #[schema(value_type = String, example = "3")]
    pub course_id: ExternalId,
}

/// Successful enrollment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    pub success: bool,
    /// Enrollment id as the active backend presents it.
    #[schema(example = "ENR00042")]
    pub id: String,
    pub backend: StorageBackend,
}

/// Grade update body; `null` clears the grade.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GradeRequest {
    #[schema(example = "A")]
    pub grade: Option<String>,
}

fn enrollment_id(raw: &str) -> ApiResult<EnrollmentId> {
    parse_path_id(raw, ENROLLMENT_ID, EnrollmentId::from_external)
}

/// Enroll a student in a course, taking one seat.
#[utoipa::path(
    post,
    path = "/api/enroll",
    request_body = EnrollRequest,
    responses(
        (status = 200, description = "Enrolled", body = EnrollResponse),
        (status = 400, description = "Duplicate enrollment, no seats or invalid ids", body = ErrorResponse),
        (status = 404, description = "Course or student not found", body = ErrorResponse),
        (status = 500, description = "Storage or notification failure", body = ErrorResponse),
        (status = 503, description = "Store unavailable or course busy", body = ErrorResponse)
    ),
    tags = ["enrollments"],
    operation_id = "enroll"
)]
#[post("/enroll")]
pub async fn enroll(
    state: web::Data<HttpState>,
    payload: web::Json<EnrollRequest>,
) -> ApiResult<web::Json<EnrollResponse>> {
    let student_id = parse_student_id(&payload.student_id, STUDENT_ID)?;
    let course_id = parse_course_id(&payload.course_id, COURSE_ID)?;
    let receipt = state.enrollments.enroll(student_id, course_id).await?;
    Ok(web::Json(EnrollResponse {
        success: true,
        id: receipt.external_id,
        backend: receipt.backend,
    }))
}

/// Drop an enrollment, giving its seat back.
#[utoipa::path(
    delete,
    path = "/api/drop/{enrollment_id}",
    params(("enrollment_id" = String, Path, description = "Numeric or ENR-prefixed id")),
    responses(
        (status = 200, description = "Dropped", body = SuccessResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    tags = ["enrollments"],
    operation_id = "dropEnrollment"
)]
#[delete("/drop/{enrollment_id}")]
pub async fn drop_enrollment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let id = enrollment_id(&path)?;
    state.enrollments.drop_enrollment(id).await?;
    Ok(web::Json(SuccessResponse::ok()))
}

/// Record or clear a grade. Requires a professor or administrative role.
#[utoipa::path(
    put,
    path = "/api/grade/{enrollment_id}",
    params(
        ("enrollment_id" = String, Path, description = "Numeric or ENR-prefixed id"),
        ("X-User-Role" = Option<String>, Header, description = "Caller role")
    ),
    request_body = GradeRequest,
    responses(
        (status = 200, description = "Grade stored", body = SuccessResponse),
        (status = 400, description = "Invalid id or grade", body = ErrorResponse),
        (status = 401, description = "Caller role missing", body = ErrorResponse),
        (status = 403, description = "Caller may not grade", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    tags = ["enrollments"],
    operation_id = "recordGrade"
)]
#[put("/grade/{enrollment_id}")]
pub async fn record_grade(
    state: web::Data<HttpState>,
    caller: CallerRole,
    path: web::Path<String>,
    payload: web::Json<GradeRequest>,
) -> ApiResult<HttpResponse> {
    caller.require_grader()?;
    let id = enrollment_id(&path)?;
    let grade = parse_grade(payload.grade.as_deref(), GRADE)?;
    state.enrollments.record_grade(id, grade).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}
