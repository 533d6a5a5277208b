use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    response::Json,
};
use common::{StudentSubjectRow, SubjectOverview};
use model::entities::user::Role;
use query::{guard, student};
use tracing::instrument;

/// List the subjects the caller is enrolled in
#[utoipa::path(
    get,
    path = "/api/v1/student/subjects",
    tag = "student",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Subjects retrieved successfully", body = ApiResponse<Vec<StudentSubjectRow>>),
        (status = 403, description = "Not a student", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn list_subjects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<StudentSubjectRow>>>, ApiError> {
    guard::require_role(&user, &[Role::Student])?;
    let subjects = student::enrolled_subjects(&state.db, user.id).await?;

    Ok(Json(ApiResponse {
        data: subjects,
        message: "Subjects retrieved successfully".to_string(),
        success: true,
    }))
}

/// Detail view of one enrolled subject
///
/// Answers 404 both for unknown subjects and for subjects the caller is
/// not enrolled in.
#[utoipa::path(
    get,
    path = "/api/v1/student/subjects/{subject_id}",
    tag = "student",
    params(
        ("subject_id" = i32, Path, description = "Subject ID"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Subject retrieved successfully", body = ApiResponse<SubjectOverview>),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(subject_id))]
pub async fn subject_detail(
    Path(subject_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<SubjectOverview>>, ApiError> {
    guard::require_role(&user, &[Role::Student])?;
    let detail = student::subject_detail(&state.db, user.id, subject_id).await?;

    Ok(Json(ApiResponse {
        data: detail,
        message: "Subject retrieved successfully".to_string(),
        success: true,
    }))
}
