use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    response::Json,
};
use common::{SubjectOverview, TeacherSubjectRow, TopicRow};
use model::entities::user::Role;
use query::{guard, teacher};
use tracing::instrument;

/// List the subjects taught by the caller
#[utoipa::path(
    get,
    path = "/api/v1/teacher/subjects",
    tag = "teacher",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Subjects retrieved successfully", body = ApiResponse<Vec<TeacherSubjectRow>>),
        (status = 403, description = "Not a teacher", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn list_subjects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<TeacherSubjectRow>>>, ApiError> {
    guard::require_role(&user, &[Role::Teacher])?;
    let subjects = teacher::subjects_taught(&state.db, user.id).await?;

    Ok(Json(ApiResponse {
        data: subjects,
        message: "Subjects retrieved successfully".to_string(),
        success: true,
    }))
}

/// Detail view of one owned subject
#[utoipa::path(
    get,
    path = "/api/v1/teacher/subjects/{subject_id}",
    tag = "teacher",
    params(
        ("subject_id" = i32, Path, description = "Subject ID"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Subject retrieved successfully", body = ApiResponse<SubjectOverview>),
        (status = 403, description = "Subject taught by another teacher", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(subject_id))]
pub async fn subject_overview(
    Path(subject_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<SubjectOverview>>, ApiError> {
    guard::require_role(&user, &[Role::Teacher])?;
    let overview = teacher::subject_overview(&state.db, user.id, subject_id).await?;

    Ok(Json(ApiResponse {
        data: overview,
        message: "Subject retrieved successfully".to_string(),
        success: true,
    }))
}

/// Mark a topic of an owned subject as covered
#[utoipa::path(
    post,
    path = "/api/v1/teacher/topics/{topic_id}/complete",
    tag = "teacher",
    params(
        ("topic_id" = i32, Path, description = "Topic ID"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Topic marked complete", body = ApiResponse<TopicRow>),
        (status = 403, description = "Topic belongs to another teacher's subject", body = ErrorResponse),
        (status = 404, description = "Topic not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(topic_id))]
pub async fn mark_topic_complete(
    Path(topic_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<TopicRow>>, ApiError> {
    guard::require_role(&user, &[Role::Teacher])?;
    let topic = teacher::mark_topic_complete(&state.db, user.id, topic_id).await?;

    Ok(Json(ApiResponse {
        data: topic,
        message: "Topic marked complete".to_string(),
        success: true,
    }))
}
