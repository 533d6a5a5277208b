use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::SubjectAdminRow;
use model::entities::user::Role;
use query::coordinator::{self, NewSubject, SubjectChanges};
use query::guard;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a subject
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    /// Must reference an active user with role teacher
    pub teacher_id: i32,
    #[validate(range(min = 1, max = 20))]
    pub credits: Option<i32>,
}

/// List all subjects with their teachers
#[utoipa::path(
    get,
    path = "/api/v1/coordinator/subjects",
    tag = "coordinator",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Subjects retrieved successfully", body = ApiResponse<Vec<SubjectAdminRow>>),
        (status = 403, description = "Not a coordinator", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn list_subjects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<SubjectAdminRow>>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;
    let subjects = coordinator::list_subjects(&state.db).await?;

    Ok(Json(ApiResponse {
        data: subjects,
        message: "Subjects retrieved successfully".to_string(),
        success: true,
    }))
}

/// Create a subject owned by a teacher
#[utoipa::path(
    post,
    path = "/api/v1/coordinator/subjects",
    tag = "coordinator",
    request_body = CreateSubjectRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Subject created", body = ApiResponse<SubjectAdminRow>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not a coordinator", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn create_subject(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Valid(Json(request)): Valid<Json<CreateSubjectRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<SubjectAdminRow>>), ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;

    let subject = coordinator::create_subject(
        &state.db,
        NewSubject {
            name: request.name,
            code: request.code,
            teacher_id: request.teacher_id,
            credits: request.credits,
        },
    )
    .await?;

    coordinator::record_activity(
        &state.db,
        Some(user.id),
        "subject.create",
        Some(format!("subject {}", subject.id)),
    )
    .await;

    let row = SubjectAdminRow {
        id: subject.id,
        name: subject.name,
        code: subject.code,
        teacher_id: subject.teacher_id,
        teacher_name: None,
        is_active: subject.is_active,
    };
    let response = ApiResponse {
        data: row,
        message: "Subject created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Request body for patching a subject; absent fields stay untouched
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub code: Option<String>,
    pub teacher_id: Option<i32>,
    #[validate(range(min = 1, max = 20))]
    pub credits: Option<i32>,
    pub is_active: Option<bool>,
}

/// Patch a subject
#[utoipa::path(
    put,
    path = "/api/v1/coordinator/subjects/{subject_id}",
    tag = "coordinator",
    params(
        ("subject_id" = i32, Path, description = "Subject ID"),
    ),
    request_body = UpdateSubjectRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Subject updated", body = ApiResponse<SubjectAdminRow>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(subject_id))]
pub async fn update_subject(
    Path(subject_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Valid(Json(request)): Valid<Json<UpdateSubjectRequest>>,
) -> Result<Json<ApiResponse<SubjectAdminRow>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;

    let subject = coordinator::update_subject(
        &state.db,
        subject_id,
        SubjectChanges {
            name: request.name,
            code: request.code,
            teacher_id: request.teacher_id,
            credits: request.credits,
            is_active: request.is_active,
        },
    )
    .await?;

    let row = SubjectAdminRow {
        id: subject.id,
        name: subject.name,
        code: subject.code,
        teacher_id: subject.teacher_id,
        teacher_name: None,
        is_active: subject.is_active,
    };
    Ok(Json(ApiResponse {
        data: row,
        message: "Subject updated successfully".to_string(),
        success: true,
    }))
}

/// Deactivate a subject (soft delete)
#[utoipa::path(
    delete,
    path = "/api/v1/coordinator/subjects/{subject_id}",
    tag = "coordinator",
    params(
        ("subject_id" = i32, Path, description = "Subject ID"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Subject deactivated", body = ApiResponse<String>),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(subject_id))]
pub async fn deactivate_subject(
    Path(subject_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;
    coordinator::deactivate_subject(&state.db, subject_id).await?;

    Ok(Json(ApiResponse {
        data: format!("Subject {subject_id} deactivated"),
        message: "Subject deactivated successfully".to_string(),
        success: true,
    }))
}
