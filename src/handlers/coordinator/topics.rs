use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use common::TopicRow;
use model::entities::user::Role;
use query::coordinator::{self, TopicChanges};
use query::{guard, QueryError};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

/// Request body for adding a topic at the end of a subject's syllabus
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTopicRequest {
    pub name: String,
    /// Expected coverage date, YYYY-MM-DD
    pub expected_date: Option<String>,
}

/// Request body for patching a topic. An empty `expected_date` string
/// clears the date.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTopicRequest {
    pub name: Option<String>,
    pub expected_date: Option<String>,
}

/// Request body for reordering a subject's topics. `order` must be
/// exactly the subject's current topic ids in the desired order.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReorderTopicsRequest {
    pub order: Vec<i32>,
}

fn parse_date(value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| QueryError::Validation("expected_date must be YYYY-MM-DD".to_string()))
}

/// List a subject's topics in syllabus order
#[utoipa::path(
    get,
    path = "/api/v1/coordinator/subjects/{subject_id}/topics",
    tag = "coordinator",
    params(
        ("subject_id" = i32, Path, description = "Subject ID"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Topics retrieved successfully", body = ApiResponse<Vec<TopicRow>>),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(subject_id))]
pub async fn list_topics(
    Path(subject_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<TopicRow>>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;
    let topics = coordinator::list_topics(&state.db, subject_id).await?;

    Ok(Json(ApiResponse {
        data: topics,
        message: "Topics retrieved successfully".to_string(),
        success: true,
    }))
}

/// Append a topic to a subject
#[utoipa::path(
    post,
    path = "/api/v1/coordinator/subjects/{subject_id}/topics",
    tag = "coordinator",
    params(
        ("subject_id" = i32, Path, description = "Subject ID"),
    ),
    request_body = CreateTopicRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Topic created", body = ApiResponse<TopicRow>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(subject_id))]
pub async fn add_topic(
    Path(subject_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TopicRow>>), ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;

    let expected_date = match request.expected_date.as_deref() {
        Some(value) if !value.is_empty() => Some(parse_date(value)?),
        _ => None,
    };
    let topic = coordinator::add_topic(&state.db, subject_id, &request.name, expected_date).await?;

    let response = ApiResponse {
        data: topic,
        message: "Topic created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Patch a topic's name or expected date
#[utoipa::path(
    patch,
    path = "/api/v1/coordinator/topics/{topic_id}",
    tag = "coordinator",
    params(
        ("topic_id" = i32, Path, description = "Topic ID"),
    ),
    request_body = UpdateTopicRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Topic updated", body = ApiResponse<TopicRow>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Topic not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(topic_id))]
pub async fn update_topic(
    Path(topic_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateTopicRequest>,
) -> Result<Json<ApiResponse<TopicRow>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;

    let expected_date = match request.expected_date.as_deref() {
        None => None,
        Some("") => Some(None),
        Some(value) => Some(Some(parse_date(value)?)),
    };
    let changes = TopicChanges {
        name: request.name,
        expected_date,
    };
    let topic = coordinator::update_topic(&state.db, topic_id, changes).await?;

    Ok(Json(ApiResponse {
        data: topic,
        message: "Topic updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a topic; later topics close the gap
#[utoipa::path(
    delete,
    path = "/api/v1/coordinator/topics/{topic_id}",
    tag = "coordinator",
    params(
        ("topic_id" = i32, Path, description = "Topic ID"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Topic deleted", body = ApiResponse<String>),
        (status = 404, description = "Topic not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(topic_id))]
pub async fn delete_topic(
    Path(topic_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;
    coordinator::delete_topic(&state.db, topic_id).await?;

    Ok(Json(ApiResponse {
        data: format!("Topic {topic_id} deleted"),
        message: "Topic deleted successfully".to_string(),
        success: true,
    }))
}

/// Replace a subject's topic ordering
#[utoipa::path(
    post,
    path = "/api/v1/coordinator/subjects/{subject_id}/topics/reorder",
    tag = "coordinator",
    params(
        ("subject_id" = i32, Path, description = "Subject ID"),
    ),
    request_body = ReorderTopicsRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Topics reordered", body = ApiResponse<String>),
        (status = 400, description = "Id set does not match the subject's topics", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(subject_id))]
pub async fn reorder_topics(
    Path(subject_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<ReorderTopicsRequest>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;
    coordinator::reorder_topics(&state.db, subject_id, &request.order).await?;

    coordinator::record_activity(
        &state.db,
        Some(user.id),
        "topics.reorder",
        Some(format!("subject {subject_id}")),
    )
    .await;

    Ok(Json(ApiResponse {
        data: "ok".to_string(),
        message: "Topics reordered successfully".to_string(),
        success: true,
    }))
}
