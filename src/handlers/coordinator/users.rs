use crate::auth::password;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::auth::UserResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use model::entities::user::Role;
use query::coordinator::{self, NewUser};
use query::{guard, QueryError};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Temporary credential for accounts created on someone's behalf; the
/// invite/reset flow replaces it.
const TEMPORARY_PASSWORD: &str = "changeme123";

/// Request body for creating a user with any role
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 64))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// One of: student, teacher, hod, coordinator, admin
    pub role: String,
    pub department: Option<String>,
}

/// List all users ordered by name
#[utoipa::path(
    get,
    path = "/api/v1/coordinator/users",
    tag = "coordinator",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 403, description = "Not a coordinator", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;
    let users = coordinator::list_users(&state.db).await?;

    let responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(ApiResponse {
        data: responses,
        message: "Users retrieved successfully".to_string(),
        success: true,
    }))
}

/// Create a user with any role
#[utoipa::path(
    post,
    path = "/api/v1/coordinator/users",
    tag = "coordinator",
    request_body = CreateUserRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Valid(Json(request)): Valid<Json<CreateUserRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;

    let role = Role::parse(request.role.trim())
        .ok_or_else(|| QueryError::Validation(format!("invalid role '{}'", request.role)))?;
    let password_hash = password::hash_password(TEMPORARY_PASSWORD)
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    let created = coordinator::create_user(
        &state.db,
        NewUser {
            name: request.name,
            email: request.email,
            role,
            department: request.department,
            password_hash,
        },
    )
    .await?;

    coordinator::record_activity(
        &state.db,
        Some(user.id),
        "user.create",
        Some(format!("user {} role {}", created.id, created.role.as_str())),
    )
    .await;
    info!(user_id = created.id, "user created by coordinator");

    let response = ApiResponse {
        data: UserResponse::from(created),
        message: "User created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}
