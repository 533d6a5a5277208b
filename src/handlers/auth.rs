use crate::auth::{password, AuthError, CurrentUser};
use crate::error::ApiError;
use crate::ratelimit::{self, ClientIp};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use chrono::Utc;
use model::entities::prelude::*;
use model::entities::user::{self, Role};
use query::coordinator::{self, NewUser};
use query::QueryError;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for self-registration. The role is always `student`;
/// privileged accounts are created by a coordinator.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 64))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub department: Option<String>,
    #[validate(length(min = 8))]
    pub password: String,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login: a bearer token plus the role-specific landing route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub role: String,
    pub redirect: String,
    pub user: UserResponse,
}

/// Request body for requesting a password-reset mail
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for completing a password reset
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ResetPasswordRequest {
    pub token: String,
    #[validate(length(min = 8))]
    pub password: String,
}

/// Request body for changing the password of the logged-in user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: Option<String>,
    pub is_active: bool,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role.as_str().to_string(),
            department: model.department,
            is_active: model.is_active,
        }
    }
}

/// Register a new student account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let password_hash = password::hash_password(&request.password)
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    // Self-registration never grants anything beyond student
    let created = coordinator::create_user(
        &state.db,
        NewUser {
            name: request.name,
            email: request.email,
            role: Role::Student,
            department: request.department,
            password_hash,
        },
    )
    .await?;

    coordinator::record_activity(&state.db, Some(created.id), "user.register", None).await;
    info!(user_id = created.id, "student registered");

    let response = ApiResponse {
        data: UserResponse::from(created),
        message: "Registration successful".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or inactive account", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if !state.limiter.check(&ip, "login", ratelimit::LOGIN) {
        return Err(ApiError::RateLimited);
    }

    let email = request.email.trim().to_lowercase();
    let user = User::find()
        .filter(user::Column::Email.eq(email))
        .one(&state.db)
        .await
        .map_err(QueryError::from)?;

    // Unknown email and wrong password answer identically
    let Some(user) = user else {
        warn!("login attempt for unknown email");
        return Err(AuthError::InvalidCredentials.into());
    };
    if !password::verify_password(&request.password, &user.password_hash) {
        warn!(user_id = user.id, "login attempt with wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }
    if !user.is_active {
        return Err(AuthError::AccountInactive.into());
    }

    let token = state.signer.issue_session(user.id, user.role.as_str(), Utc::now());
    let redirect = format!("/dashboard/{}", user.role.as_str());
    info!(user_id = user.id, role = user.role.as_str(), "login successful");

    let response = ApiResponse {
        data: LoginResponse {
            token,
            role: user.role.as_str().to_string(),
            redirect,
            user: UserResponse::from(user),
        },
        message: "Login successful".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Request a password-reset mail
///
/// Answers identically whether or not the email is registered; only the
/// side effect (a reset mail) differs.
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Request accepted", body = ApiResponse<String>),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    if !state
        .limiter
        .check(&ip, "forgot-password", ratelimit::FORGOT_PASSWORD)
    {
        return Err(ApiError::RateLimited);
    }

    let email = request.email.trim().to_lowercase();
    let user = User::find()
        .filter(user::Column::Email.eq(email))
        .one(&state.db)
        .await
        .map_err(QueryError::from)?;

    if let Some(user) = user {
        let token = state.signer.issue_reset_token(&user.email, Utc::now());
        let link = state.mailer.reset_link(&token);
        // Logged for local development, where mail delivery is off
        info!(user_id = user.id, %link, "password reset link issued");
        state.mailer.send_password_reset(&user.email, &link);
    }

    let response = ApiResponse {
        data: "ok".to_string(),
        message: "If an account with that email exists, a reset link has been sent.".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Complete a password reset with a token from the reset mail
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = ApiResponse<String>),
        (status = 401, description = "Invalid or expired link", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ResetPasswordRequest>>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let email = state.signer.verify_reset_token(&request.token, Utc::now())?;

    // A genuine token for a meanwhile-deleted account reads as invalid
    let user = User::find()
        .filter(user::Column::Email.eq(email))
        .one(&state.db)
        .await
        .map_err(QueryError::from)?
        .ok_or(AuthError::TokenInvalid)?;

    let password_hash = password::hash_password(&request.password)
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    let user_id = user.id;
    let mut active: user::ActiveModel = user.into();
    active.password_hash = Set(password_hash);
    active.update(&state.db).await.map_err(QueryError::from)?;

    info!(user_id, "password reset completed");
    let response = ApiResponse {
        data: "ok".to_string(),
        message: "Your password has been reset. You can now log in.".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Change the password of the logged-in user
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Password updated", body = ApiResponse<String>),
        (status = 401, description = "Current password incorrect", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Valid(Json(request)): Valid<Json<ChangePasswordRequest>>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    if !password::verify_password(&request.current_password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials.into());
    }

    let password_hash = password::hash_password(&request.new_password)
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    let user_id = user.id;
    let mut active: user::ActiveModel = user.into();
    active.password_hash = Set(password_hash);
    active.update(&state.db).await.map_err(QueryError::from)?;

    info!(user_id, "password changed");
    let response = ApiResponse {
        data: "ok".to_string(),
        message: "Your password has been updated.".to_string(),
        success: true,
    };
    Ok(Json(response))
}
