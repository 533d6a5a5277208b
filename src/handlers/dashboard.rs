use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse};
use axum::{extract::State, response::Json};
use common::{CoordinatorOverview, DepartmentOverview, StudentDashboard, TeacherDashboard};
use model::entities::user::Role;
use query::{coordinator, guard, hod, student, teacher, QueryError};
use tracing::instrument;

/// Student landing view
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/student",
    tag = "dashboard",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Student dashboard", body = ApiResponse<StudentDashboard>),
        (status = 403, description = "Not a student", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn student_dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<StudentDashboard>>, ApiError> {
    guard::require_role(&user, &[Role::Student])?;
    let dashboard = student::dashboard(&state.db, user.id).await?;

    Ok(Json(ApiResponse {
        data: dashboard,
        message: "Student dashboard retrieved successfully".to_string(),
        success: true,
    }))
}

/// Teacher landing view
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/teacher",
    tag = "dashboard",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Teacher dashboard", body = ApiResponse<TeacherDashboard>),
        (status = 403, description = "Not a teacher", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn teacher_dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<TeacherDashboard>>, ApiError> {
    guard::require_role(&user, &[Role::Teacher])?;
    let dashboard = teacher::dashboard(&state.db, user.id).await?;

    Ok(Json(ApiResponse {
        data: dashboard,
        message: "Teacher dashboard retrieved successfully".to_string(),
        success: true,
    }))
}

/// Department overview for its head
///
/// The department comes from the caller's own profile, so a head can only
/// ever aggregate their own department. The result is cached briefly; it
/// touches every subject, topic and enrollment of the department.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/hod",
    tag = "dashboard",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Department overview", body = ApiResponse<DepartmentOverview>),
        (status = 400, description = "Caller has no department tag", body = ErrorResponse),
        (status = 403, description = "Not a head of department", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn hod_dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<DepartmentOverview>>, ApiError> {
    guard::require_role(&user, &[Role::Hod])?;
    let department = user.department.clone().ok_or_else(|| {
        QueryError::Validation("your account has no department assigned".to_string())
    })?;

    let cache_key = format!("hod_overview_{department}");
    if let Some(CachedData::Department(overview)) = state.cache.get(&cache_key).await {
        return Ok(Json(ApiResponse {
            data: overview,
            message: "Department overview retrieved from cache".to_string(),
            success: true,
        }));
    }

    let overview = hod::department_overview(&state.db, &department).await?;
    state
        .cache
        .insert(cache_key, CachedData::Department(overview.clone()))
        .await;

    Ok(Json(ApiResponse {
        data: overview,
        message: "Department overview retrieved successfully".to_string(),
        success: true,
    }))
}

/// Coordinator landing view
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/coordinator",
    tag = "dashboard",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Coordinator overview", body = ApiResponse<CoordinatorOverview>),
        (status = 403, description = "Not a coordinator", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn coordinator_dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<CoordinatorOverview>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;

    let cache_key = "coordinator_overview".to_string();
    if let Some(CachedData::Coordinator(overview)) = state.cache.get(&cache_key).await {
        return Ok(Json(ApiResponse {
            data: overview,
            message: "Coordinator overview retrieved from cache".to_string(),
            success: true,
        }));
    }

    let overview = coordinator::overview(&state.db).await?;
    state
        .cache
        .insert(cache_key, CachedData::Coordinator(overview.clone()))
        .await;

    Ok(Json(ApiResponse {
        data: overview,
        message: "Coordinator overview retrieved successfully".to_string(),
        success: true,
    }))
}
