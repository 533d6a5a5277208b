use std::sync::Arc;

use common::{CoordinatorOverview, DepartmentOverview};
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::auth::TokenSigner;
use crate::email::Mailer;
use crate::ratelimit::RateLimiter;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for expensive aggregates
    pub cache: Cache<String, CachedData>,
    /// Signs session and password-reset tokens
    pub signer: TokenSigner,
    /// Sliding-window limiter guarding sensitive endpoints
    pub limiter: Arc<RateLimiter>,
    /// Outbound mail seam
    pub mailer: Mailer,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Department(DepartmentOverview),
    Coordinator(CoordinatorOverview),
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::forgot_password,
        crate::handlers::auth::reset_password,
        crate::handlers::auth::change_password,
        crate::handlers::dashboard::student_dashboard,
        crate::handlers::dashboard::teacher_dashboard,
        crate::handlers::dashboard::hod_dashboard,
        crate::handlers::dashboard::coordinator_dashboard,
        crate::handlers::teacher::list_subjects,
        crate::handlers::teacher::subject_overview,
        crate::handlers::teacher::mark_topic_complete,
        crate::handlers::student::list_subjects,
        crate::handlers::student::subject_detail,
        crate::handlers::coordinator::subjects::list_subjects,
        crate::handlers::coordinator::subjects::create_subject,
        crate::handlers::coordinator::subjects::update_subject,
        crate::handlers::coordinator::subjects::deactivate_subject,
        crate::handlers::coordinator::topics::list_topics,
        crate::handlers::coordinator::topics::add_topic,
        crate::handlers::coordinator::topics::update_topic,
        crate::handlers::coordinator::topics::delete_topic,
        crate::handlers::coordinator::topics::reorder_topics,
        crate::handlers::coordinator::enrollments::list_enrollments,
        crate::handlers::coordinator::enrollments::add_enrollment,
        crate::handlers::coordinator::enrollments::remove_enrollment,
        crate::handlers::coordinator::enrollments::import_enrollments,
        crate::handlers::coordinator::enrollments::enrollment_template,
        crate::handlers::coordinator::users::list_users,
        crate::handlers::coordinator::users::create_user,
    ),
    components(
        schemas(
            ApiResponse<crate::handlers::auth::UserResponse>,
            ApiResponse<crate::handlers::auth::LoginResponse>,
            ApiResponse<Vec<crate::handlers::auth::UserResponse>>,
            ApiResponse<String>,
            ApiResponse<common::SubjectAdminRow>,
            ApiResponse<Vec<common::SubjectAdminRow>>,
            ApiResponse<common::TopicRow>,
            ApiResponse<Vec<common::TopicRow>>,
            ApiResponse<common::EnrollmentRow>,
            ApiResponse<Vec<common::EnrollmentRow>>,
            ApiResponse<common::ImportOutcome>,
            ApiResponse<common::SubjectOverview>,
            ApiResponse<Vec<common::TeacherSubjectRow>>,
            ApiResponse<Vec<common::StudentSubjectRow>>,
            ApiResponse<common::StudentDashboard>,
            ApiResponse<common::TeacherDashboard>,
            ApiResponse<common::DepartmentOverview>,
            ApiResponse<common::CoordinatorOverview>,
            ErrorResponse,
            HealthResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::LoginResponse,
            crate::handlers::auth::ForgotPasswordRequest,
            crate::handlers::auth::ResetPasswordRequest,
            crate::handlers::auth::ChangePasswordRequest,
            crate::handlers::auth::UserResponse,
            crate::handlers::coordinator::subjects::CreateSubjectRequest,
            crate::handlers::coordinator::subjects::UpdateSubjectRequest,
            crate::handlers::coordinator::topics::CreateTopicRequest,
            crate::handlers::coordinator::topics::UpdateTopicRequest,
            crate::handlers::coordinator::topics::ReorderTopicsRequest,
            crate::handlers::coordinator::enrollments::AddEnrollmentRequest,
            crate::handlers::coordinator::users::CreateUserRequest,
            common::SubjectSummary,
            common::SubjectAdminRow,
            common::TopicRow,
            common::TeacherSubjectRow,
            common::StudentSubjectRow,
            common::SubjectOverview,
            common::EnrollmentRow,
            common::ImportOutcome,
            common::StudentDashboard,
            common::TeacherDashboard,
            common::DepartmentOverview,
            common::FacultyRow,
            common::CoordinatorOverview,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and password management"),
        (name = "dashboard", description = "Role-specific landing views"),
        (name = "teacher", description = "Teacher-scoped subject and topic operations"),
        (name = "student", description = "Student-scoped subject views"),
        (name = "coordinator", description = "Coordinator administration endpoints"),
    ),
    info(
        title = "Syllarust API",
        description = "Academic syllabus tracking API - role-based progress tracking over subjects, topics and enrollments",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

/// Registers the bearer-token scheme the `security(...)` annotations
/// refer to.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("token")
                        .build(),
                ),
            );
        }
    }
}
