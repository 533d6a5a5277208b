use crate::handlers::{auth, coordinator, dashboard, health, student, teacher};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Authentication
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/forgot-password", post(auth::forgot_password))
        .route("/api/v1/auth/reset-password", post(auth::reset_password))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        // Role dashboards
        .route("/api/v1/dashboard/student", get(dashboard::student_dashboard))
        .route("/api/v1/dashboard/teacher", get(dashboard::teacher_dashboard))
        .route("/api/v1/dashboard/hod", get(dashboard::hod_dashboard))
        .route(
            "/api/v1/dashboard/coordinator",
            get(dashboard::coordinator_dashboard),
        )
        // Teacher scope
        .route("/api/v1/teacher/subjects", get(teacher::list_subjects))
        .route(
            "/api/v1/teacher/subjects/:subject_id",
            get(teacher::subject_overview),
        )
        .route(
            "/api/v1/teacher/topics/:topic_id/complete",
            post(teacher::mark_topic_complete),
        )
        // Student scope
        .route("/api/v1/student/subjects", get(student::list_subjects))
        .route(
            "/api/v1/student/subjects/:subject_id",
            get(student::subject_detail),
        )
        // Coordinator: subjects
        .route(
            "/api/v1/coordinator/subjects",
            get(coordinator::subjects::list_subjects),
        )
        .route(
            "/api/v1/coordinator/subjects",
            post(coordinator::subjects::create_subject),
        )
        .route(
            "/api/v1/coordinator/subjects/:subject_id",
            put(coordinator::subjects::update_subject),
        )
        .route(
            "/api/v1/coordinator/subjects/:subject_id",
            delete(coordinator::subjects::deactivate_subject),
        )
        // Coordinator: topics
        .route(
            "/api/v1/coordinator/subjects/:subject_id/topics",
            get(coordinator::topics::list_topics),
        )
        .route(
            "/api/v1/coordinator/subjects/:subject_id/topics",
            post(coordinator::topics::add_topic),
        )
        .route(
            "/api/v1/coordinator/subjects/:subject_id/topics/reorder",
            post(coordinator::topics::reorder_topics),
        )
        .route(
            "/api/v1/coordinator/topics/:topic_id",
            patch(coordinator::topics::update_topic),
        )
        .route(
            "/api/v1/coordinator/topics/:topic_id",
            delete(coordinator::topics::delete_topic),
        )
        // Coordinator: enrollments
        .route(
            "/api/v1/coordinator/subjects/:subject_id/enrollments",
            get(coordinator::enrollments::list_enrollments),
        )
        .route(
            "/api/v1/coordinator/subjects/:subject_id/enrollments",
            post(coordinator::enrollments::add_enrollment),
        )
        .route(
            "/api/v1/coordinator/subjects/:subject_id/enrollments/import",
            post(coordinator::enrollments::import_enrollments),
        )
        .route(
            "/api/v1/coordinator/subjects/:subject_id/enrollments/:student_id",
            delete(coordinator::enrollments::remove_enrollment),
        )
        .route(
            "/api/v1/coordinator/enrollments/template",
            get(coordinator::enrollments::enrollment_template),
        )
        // Coordinator: users
        .route(
            "/api/v1/coordinator/users",
            get(coordinator::users::list_users),
        )
        .route(
            "/api/v1/coordinator/users",
            post(coordinator::users::create_user),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
