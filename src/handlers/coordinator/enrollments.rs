use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use common::{EnrollmentRow, ImportOutcome};
use model::entities::user::Role;
use query::{coordinator, guard};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

/// Request body for enrolling a single student by email
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddEnrollmentRequest {
    pub email: String,
}

const TEMPLATE_CSV: &str = "email\nstudent1@example.com\nstudent2@example.com\n";

/// Splits an uploaded single-column CSV into candidate emails, dropping
/// the `email` header row and blank lines.
fn candidate_emails(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().trim_matches('"').to_string())
        .filter(|line| !line.is_empty())
        .filter(|line| !line.eq_ignore_ascii_case("email"))
        .collect()
}

/// List a subject's enrollments with student details
#[utoipa::path(
    get,
    path = "/api/v1/coordinator/subjects/{subject_id}/enrollments",
    tag = "coordinator",
    params(
        ("subject_id" = i32, Path, description = "Subject ID"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Enrollments retrieved successfully", body = ApiResponse<Vec<EnrollmentRow>>),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(subject_id))]
pub async fn list_enrollments(
    Path(subject_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<EnrollmentRow>>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;
    let enrollments = coordinator::list_enrollments(&state.db, subject_id).await?;

    Ok(Json(ApiResponse {
        data: enrollments,
        message: "Enrollments retrieved successfully".to_string(),
        success: true,
    }))
}

/// Enroll one student by email
#[utoipa::path(
    post,
    path = "/api/v1/coordinator/subjects/{subject_id}/enrollments",
    tag = "coordinator",
    params(
        ("subject_id" = i32, Path, description = "Subject ID"),
    ),
    request_body = AddEnrollmentRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Enrollment created", body = ApiResponse<EnrollmentRow>),
        (status = 404, description = "Subject or active student not found", body = ErrorResponse),
        (status = 409, description = "Already enrolled", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(subject_id))]
pub async fn add_enrollment(
    Path(subject_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<AddEnrollmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EnrollmentRow>>), ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;
    let enrollment = coordinator::add_enrollment(&state.db, subject_id, &request.email).await?;

    let response = ApiResponse {
        data: enrollment,
        message: "Enrollment created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Remove one enrollment
#[utoipa::path(
    delete,
    path = "/api/v1/coordinator/subjects/{subject_id}/enrollments/{student_id}",
    tag = "coordinator",
    params(
        ("subject_id" = i32, Path, description = "Subject ID"),
        ("student_id" = i32, Path, description = "Student ID"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Enrollment removed", body = ApiResponse<String>),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(subject_id, student_id))]
pub async fn remove_enrollment(
    Path((subject_id, student_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;
    coordinator::remove_enrollment(&state.db, subject_id, student_id).await?;

    Ok(Json(ApiResponse {
        data: "deleted".to_string(),
        message: "Enrollment removed successfully".to_string(),
        success: true,
    }))
}

/// Bulk-enroll students from an uploaded single-column CSV
///
/// The body is the raw file content: an `email` header and one address
/// per row. Bad rows are skipped, never fatal; the response reports how
/// many rows were added and skipped.
#[utoipa::path(
    post,
    path = "/api/v1/coordinator/subjects/{subject_id}/enrollments/import",
    tag = "coordinator",
    params(
        ("subject_id" = i32, Path, description = "Subject ID"),
    ),
    request_body(content = String, content_type = "text/csv"),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Import finished", body = ApiResponse<ImportOutcome>),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(subject_id))]
pub async fn import_enrollments(
    Path(subject_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: String,
) -> Result<Json<ApiResponse<ImportOutcome>>, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;

    let emails = candidate_emails(&body);
    let outcome = coordinator::import_enrollments(&state.db, subject_id, &emails).await?;

    coordinator::record_activity(
        &state.db,
        Some(user.id),
        "enrollments.import",
        Some(format!(
            "subject {subject_id}: added {}, skipped {}",
            outcome.added, outcome.skipped
        )),
    )
    .await;

    Ok(Json(ApiResponse {
        data: outcome,
        message: "Import finished".to_string(),
        success: true,
    }))
}

/// Download the import template: the exact header plus two example rows
#[utoipa::path(
    get,
    path = "/api/v1/coordinator/enrollments/template",
    tag = "coordinator",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "CSV template", content_type = "text/csv", body = String)
    )
)]
#[instrument(skip_all)]
pub async fn enrollment_template(CurrentUser(user): CurrentUser) -> Result<Response, ApiError> {
    guard::require_role(&user, &[Role::Coordinator])?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"enrollments_template.csv\"",
            ),
        ],
        TEMPLATE_CSV,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_emails_skips_header_and_blanks() {
        let content = "email\nada@x.com\n\n  \nALAN@X.COM\n";
        let emails = candidate_emails(content);
        assert_eq!(emails, vec!["ada@x.com", "ALAN@X.COM"]);
    }

    #[test]
    fn candidate_emails_accepts_headerless_files() {
        let emails = candidate_emails("ada@x.com\nalan@x.com\n");
        assert_eq!(emails.len(), 2);
    }

    #[test]
    fn template_has_header_and_two_examples() {
        let mut lines = TEMPLATE_CSV.lines();
        assert_eq!(lines.next(), Some("email"));
        assert_eq!(lines.clone().count(), 2);
        assert!(lines.all(|l| l.contains('@')));
    }
}
