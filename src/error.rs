use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use query::QueryError;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::schemas::ErrorResponse;

/// Boundary error for the HTTP surface. Everything a handler can fail
/// with funnels through here so the status/code mapping lives in exactly
/// one place.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("too many requests")]
    RateLimited,

    /// Genuine infrastructure failures with no better home.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Query(QueryError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApiError::Query(QueryError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Query(QueryError::Forbidden(_)) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Query(QueryError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Query(QueryError::InvalidOrder(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_ORDER")
            }
            ApiError::Query(QueryError::Database(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
            ApiError::Auth(AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
            }
            ApiError::Auth(AuthError::AccountInactive) => {
                (StatusCode::UNAUTHORIZED, "ACCOUNT_INACTIVE")
            }
            // Expired and tampered tokens are kept distinct internally but
            // answer identically so callers cannot tell which one occurred.
            ApiError::Auth(AuthError::TokenExpired) | ApiError::Auth(AuthError::TokenInvalid) => {
                (StatusCode::UNAUTHORIZED, "TOKEN_REJECTED")
            }
            ApiError::Auth(AuthError::Unauthenticated) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED")
            }
            ApiError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn public_message(&self) -> String {
        match self {
            // Infrastructure details stay in the log.
            ApiError::Query(QueryError::Database(err)) => {
                error!(%err, "database error while handling request");
                "internal server error".to_string()
            }
            ApiError::Internal(detail) => {
                error!(%detail, "internal error while handling request");
                "internal server error".to_string()
            }
            ApiError::Auth(AuthError::TokenExpired) | ApiError::Auth(AuthError::TokenInvalid) => {
                "the reset link is invalid or has expired".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorResponse {
            error: self.public_message(),
            code: code.to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}
