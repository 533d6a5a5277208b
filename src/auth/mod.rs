//! Authentication and token service: credential verification, bearer
//! session extraction, signed reset tokens.

pub mod password;
pub mod token;

pub use token::{SessionClaims, TokenSigner};

use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use chrono::Utc;
use model::entities::prelude::*;
use model::entities::user;
use sea_orm::EntityTrait;
use thiserror::Error;

use crate::error::ApiError;
use crate::schemas::AppState;

/// Authentication failures. `InvalidCredentials` deliberately covers both
/// "no such user" and "wrong password" so login cannot be used to probe
/// for accounts.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("account is inactive")]
    AccountInactive,

    #[error("token expired")]
    TokenExpired,

    #[error("token invalid")]
    TokenInvalid,

    #[error("authentication required")]
    Unauthenticated,
}

/// The authenticated caller, loaded fresh from the store on every request
/// so deactivation takes effect immediately regardless of session age.
pub struct CurrentUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::Unauthenticated)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::Unauthenticated)?;

        let claims = state.signer.verify_session(token, Utc::now())?;

        let user = User::find_by_id(claims.sub)
            .one(&state.db)
            .await
            .map_err(query::QueryError::from)?
            .filter(|u| u.is_active)
            .ok_or(AuthError::Unauthenticated)?;

        Ok(CurrentUser(user))
    }
}
