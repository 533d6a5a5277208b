use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use moka::future::Cache;
use sea_orm::Database;
use tracing::{info, warn};

use crate::auth::TokenSigner;
use crate::email::Mailer;
use crate::ratelimit::RateLimiter;
use crate::schemas::AppState;

const DEV_SESSION_SECRET: &str = "dev-secret-change-in-production";

/// Initialize application state from the database URL plus environment
/// flags (`SESSION_SECRET`, `EMAIL_ENABLED`, `PUBLIC_BASE_URL`,
/// `DISABLE_RATE_LIMITS`).
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    // Cache for expensive dashboard aggregates
    let cache = Cache::builder()
        .max_capacity(1000)
        .time_to_live(Duration::from_secs(300)) // 5 minutes
        .build();

    let secret = std::env::var("SESSION_SECRET").unwrap_or_else(|_| {
        warn!("SESSION_SECRET not set, using the development default");
        DEV_SESSION_SECRET.to_string()
    });

    let email_enabled = env_flag("EMAIL_ENABLED", false);
    let base_url = std::env::var("PUBLIC_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let disable_rate_limits = env_flag("DISABLE_RATE_LIMITS", false);

    Ok(AppState {
        db,
        cache,
        signer: TokenSigner::new(&secret),
        limiter: Arc::new(RateLimiter::new(disable_rate_limits)),
        mailer: Mailer::new(email_enabled, base_url),
    })
}

/// Boolean environment flag with the usual truthy spellings.
pub fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(value) => matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}
