//! Process-local sliding-window rate limiting.
//!
//! One timestamp queue per (caller identity, operation) key. Timestamps
//! are chronologically ordered, so eviction only ever pops a prefix; the
//! evict-then-append sequence runs under a single lock acquisition, which
//! is what makes the count approximate-but-not-undercounted under
//! concurrent bursts. Explicitly not a distributed limiter: a
//! multi-instance deployment needs a shared store instead.

use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use tracing::{debug, warn};

/// Per-operation limit configuration.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub limit: usize,
    pub window: Duration,
}

/// Login attempts: 10 per minute per caller.
pub const LOGIN: RateLimitPolicy = RateLimitPolicy {
    limit: 10,
    window: Duration::from_secs(60),
};

/// Reset-mail requests: 5 per two minutes per caller.
pub const FORGOT_PASSWORD: RateLimitPolicy = RateLimitPolicy {
    limit: 5,
    window: Duration::from_secs(120),
};

type Key = (String, &'static str);

#[derive(Debug)]
pub struct RateLimiter {
    disabled: bool,
    buckets: Mutex<HashMap<Key, VecDeque<Instant>>>,
}

impl RateLimiter {
    /// `disabled` short-circuits every check; meant for local testing only.
    pub fn new(disabled: bool) -> Self {
        if disabled {
            warn!("rate limiting is disabled");
        }
        Self {
            disabled,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Admits or rejects one attempt for `identity` against `operation`.
    pub fn check(
        &self,
        identity: &str,
        operation: &'static str,
        policy: RateLimitPolicy,
    ) -> bool {
        self.check_at(identity, operation, policy, Instant::now())
    }

    fn check_at(
        &self,
        identity: &str,
        operation: &'static str,
        policy: RateLimitPolicy,
        now: Instant,
    ) -> bool {
        if self.disabled {
            return true;
        }

        let mut buckets = self.buckets.lock().expect("rate limiter lock poisoned");
        let queue = buckets
            .entry((identity.to_string(), operation))
            .or_default();

        // Evict the aged-out prefix
        while let Some(oldest) = queue.front() {
            if now.duration_since(*oldest) > policy.window {
                queue.pop_front();
            } else {
                break;
            }
        }

        if queue.len() >= policy.limit {
            debug!(identity, operation, "rate limit exceeded");
            return false;
        }
        queue.push_back(now);
        true
    }
}

/// Caller identity for rate limiting: the forwarded address when a proxy
/// supplies one, else the socket address, else a fixed sentinel.
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let identity = forwarded.unwrap_or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string())
                .unwrap_or_else(|| "unknown".to_string())
        });

        Ok(ClientIp(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(limit: usize, window_secs: u64) -> RateLimitPolicy {
        RateLimitPolicy {
            limit,
            window: Duration::from_secs(window_secs),
        }
    }

    #[test]
    fn sliding_window_admits_then_rejects_then_recovers() {
        let limiter = RateLimiter::new(false);
        let policy = policy(3, 60);
        let base = Instant::now();
        let at = |secs: u64| base + Duration::from_secs(secs);

        // Three calls inside the window succeed
        assert!(limiter.check_at("10.0.0.1", "login", policy, at(0)));
        assert!(limiter.check_at("10.0.0.1", "login", policy, at(1)));
        assert!(limiter.check_at("10.0.0.1", "login", policy, at(2)));

        // The fourth inside the window is rejected
        assert!(!limiter.check_at("10.0.0.1", "login", policy, at(3)));

        // After the first timestamp ages out, a new call is admitted
        assert!(limiter.check_at("10.0.0.1", "login", policy, at(61)));
    }

    #[test]
    fn keys_are_isolated_by_identity_and_operation() {
        let limiter = RateLimiter::new(false);
        let policy = policy(1, 60);
        let now = Instant::now();

        assert!(limiter.check_at("10.0.0.1", "login", policy, now));
        assert!(!limiter.check_at("10.0.0.1", "login", policy, now));

        // Different identity, same operation
        assert!(limiter.check_at("10.0.0.2", "login", policy, now));

        // Same identity, different operation
        assert!(limiter.check_at("10.0.0.1", "forgot-password", policy, now));
    }

    #[test]
    fn disabled_limiter_admits_everything() {
        let limiter = RateLimiter::new(true);
        let policy = policy(1, 60);
        let now = Instant::now();
        for _ in 0..100 {
            assert!(limiter.check_at("10.0.0.1", "login", policy, now));
        }
    }

    #[test]
    fn rejected_attempts_do_not_extend_the_window() {
        let limiter = RateLimiter::new(false);
        let policy = policy(2, 10);
        let base = Instant::now();
        let at = |secs: u64| base + Duration::from_secs(secs);

        assert!(limiter.check_at("id", "op", policy, at(0)));
        assert!(limiter.check_at("id", "op", policy, at(1)));
        // Rejections at t=2..=9 record nothing
        for t in 2..10 {
            assert!(!limiter.check_at("id", "op", policy, at(t)));
        }
        // t=11: the t=0 stamp has aged out
        assert!(limiter.check_at("id", "op", policy, at(11)));
    }
}
