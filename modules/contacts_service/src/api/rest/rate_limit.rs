//! Fixed-window request limiter keyed by client address

use super::error::{map_domain_error, Problem};
use super::state::AppState;
use crate::contract::ContactsError;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Tracked clients above which expired windows are swept
const SWEEP_THRESHOLD: usize = 10_000;

pub struct RateLimiter {
    limit: u32,
    window: Duration,
    sweep_threshold: usize,
    windows: DashMap<String, (Instant, u32)>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            sweep_threshold: SWEEP_THRESHOLD,
            windows: DashMap::new(),
        }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    pub fn with_sweep_threshold(mut self, threshold: usize) -> Self {
        self.sweep_threshold = threshold;
        self
    }

    /// Count one request for `key`; false once the window budget is spent
    pub fn try_acquire(&self, key: &str) -> bool {
        self.try_acquire_at(key, Instant::now())
    }

    fn try_acquire_at(&self, key: &str, now: Instant) -> bool {
        let allowed = {
            let mut entry = self.windows.entry(key.to_owned()).or_insert((now, 0));
            let (started, count) = entry.value_mut();
            if now.saturating_duration_since(*started) >= self.window {
                *started = now;
                *count = 0;
            }
            if *count >= self.limit {
                false
            } else {
                *count += 1;
                true
            }
        };

        // The entry guard must be released before retain locks every shard
        if self.windows.len() > self.sweep_threshold {
            self.windows
                .retain(|_, (started, _)| now.saturating_duration_since(*started) < self.window);
        }
        allowed
    }
}

/// Spends one unit of the `/api/users/me` budget for the calling client.
///
/// Placed after [`CurrentUser`](super::auth::CurrentUser) in a handler's
/// arguments, so rejected credentials never consume the budget.
pub struct RateLimited;

impl<S> FromRequestParts<S> for RateLimited
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = parts
            .extensions
            .get::<Arc<AppState>>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("AppState extension missing from router");
                Problem::internal()
            })?;

        let key = client_key(parts);
        if !state.me_limiter.try_acquire(&key) {
            tracing::warn!(client = %key, path = %parts.uri.path(), "rate limit exceeded");
            return Err(map_domain_error(ContactsError::TooManyRequests));
        }
        Ok(Self)
    }
}

fn client_key(parts: &Parts) -> String {
    if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_per_key() {
        let limiter = RateLimiter::per_minute(2);
        assert!(limiter.try_acquire("a"));
        assert!(limiter.try_acquire("a"));
        assert!(!limiter.try_acquire("a"));
        assert!(limiter.try_acquire("b"));
    }

    #[test]
    fn window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();
        assert!(limiter.try_acquire_at("a", start));
        assert!(!limiter.try_acquire_at("a", start + Duration::from_secs(59)));
        assert!(limiter.try_acquire_at("a", start + Duration::from_secs(60)));
    }

    #[test]
    fn expired_windows_are_swept_past_the_threshold() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60)).with_sweep_threshold(2);
        let start = Instant::now();
        assert!(limiter.try_acquire_at("10.0.0.1", start));
        assert!(limiter.try_acquire_at("10.0.0.2", start));
        assert_eq!(limiter.windows.len(), 2);

        assert!(limiter.try_acquire_at("10.0.0.3", start + Duration::from_secs(61)));
        assert_eq!(limiter.windows.len(), 1);
        assert!(limiter.windows.contains_key("10.0.0.3"));
    }

    #[test]
    fn live_windows_survive_a_sweep() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60)).with_sweep_threshold(1);
        let start = Instant::now();
        assert!(limiter.try_acquire_at("a", start));
        assert!(limiter.try_acquire_at("b", start + Duration::from_secs(30)));
        assert_eq!(limiter.windows.len(), 2);
        assert!(!limiter.try_acquire_at("a", start + Duration::from_secs(31)));
    }

    #[test]
    fn forwarded_for_keys_requests_without_peer_address() {
        let (mut parts, _) = axum::http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(client_key(&parts), "203.0.113.7");

        parts
            .extensions
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(client_key(&parts), "127.0.0.1");
    }
}
