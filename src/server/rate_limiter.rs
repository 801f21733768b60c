//! Rate limiting middleware for the REST API
//!
//! Token bucket rate limiting in front of the API routes. Endpoints that
//! trigger an upstream scrape get a low bucket so rapid input changes in
//! the UI cannot hammer the finance site; everything else shares a
//! general bucket.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Rate limit type for different endpoint categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitType {
    /// Endpoints served from memory (listing, health, UI)
    General,
    /// Endpoints that GET the upstream site on every call
    Scrape,
}

/// Token bucket rate limiter
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    tokens: f64,
    refill_rate: f64,
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(rate_per_second: u32) -> Self {
        Self {
            capacity: rate_per_second,
            tokens: rate_per_second as f64,
            refill_rate: rate_per_second as f64,
            last_refill: Instant::now(),
        }
    }

    /// Try to consume a token, returns true if allowed
    pub fn try_acquire(&mut self) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        self.tokens = (self.tokens + elapsed.as_secs_f64() * self.refill_rate)
            .min(self.capacity as f64);
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Time until a token will be available
    pub fn time_until_available(&self) -> Duration {
        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.refill_rate)
        }
    }
}

/// Shared rate limiter state
#[derive(Debug)]
pub struct RateLimiterState {
    limiters: Mutex<HashMap<RateLimitType, TokenBucket>>,
}

impl RateLimiterState {
    pub fn new(general_rate: u32, scrape_rate: u32) -> Self {
        let mut limiters = HashMap::new();
        limiters.insert(RateLimitType::General, TokenBucket::new(general_rate));
        limiters.insert(RateLimitType::Scrape, TokenBucket::new(scrape_rate));

        Self {
            limiters: Mutex::new(limiters),
        }
    }

    pub fn try_acquire(&self, rate_type: RateLimitType) -> bool {
        let mut limiters = self.limiters.lock();
        match limiters.get_mut(&rate_type) {
            Some(limiter) => limiter.try_acquire(),
            None => true,
        }
    }

    pub fn time_until_available(&self, rate_type: RateLimitType) -> Duration {
        let limiters = self.limiters.lock();
        match limiters.get(&rate_type) {
            Some(limiter) => limiter.time_until_available(),
            None => Duration::ZERO,
        }
    }
}

/// Determine rate limit type based on request path
pub fn get_rate_limit_type(path: &str) -> RateLimitType {
    if path.contains("/history") || path.contains("/chart") || path.contains("/tickers/refresh") {
        return RateLimitType::Scrape;
    }
    RateLimitType::General
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let rate_type = get_rate_limit_type(&path);

    if !state.try_acquire(rate_type) {
        let wait_time = state.time_until_available(rate_type);
        tracing::warn!(
            "Rate limit exceeded for {:?}, path: {}, retry after {:?}ms",
            rate_type,
            path,
            wait_time.as_millis()
        );
        return rate_limit_response(wait_time);
    }

    next.run(request).await
}

/// Create a rate limit exceeded response
fn rate_limit_response(retry_after: Duration) -> Response {
    let retry_seconds = retry_after.as_secs_f64().ceil() as u64;

    let body = Json(json!({
        "status": "error",
        "error_type": "rate_limit_exceeded",
        "message": format!("Rate limit exceeded. Please retry after {} seconds.", retry_seconds),
        "retry_after_ms": retry_after.as_millis()
    }));

    let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
    response
        .headers_mut()
        .insert("Retry-After", retry_seconds.to_string().parse().unwrap());

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_bucket_basic() {
        let mut bucket = TokenBucket::new(10);

        for _ in 0..10 {
            assert!(bucket.try_acquire());
        }

        assert!(!bucket.try_acquire());
    }

    #[test]
    fn test_token_bucket_refill() {
        let mut bucket = TokenBucket::new(100);

        for _ in 0..100 {
            bucket.try_acquire();
        }
        assert!(!bucket.try_acquire());

        // simulate time passing
        bucket.last_refill = Instant::now() - Duration::from_millis(100);

        for _ in 0..10 {
            assert!(bucket.try_acquire());
        }
    }

    #[test]
    fn test_rate_limit_type_detection() {
        assert_eq!(get_rate_limit_type("/api/v1/history"), RateLimitType::Scrape);
        assert_eq!(get_rate_limit_type("/api/v1/chart"), RateLimitType::Scrape);
        assert_eq!(
            get_rate_limit_type("/api/v1/tickers/refresh"),
            RateLimitType::Scrape
        );
        assert_eq!(get_rate_limit_type("/api/v1/tickers"), RateLimitType::General);
        assert_eq!(get_rate_limit_type("/health"), RateLimitType::General);
    }

    #[test]
    fn test_time_until_available_when_drained() {
        let state = RateLimiterState::new(100, 1);

        assert!(state.try_acquire(RateLimitType::Scrape));
        assert!(!state.try_acquire(RateLimitType::Scrape));
        assert!(state.time_until_available(RateLimitType::Scrape) > Duration::ZERO);
    }
}
