//! # Auth Rate Limiting
//!
//! Fixed-window limiter keyed by client IP. Every request counts, including
//! rejected ones, and the current quota is reported on each response with
//! the `RateLimit-*` headers.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

#[derive(Debug, Clone)]
struct Window {
    count: u32,
    started: Instant,
}

/// Per-client windows plus the time of the last sweep for expired ones.
#[derive(Debug, Default)]
struct WindowTable {
    windows: HashMap<String, Window>,
    last_sweep: Option<Instant>,
}

/// Outcome of counting one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

/// Shared limiter state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    table: Arc<Mutex<WindowTable>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            table: Arc::new(Mutex::new(WindowTable::default())),
        }
    }

    /// Count a request from `key` at `now`.
    ///
    /// Expired windows are swept at most once per window length.
    pub fn check_at(&self, key: &str, now: Instant) -> Decision {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let window = self.window;

        let sweep_due = table
            .last_sweep
            .map_or(true, |at| now.saturating_duration_since(at) >= window);
        if sweep_due {
            table
                .windows
                .retain(|_, w| now.saturating_duration_since(w.started) < window);
            table.last_sweep = Some(now);
        }

        let entry = table.windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.count = 0;
            entry.started = now;
        }

        entry.count = entry.count.saturating_add(1);

        Decision {
            allowed: entry.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_after: self
                .window
                .saturating_sub(now.duration_since(entry.started)),
        }
    }

    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .windows
            .len()
    }
}

/// Socket peer first, then the first `X-Forwarded-For` hop, else one shared bucket.
fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn set_quota_headers(headers: &mut HeaderMap, decision: &Decision) {
    // Round the reset up so clients never retry a moment too early.
    let reset_secs = decision.reset_after.as_secs()
        + u64::from(decision.reset_after.subsec_nanos() > 0);

    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(RATELIMIT_RESET, HeaderValue::from(reset_secs));
    if !decision.allowed {
        headers.insert(RETRY_AFTER, HeaderValue::from(reset_secs));
    }
}

/// Middleware that enforces the per-client limit.
pub async fn rate_limit(State(limiter): State<RateLimiter>, request: Request, next: Next) -> Response {
    let key = client_key(&request);
    let decision = limiter.check(&key);

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
        (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE).into_response()
    };

    set_quota_headers(response.headers_mut(), &decision);
    response
}
