//! Per-client fixed window rate limiting.
//!
//! Each [`RateLimiter`] counts requests per client key in a window that starts with the client's
//! first request and resets once it has elapsed. A request is admitted while the client's count
//! is below the configured maximum and counted after the inner handler has answered, so the skip
//! flags on [`RateLimitConfig`] can look at the response status. Expired windows are removed by a
//! periodic sweep (see `server::scheduler`).
//!
//! State lives in process memory; separate server instances each keep their own counts.

pub mod config;


use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use dashmap::DashMap;

use crate::{
    model::api::RateLimitErrorDto,
    server::util::time::{seconds_until, SharedClock},
};

pub use config::RateLimitConfig;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";

/// Request count of one client within its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientInfo {
    pub count: u32,
    pub reset_time: DateTime<Utc>,
}

impl ClientInfo {
    fn new(count: u32, now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            count,
            reset_time: window_end(now, window),
        }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.reset_time
    }
}

/// Outcome of checking a client against its quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed {
        remaining: u32,
        reset_time: DateTime<Utc>,
    },
    Limited {
        reset_time: DateTime<Utc>,
    },
}

/// Fixed window counter keyed by client.
///
/// Clones share the same counts.
#[derive(Clone)]
pub struct RateLimiter {
    config: Arc<RateLimitConfig>,
    clients: Arc<DashMap<String, ClientInfo>>,
    clock: SharedClock,
    trust_proxy: bool,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, clock: SharedClock) -> Self {
        Self {
            config: Arc::new(config),
            clients: Arc::new(DashMap::new()),
            clock,
            trust_proxy: false,
        }
    }

    /// Identify clients by the first `X-Forwarded-For` entry when present.
    pub fn trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    /// Current window of `key`, if one is tracked.
    pub fn client(&self, key: &str) -> Option<ClientInfo> {
        self.clients.get(key).map(|entry| *entry)
    }

    /// Number of tracked clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Checks `key` against its quota without counting the request.
    ///
    /// Starts a new window when the client is unknown or its window has expired.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = self.clock.now();
        let window = self.config.window;

        let mut entry = self
            .clients
            .entry(key.to_string())
            .or_insert_with(|| ClientInfo::new(0, now, window));

        if entry.is_expired(now) {
            *entry = ClientInfo::new(0, now, window);
        }

        if entry.count >= self.config.max_requests {
            return RateLimitDecision::Limited {
                reset_time: entry.reset_time,
            };
        }

        RateLimitDecision::Allowed {
            remaining: self
                .config
                .max_requests
                .saturating_sub(entry.count)
                .saturating_sub(1),
            reset_time: entry.reset_time,
        }
    }

    /// Counts one request for `key`.
    pub fn record(&self, key: &str) {
        let now = self.clock.now();
        let window = self.config.window;

        self.clients
            .entry(key.to_string())
            .and_modify(|info| info.count = info.count.saturating_add(1))
            .or_insert_with(|| ClientInfo::new(1, now, window));
    }

    /// Removes every client whose window has expired. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        self.clients.retain(|_, info| {
            let keep = !info.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        removed
    }

    /// Key identifying the client that sent `request`.
    pub fn client_key(&self, request: &Request) -> String {
        if self.trust_proxy {
            let forwarded = request
                .headers()
                .get(X_FORWARDED_FOR)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty());

            if let Some(ip) = forwarded {
                return ip.to_string();
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
    }

    fn limited_response(&self, key: &str, reset_time: DateTime<Utc>) -> Response {
        let now = self.clock.now();
        let retry_after = seconds_until(now, reset_time);

        tracing::warn!(
            "Rate limit of {} requests per {:?} exceeded by client {}, retry after {}s",
            self.config.max_requests,
            self.config.window,
            key,
            retry_after
        );

        let body = RateLimitErrorDto {
            error: "Too Many Requests".to_string(),
            message: self.config.message.clone(),
            retry_after,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
        let headers = response.headers_mut();
        self.set_headers(headers, 0, reset_time);
        headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after));

        response
    }

    /// Sets the `X-RateLimit-*` headers unless an inner limiter already did.
    fn set_headers(&self, headers: &mut HeaderMap, remaining: u32, reset_time: DateTime<Utc>) {
        headers
            .entry(X_RATELIMIT_LIMIT)
            .or_insert(HeaderValue::from(self.config.max_requests));
        headers
            .entry(X_RATELIMIT_REMAINING)
            .or_insert(HeaderValue::from(remaining));

        let reset = reset_time.to_rfc3339_opts(SecondsFormat::Secs, true);
        if let Ok(reset) = HeaderValue::from_str(&reset) {
            headers.entry(X_RATELIMIT_RESET).or_insert(reset);
        }
    }
}

/// Axum middleware enforcing `limiter`.
///
/// Mount with `axum::middleware::from_fn_with_state(limiter, rate_limit)`.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let key = limiter.client_key(&request);

    match limiter.check(&key) {
        RateLimitDecision::Limited { reset_time } => limiter.limited_response(&key, reset_time),
        RateLimitDecision::Allowed {
            remaining,
            reset_time,
        } => {
            let mut response = next.run(request).await;

            if limiter.config.counts(response.status().as_u16()) {
                limiter.record(&key);
            }

            limiter.set_headers(response.headers_mut(), remaining, reset_time);
            response
        }
    }
}

/// The limiter instances mounted by the router.
#[derive(Clone)]
pub struct RateLimiters {
    pub general: RateLimiter,
    pub api: RateLimiter,
    pub strict: RateLimiter,
}

impl RateLimiters {
    /// Creates the general, api and strict limiters sharing `clock`.
    pub fn new(clock: SharedClock, trust_proxy: bool) -> Self {
        let limiter = |config| RateLimiter::new(config, clock.clone()).trust_proxy(trust_proxy);

        Self {
            general: limiter(RateLimitConfig::general()),
            api: limiter(RateLimitConfig::api()),
            strict: limiter(RateLimitConfig::strict()),
        }
    }

    /// Sweeps expired windows from every limiter. Returns the total number removed.
    pub fn sweep_expired(&self) -> usize {
        self.general.sweep_expired() + self.api.sweep_expired() + self.strict.sweep_expired()
    }
}

fn window_end(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(window)
        .ok()
        .and_then(|window| now.checked_add_signed(window))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
