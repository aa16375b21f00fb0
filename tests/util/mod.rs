//! Shared helpers for integration tests.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request},
    response::Response,
};
use chrono::{TimeZone, Utc};
use leverdag::server::{
    config::{Config, FeatureFlags},
    model::app::AppState,
    util::time::{DateFormatter, MockClock},
};
use leverdag_test_utils::prelude::*;
use serde::de::DeserializeOwned;

/// Friday 2026-10-16 12:00 UTC
pub fn test_clock() -> MockClock {
    MockClock::new(Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap())
}

/// Feature flags for a test pointing at a mock upstream that may fail.
///
/// A single attempt per cache miss keeps failing upstream tests free of backoff sleeps.
pub fn test_flags() -> FeatureFlags {
    FeatureFlags {
        max_retries: 1,
        api_timeout: std::time::Duration::from_millis(2000),
        ..FeatureFlags::default()
    }
}

pub fn mock_mode_flags() -> FeatureFlags {
    FeatureFlags {
        enable_mock_mode: true,
        ..test_flags()
    }
}

pub trait TestContextExt {
    /// Application state talking to this context's mock upstream, driven by `clock`.
    fn into_app_state(&self, flags: FeatureFlags, clock: &MockClock) -> AppState;
}

impl TestContextExt for TestContext {
    fn into_app_state(&self, flags: FeatureFlags, clock: &MockClock) -> AppState {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            upstream: self.to_upstream_config(),
            flags,
            formatter: DateFormatter::default(),
        };

        AppState::new(config, Arc::new(clock.clone())).expect("Failed to build app state")
    }
}

/// Request as it arrives from `ip` through `into_make_service_with_connect_info`.
pub fn request(method: Method, path: &str, ip: &str) -> Request<Body> {
    let addr: SocketAddr = format!("{}:51234", ip)
        .parse()
        .expect("Invalid test IP address");

    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("Failed to build request");
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

pub fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

pub async fn json_body<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body is not the expected JSON")
}
