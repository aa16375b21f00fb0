//! Test context structure and utilities.
//!
//! This module provides the `TestContext` returned by `TestBuilder`. The context owns the
//! mock upstream server and every mock registered on it, so the mocks live exactly as long as
//! the test.

use mockito::{Mock, Server, ServerGuard};

use crate::constant::{TEST_API_PASSWORD, TEST_API_USERNAME, TEST_UPSTREAM_PATH};

/// Test context structure returned by `TestBuilder`
///
/// # Usage
///
/// ```ignore
/// let test = TestBuilder::new()
///     .with_delivery_dates_endpoint(upstream_payload(&["2026-10-19"]), 1)
///     .build()
///     .await?;
///
/// let upstream: UpstreamConfig = test.to_upstream_config();
///
/// // Assert all mocks were called
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// Mock HTTP server standing in for the upstream delivery date API
    pub(crate) server: ServerGuard,
    /// Collection of mock HTTP endpoints for assertion
    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    /// Create a new test context with a fresh mock server and no endpoints.
    pub(crate) async fn new() -> Self {
        Self {
            server: Server::new_async().await,
            mocks: Vec::new(),
        }
    }

    /// Full URL of the delivery date endpoint on the mock server.
    pub fn upstream_url(&self) -> String {
        format!("{}{}", self.server.url(), TEST_UPSTREAM_PATH)
    }

    /// Convert the mock upstream location and credentials into any type constructible from
    /// `(url, username, password)`.
    ///
    /// This avoids a circular dependency between the test utilities and the crate under test.
    pub fn to_upstream_config<T>(&self) -> T
    where
        T: From<(String, String, String)>,
    {
        T::from((
            self.upstream_url(),
            TEST_API_USERNAME.to_string(),
            TEST_API_PASSWORD.to_string(),
        ))
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
