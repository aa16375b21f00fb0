//! Declarative test builder.
//!
//! This module provides the `TestBuilder` API for configuring the mock upstream before a test
//! runs. Methods queue endpoints which are all registered, in call order, during the final
//! `build()` call.

use std::time::Duration;

use mockito::Mock;
use serde_json::Value;

use crate::{error::TestError, TestContext};

/// Builder for declarative test initialization.
///
/// Endpoints are registered in the order they were queued, which matters when a test queues
/// several endpoints for the same path (e.g. a failure followed by a success): mockito serves
/// the first matching mock that still has expected hits left.
pub struct TestBuilder {
    endpoints: Vec<QueuedEndpoint>,
}

enum QueuedEndpoint {
    DeliveryDates(Value, usize),
    Status(usize, String, usize),
    Raw(String, usize),
    Slow(Duration, Value, usize),
    // Mock endpoint with full control
    Custom(Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>),
}

impl TestBuilder {
    /// Create a new TestBuilder with no endpoints configured.
    pub fn new() -> Self {
        Self {
            endpoints: Vec::new(),
        }
    }

    /// Add a delivery date endpoint returning `payload`.
    ///
    /// # Arguments
    /// - `payload` - JSON body the upstream returns
    /// - `expected_requests` - Number of times this endpoint should be called
    ///
    /// # Returns
    /// - `Self` - The builder instance for method chaining
    pub fn with_delivery_dates_endpoint(mut self, payload: Value, expected_requests: usize) -> Self {
        self.endpoints
            .push(QueuedEndpoint::DeliveryDates(payload, expected_requests));
        self
    }

    /// Add a delivery date endpoint failing with `status`.
    pub fn with_failing_endpoint(mut self, status: usize, expected_requests: usize) -> Self {
        self.endpoints.push(QueuedEndpoint::Status(
            status,
            "upstream unavailable".to_string(),
            expected_requests,
        ));
        self
    }

    /// Add a delivery date endpoint answering 200 with a raw, possibly invalid, body.
    pub fn with_raw_endpoint(mut self, body: impl Into<String>, expected_requests: usize) -> Self {
        self.endpoints
            .push(QueuedEndpoint::Raw(body.into(), expected_requests));
        self
    }

    /// Add a delivery date endpoint that stalls for `delay` before sending `payload`.
    pub fn with_slow_endpoint(
        mut self,
        delay: Duration,
        payload: Value,
        expected_requests: usize,
    ) -> Self {
        self.endpoints
            .push(QueuedEndpoint::Slow(delay, payload, expected_requests));
        self
    }

    /// Add a custom mock endpoint with full control over the mockito server.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.endpoints.push(QueuedEndpoint::Custom(Box::new(setup)));
        self
    }

    /// Start the mock server and register all queued endpoints.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Mock upstream ready for use
    /// - `Err(TestError::InvalidFixture)` - A queued failing endpoint uses a status outside
    ///   `100..=599`
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await;
        let mut mocks = Vec::new();

        for endpoint in self.endpoints {
            let mock = match endpoint {
                QueuedEndpoint::DeliveryDates(payload, expected) => setup
                    .upstream()
                    .create_delivery_dates_endpoint(payload, expected),
                QueuedEndpoint::Status(status, body, expected) => {
                    if !(100..=599).contains(&status) {
                        return Err(TestError::InvalidFixture(format!(
                            "{} is not an HTTP status code",
                            status
                        )));
                    }
                    setup
                        .upstream()
                        .create_status_endpoint(status, &body, expected)
                }
                QueuedEndpoint::Raw(body, expected) => {
                    setup.upstream().create_raw_endpoint(&body, expected)
                }
                QueuedEndpoint::Slow(delay, payload, expected) => setup
                    .upstream()
                    .create_slow_endpoint(delay, payload, expected),
                QueuedEndpoint::Custom(builder) => builder(&mut setup.server),
            };
            mocks.push(mock);
        }

        // Store mocks in setup so they live as long as the test
        setup.mocks = mocks;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
