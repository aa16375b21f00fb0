//! Upstream HTTP mock endpoint creation utilities.
//!
//! Every endpoint registered here requires the Basic auth header built from the test
//! credentials, so a client that forgets to authenticate gets mockito's 501 instead of data.

use std::{io::Write, time::Duration};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use mockito::Mock;
use serde_json::Value;

use crate::{
    constant::{TEST_API_PASSWORD, TEST_API_USERNAME, TEST_UPSTREAM_PATH},
    fixtures::upstream::UpstreamFixtures,
};

/// `Authorization` header value the mock upstream expects.
pub fn expected_authorization() -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", TEST_API_USERNAME, TEST_API_PASSWORD))
    )
}

impl<'a> UpstreamFixtures<'a> {
    /// Create a mock delivery date endpoint returning `payload` as JSON.
    ///
    /// # Arguments
    /// - `payload` - JSON body to return, usually built with `upstream_payload`
    /// - `expected_requests` - Number of times this endpoint should be called
    ///
    /// # Returns
    /// - `Mock` - The created mock endpoint
    pub fn create_delivery_dates_endpoint(
        &mut self,
        payload: Value,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", TEST_UPSTREAM_PATH)
            .match_header("authorization", expected_authorization().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(payload.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock delivery date endpoint answering with `status` and a plain-text body.
    pub fn create_status_endpoint(
        &mut self,
        status: usize,
        body: &str,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", TEST_UPSTREAM_PATH)
            .match_header("authorization", expected_authorization().as_str())
            .with_status(status)
            .with_header("content-type", "text/plain")
            .with_body(body)
            .expect(expected_requests)
            .create()
    }

    /// Create a mock delivery date endpoint answering 200 with an arbitrary raw body.
    pub fn create_raw_endpoint(&mut self, body: &str, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("GET", TEST_UPSTREAM_PATH)
            .match_header("authorization", expected_authorization().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(expected_requests)
            .create()
    }

    /// Create a mock delivery date endpoint that stalls for `delay` before writing its body.
    ///
    /// Headers are sent immediately; the body write blocks the mock server thread, which is what
    /// a client-side timeout has to cut through.
    pub fn create_slow_endpoint(
        &mut self,
        delay: Duration,
        payload: Value,
        expected_requests: usize,
    ) -> Mock {
        let body = payload.to_string();

        self.setup
            .server
            .mock("GET", TEST_UPSTREAM_PATH)
            .match_header("authorization", expected_authorization().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(move |writer| {
                std::thread::sleep(delay);
                writer.write_all(body.as_bytes())
            })
            .expect(expected_requests)
            .create()
    }
}
