//! Test configuration constants for the mock upstream delivery date API.
//!
//! These values are placeholders, not real credentials.

/// Path the mock upstream serves delivery dates on.
pub static TEST_UPSTREAM_PATH: &str = "/api/delivery-dates";

/// Basic auth username expected by the mock upstream.
pub static TEST_API_USERNAME: &str = "test_shop";

/// Basic auth password expected by the mock upstream.
pub static TEST_API_PASSWORD: &str = "test_password";
