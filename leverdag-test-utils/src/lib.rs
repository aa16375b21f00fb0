//! Test harness for leverdag.
//!
//! Tests are written in two phases: a [`TestBuilder`] declares the mock upstream delivery date
//! API (endpoints, payloads, failures, expected call counts), and `build()` produces a
//! [`TestContext`] holding the running mockito server and its mocks. The context hands out the
//! upstream URL and credentials so the crate under test can be pointed at the mock server
//! without this crate depending on it.

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        constant::{TEST_API_PASSWORD, TEST_API_USERNAME, TEST_UPSTREAM_PATH},
        fixtures::upstream::data::{upstream_payload, weekday_dates_from},
        TestBuilder, TestContext, TestError,
    };
}
