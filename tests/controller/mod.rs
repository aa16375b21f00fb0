//! Tests for HTTP controller endpoints.
//!
//! Handlers are called directly with their extractors, the rate limiting layers are covered by
//! the router tests.

mod delivery_date;
mod health;

use leverdag_test_utils::prelude::*;

use crate::util::{json_body, mock_mode_flags, test_clock, test_flags, TestContextExt};
