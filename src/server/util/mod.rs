//! Utility functions and helpers for server operations.
//!
//! This module provides the clock abstraction shared by the cache and the rate limiters, and
//! date formatting helpers for display names and HTTP headers.

pub mod time;
