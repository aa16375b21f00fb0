//! Server application core modules.
//!
//! This module contains all server-side functionality for the leverdag delivery date service:
//! HTTP routing and controllers, the rate limiting middleware, the delivery date service with
//! its cache and upstream client, background maintenance jobs and startup wiring.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
