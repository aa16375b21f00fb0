//! HTTP controller endpoints for the leverdag web API.
//!
//! Controllers translate HTTP requests into service calls and shape the responses, including
//! the caching headers checkout frontends rely on. They use utoipa for OpenAPI documentation.

pub mod delivery_date;
pub mod health;
