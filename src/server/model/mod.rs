//! Server-side state types.

pub mod app;
