//! Test fixture modules for mock HTTP endpoint creation.
//!
//! - `upstream` - upstream delivery date API payloads and endpoints

pub mod upstream;
