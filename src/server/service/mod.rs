//! Service layer for business logic.
//!
//! This module contains the delivery date service, which combines the upstream client, the
//! in-memory cache and generated fallback dates, and the retry logic it uses to call the
//! upstream API.

pub mod delivery_date;
pub mod retry;
