use std::time::Duration;

/// Settings for a single [`RateLimiter`](super::RateLimiter) instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Length of a client's fixed window.
    pub window: Duration,
    /// Requests admitted per window.
    pub max_requests: u32,
    /// Message returned in the body of a rejected request.
    pub message: String,
    /// Don't count requests answered with a status below 400.
    pub skip_successful_requests: bool,
    /// Don't count requests answered with a status of 400 or above.
    pub skip_failed_requests: bool,
}

impl RateLimitConfig {
    pub fn new(window: Duration, max_requests: u32, message: impl Into<String>) -> Self {
        Self {
            window,
            max_requests,
            message: message.into(),
            skip_successful_requests: false,
            skip_failed_requests: false,
        }
    }

    /// Applied to every route: 100 requests per 15 minutes.
    pub fn general() -> Self {
        Self::new(
            Duration::from_secs(15 * 60),
            100,
            "Too many requests from this client, please try again later.",
        )
    }

    /// Applied to `/api` routes on top of [`RateLimitConfig::general`]: 20 requests per minute.
    pub fn api() -> Self {
        Self::new(
            Duration::from_secs(60),
            20,
            "Too many API requests from this client, please try again later.",
        )
    }

    /// Applied to operations that are expensive or destructive: 5 requests per 15 minutes.
    pub fn strict() -> Self {
        Self::new(
            Duration::from_secs(15 * 60),
            5,
            "Too many attempts for this operation, please try again later.",
        )
    }

    pub fn skip_successful_requests(mut self, skip: bool) -> Self {
        self.skip_successful_requests = skip;
        self
    }

    pub fn skip_failed_requests(mut self, skip: bool) -> Self {
        self.skip_failed_requests = skip;
        self
    }

    /// Whether a response with `status` counts against the client's quota.
    pub fn counts(&self, status: u16) -> bool {
        if status < 400 {
            !self.skip_successful_requests
        } else {
            !self.skip_failed_requests
        }
    }
}
