use serde::{Deserialize, Serialize};

/// The response when a client exceeds its request quota
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitErrorDto {
    /// Short error name, always "Too Many Requests"
    pub error: String,
    /// Message configured on the rate limiter that rejected the request
    pub message: String,
    /// Seconds until the client's window resets
    pub retry_after: i64,
    /// Time the request was rejected (RFC 3339)
    pub timestamp: String,
}

/// Service health summary
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    /// Whether delivery dates are being served from the mock generator only
    pub mock_mode: bool,
}
