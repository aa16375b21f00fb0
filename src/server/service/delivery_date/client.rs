//! HTTP client for the upstream delivery date API.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::{
    model::delivery_date::DeliveryDate,
    server::{
        config::UpstreamConfig,
        error::{delivery_date::DeliveryDateError, Error},
        util::time::DateFormatter,
    },
};

/// Longest upstream error body kept in logs and errors.
const MAX_ERROR_BODY_LEN: usize = 500;

/// Performs single upstream attempts. Retries are the caller's concern.
#[derive(Debug, Clone)]
pub struct DeliveryDateClient {
    http: reqwest::Client,
    upstream: UpstreamConfig,
    timeout: Duration,
    formatter: DateFormatter,
}

impl DeliveryDateClient {
    /// Creates a client for `upstream` applying `timeout` to every attempt.
    pub fn new(
        upstream: UpstreamConfig,
        timeout: Duration,
        formatter: DateFormatter,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            http,
            upstream,
            timeout,
            formatter,
        })
    }

    /// Fetches and normalizes the upstream delivery dates in a single attempt.
    ///
    /// # Returns
    /// - `Ok(Vec<DeliveryDate>)` - Parsed dates; malformed items are dropped
    /// - `Err(DeliveryDateError::UpstreamTimeout)` - No complete response within the timeout
    /// - `Err(DeliveryDateError::UpstreamStatus)` - Non-2xx response
    /// - `Err(DeliveryDateError::UpstreamRequest)` - Transport failure
    /// - `Err(DeliveryDateError::UpstreamDecode)` - 2xx response whose body isn't JSON
    pub async fn fetch_delivery_dates(&self) -> Result<Vec<DeliveryDate>, DeliveryDateError> {
        let mut request = self
            .http
            .get(&self.upstream.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout);

        if let Some(username) = &self.upstream.username {
            request = request.basic_auth(username, self.upstream.password.as_deref());
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(DeliveryDateError::UpstreamStatus {
                status: status.as_u16(),
                body: truncate(body, MAX_ERROR_BODY_LEN),
            });
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| DeliveryDateError::UpstreamDecode(e.to_string()))?;

        Ok(parse_delivery_dates(&payload, &self.formatter))
    }

    fn classify(&self, e: reqwest::Error) -> DeliveryDateError {
        if e.is_timeout() {
            DeliveryDateError::UpstreamTimeout(self.timeout)
        } else {
            DeliveryDateError::UpstreamRequest(e)
        }
    }
}

/// Normalizes an upstream payload into delivery dates.
///
/// The payload is expected to be an array of objects carrying a `date` field, either a plain
/// `YYYY-MM-DD` date or an RFC 3339 timestamp (taken as its UTC calendar date). Anything else is
/// logged and skipped; a payload that isn't an array yields no dates at all. Upstream order is
/// preserved.
pub fn parse_delivery_dates(payload: &Value, formatter: &DateFormatter) -> Vec<DeliveryDate> {
    let Some(items) = payload.as_array() else {
        tracing::warn!("Delivery date API returned a non-array payload, ignoring it");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let date = item.get("date").and_then(Value::as_str).and_then(parse_date);

            if date.is_none() {
                tracing::warn!("Skipping malformed delivery date item: {}", item);
            }

            date
        })
        .map(|date| DeliveryDate {
            date,
            display_name: formatter.display_name(date),
        })
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|at| at.with_timezone(&Utc).date_naive())
    })
}

fn truncate(mut body: String, max_len: usize) -> String {
    if body.len() > max_len {
        let mut end = max_len;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}
