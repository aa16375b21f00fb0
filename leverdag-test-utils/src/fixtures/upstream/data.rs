//! Upstream delivery date payload builders.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde_json::{json, Value};

/// Build an upstream payload in the shape the real API returns: a JSON array of objects with
/// a `date` field plus fields the service ignores.
pub fn upstream_payload(dates: &[&str]) -> Value {
    Value::Array(
        dates
            .iter()
            .map(|date| {
                json!({
                    "date": date,
                    "available": true,
                    "slots": 3
                })
            })
            .collect(),
    )
}

/// The first `count` weekdays strictly after `start`, formatted as `YYYY-MM-DD`.
pub fn weekday_dates_from(start: NaiveDate, count: usize) -> Vec<String> {
    (1..)
        .map(|offset| start + Duration::days(offset))
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .take(count)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .collect()
}
