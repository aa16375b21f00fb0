use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::{
    model::{
        api::RateLimitErrorDto,
        delivery_date::DeliveryDate,
    },
    server::{
        model::app::AppState,
        service::delivery_date::{DateOrigin, ResolvedDates},
        util::time::http_date,
    },
};

pub static DELIVERY_DATE_TAG: &str = "delivery-date";

/// Get the delivery dates available at checkout
///
/// Always answers 200: when the upstream API is unavailable generated weekday dates are served
/// instead. Upstream data carries `Cache-Control`, `ETag` and `Last-Modified` headers and honors
/// `If-None-Match`; generated data is marked `no-store`.
#[utoipa::path(
    get,
    path = "/api/delivery-dates/available",
    tag = DELIVERY_DATE_TAG,
    responses(
        (status = 200, description = "Delivery dates available at checkout", body = Vec<DeliveryDate>),
        (status = 304, description = "Dates unchanged since the provided ETag"),
        (status = 429, description = "Too many requests from this client", body = RateLimitErrorDto)
    ),
)]
pub async fn get_available_dates(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ResolvedDates { dates, origin } = state.delivery_date_service().resolve().await;

    let fetched_at = match origin {
        DateOrigin::Live { fetched_at } | DateOrigin::Cached { fetched_at } => fetched_at,
        DateOrigin::Mock => {
            return (
                StatusCode::OK,
                [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
                Json(dates),
            )
                .into_response();
        }
    };

    let max_age = state.config.flags.cache_timeout.as_secs();
    let etag = entity_tag(fetched_at, &dates);

    let mut response = if if_none_match(&headers, &etag) {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        (StatusCode::OK, Json(dates)).into_response()
    };

    let response_headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", max_age)) {
        response_headers.insert(header::CACHE_CONTROL, value);
    }
    if let Ok(value) = HeaderValue::from_str(&etag) {
        response_headers.insert(header::ETAG, value);
    }
    if let Ok(value) = HeaderValue::from_str(&http_date(fetched_at)) {
        response_headers.insert(header::LAST_MODIFIED, value);
    }

    response
}

/// Clear the cached upstream delivery dates
///
/// The next request for available dates fetches from the upstream API again.
#[utoipa::path(
    delete,
    path = "/api/delivery-dates/cache",
    tag = DELIVERY_DATE_TAG,
    responses(
        (status = 204, description = "Cache cleared"),
        (status = 429, description = "Too many requests from this client", body = RateLimitErrorDto)
    ),
)]
pub async fn clear_cache(State(state): State<AppState>) -> StatusCode {
    state.delivery_date_service().clear_cache();

    StatusCode::NO_CONTENT
}

/// Strong entity tag over the fetch time and every served date with its display name.
fn entity_tag(fetched_at: DateTime<Utc>, dates: &[DeliveryDate]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(fetched_at.timestamp_millis().to_be_bytes());
    for date in dates {
        hasher.update(date.date.to_string());
        hasher.update([0u8]);
        hasher.update(&date.display_name);
        hasher.update([0u8]);
    }

    format!("\"{:x}\"", hasher.finalize())
}

fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|tag| tag.trim().trim_start_matches("W/"))
        .any(|tag| tag == "*" || tag == etag)
}
