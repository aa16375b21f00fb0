//! Tests for the delivery date endpoints.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use chrono::{Datelike, TimeDelta, Weekday};
use leverdag::{
    model::delivery_date::DeliveryDate,
    server::{
        controller::delivery_date::{clear_cache, get_available_dates},
        util::time::Clock,
    },
};

use super::*;

fn header_str<'a>(response: &'a axum::response::Response, name: header::HeaderName) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Expect upstream dates with public caching headers
#[tokio::test]
async fn serves_upstream_dates_with_cache_headers() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_delivery_dates_endpoint(upstream_payload(&["2026-10-19", "2026-10-20"]), 1)
        .build()
        .await?;
    let clock = test_clock();
    let state = test.into_app_state(test_flags(), &clock);

    let response = get_available_dates(State(state), HeaderMap::new()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CACHE_CONTROL), "public, max-age=300");
    assert_eq!(
        header_str(&response, header::LAST_MODIFIED),
        "Fri, 16 Oct 2026 12:00:00 GMT"
    );
    assert!(!header_str(&response, header::ETAG).is_empty());

    let dates: Vec<DeliveryDate> = json_body(response).await;
    assert_eq!(dates.len(), 2);
    assert_eq!(dates[0].date.to_string(), "2026-10-19");
    assert!(dates[0].display_name.starts_with("maandag"));

    test.assert_mocks();

    Ok(())
}

/// Expect the JSON body to use camelCase field names
#[tokio::test]
async fn serializes_display_name_in_camel_case() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_delivery_dates_endpoint(upstream_payload(&["2026-10-19"]), 1)
        .build()
        .await?;
    let clock = test_clock();
    let state = test.into_app_state(test_flags(), &clock);

    let response = get_available_dates(State(state), HeaderMap::new()).await;
    let body: serde_json::Value = json_body(response).await;

    assert_eq!(body[0]["date"], "2026-10-19");
    assert!(body[0]["displayName"].is_string());

    Ok(())
}

/// Expect 304 when the client already holds the cached dates
#[tokio::test]
async fn answers_not_modified_for_matching_etag() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_delivery_dates_endpoint(upstream_payload(&["2026-10-19"]), 1)
        .build()
        .await?;
    let clock = test_clock();
    let state = test.into_app_state(test_flags(), &clock);

    let first = get_available_dates(State(state.clone()), HeaderMap::new()).await;
    let etag = header_str(&first, header::ETAG).to_string();

    clock.advance(TimeDelta::minutes(1));
    let mut headers = HeaderMap::new();
    headers.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&etag).unwrap());
    let second = get_available_dates(State(state.clone()), headers).await;

    assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(header_str(&second, header::ETAG), etag);

    let mut stale = HeaderMap::new();
    stale.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"stale\""));
    let third = get_available_dates(State(state), stale).await;

    assert_eq!(third.status(), StatusCode::OK);

    test.assert_mocks();

    Ok(())
}

/// Expect generated weekday dates marked no-store when the upstream fails
#[tokio::test]
async fn serves_generated_dates_when_upstream_fails() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_failing_endpoint(503, 2)
        .build()
        .await?;
    let clock = test_clock();
    let state = test.into_app_state(test_flags(), &clock);

    for _ in 0..2 {
        let response = get_available_dates(State(state.clone()), HeaderMap::new()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, header::CACHE_CONTROL), "no-store");
        assert!(response.headers().get(header::ETAG).is_none());

        let dates: Vec<DeliveryDate> = json_body(response).await;
        assert_eq!(dates.len(), 14);
        assert!(dates
            .iter()
            .all(|d| !matches!(d.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    test.assert_mocks();

    Ok(())
}

/// Expect mock mode to serve generated dates without calling the upstream
#[tokio::test]
async fn mock_mode_never_calls_upstream() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_delivery_dates_endpoint(upstream_payload(&["2026-10-19"]), 0)
        .build()
        .await?;
    let clock = test_clock();
    let state = test.into_app_state(mock_mode_flags(), &clock);

    let response = get_available_dates(State(state), HeaderMap::new()).await;

    assert_eq!(header_str(&response, header::CACHE_CONTROL), "no-store");
    let dates: Vec<DeliveryDate> = json_body(response).await;
    let dates: Vec<String> = dates.iter().map(|d| d.date.to_string()).collect();
    assert_eq!(dates, weekday_dates_from(clock.today(), 14));

    test.assert_mocks();

    Ok(())
}

/// Expect clearing the cache to answer 204 and force a refetch
#[tokio::test]
async fn clear_cache_forces_refetch() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_delivery_dates_endpoint(upstream_payload(&["2026-10-19"]), 2)
        .build()
        .await?;
    let clock = test_clock();
    let state = test.into_app_state(test_flags(), &clock);

    get_available_dates(State(state.clone()), HeaderMap::new()).await;
    let cleared = clear_cache(State(state.clone())).await.into_response();
    let refetched = get_available_dates(State(state.clone()), HeaderMap::new()).await;

    assert_eq!(cleared.status(), StatusCode::NO_CONTENT);
    assert_eq!(refetched.status(), StatusCode::OK);
    assert!(state.delivery_cache.peek().is_some());

    test.assert_mocks();

    Ok(())
}
