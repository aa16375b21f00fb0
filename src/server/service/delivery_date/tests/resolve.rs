use chrono::TimeDelta;
use serde_json::json;

use super::*;

/// Expect a single upstream call while the cache entry is fresh
#[tokio::test]
async fn serves_fresh_cache_without_refetch() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_delivery_dates_endpoint(upstream_payload(&["2026-10-19", "2026-10-20"]), 1)
        .build()
        .await?;
    let harness = Harness::new(&test, flags(3));
    let fetched_at = harness.clock.now();

    let first = harness.service().resolve().await;
    harness.clock.advance(TimeDelta::milliseconds(299_999));
    let second = harness.service().resolve().await;

    assert_eq!(first.origin, DateOrigin::Live { fetched_at });
    assert_eq!(second.origin, DateOrigin::Cached { fetched_at });
    assert_eq!(first.dates, second.dates);
    assert_eq!(second.dates.len(), 2);

    test.assert_mocks();

    Ok(())
}

/// Expect a second upstream call once the cache timeout has elapsed
#[tokio::test]
async fn refetches_after_cache_expiry() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_delivery_dates_endpoint(upstream_payload(&["2026-10-19"]), 2)
        .build()
        .await?;
    let harness = Harness::new(&test, flags(3));

    harness.service().resolve().await;
    harness.clock.advance(TimeDelta::milliseconds(300_000));
    let refreshed = harness.service().resolve().await;

    assert_eq!(
        refreshed.origin,
        DateOrigin::Live {
            fetched_at: harness.clock.now()
        }
    );
    assert_eq!(harness.cache.peek().unwrap().timestamp, harness.clock.now());

    test.assert_mocks();

    Ok(())
}

/// Expect generated weekday dates on every failing call, and the upstream to be retried once it
/// recovers
#[tokio::test]
async fn falls_back_to_mock_without_caching() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_failing_endpoint(503, 2)
        .with_delivery_dates_endpoint(upstream_payload(&["2026-10-21"]), 1)
        .build()
        .await?;
    let harness = Harness::new(&test, flags(1));

    for _ in 0..2 {
        let resolved = harness.service().resolve().await;

        assert_eq!(resolved.origin, DateOrigin::Mock);
        assert_eq!(resolved.dates.len(), 14);
        assert!(resolved.dates.iter().all(|d| is_weekday(d.date)));
        assert!(harness.cache.peek().is_none());
    }

    let recovered = harness.service().get_delivery_dates().await;

    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[0].date.to_string(), "2026-10-21");
    assert!(harness.cache.peek().is_some());

    test.assert_mocks();

    Ok(())
}

/// Expect mock mode to never touch the upstream or the cache
#[tokio::test]
async fn mock_mode_bypasses_upstream_and_cache() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_delivery_dates_endpoint(upstream_payload(&["2026-10-19"]), 0)
        .build()
        .await?;
    let harness = Harness::new(
        &test,
        FeatureFlags {
            enable_mock_mode: true,
            ..FeatureFlags::default()
        },
    );
    harness
        .cache
        .store(Vec::new(), harness.clock.now());

    let resolved = harness.service().resolve().await;

    assert_eq!(resolved.origin, DateOrigin::Mock);
    assert_eq!(resolved.dates.len(), 14);
    // First weekday after Friday 2026-10-16
    assert_eq!(resolved.dates[0].date.to_string(), "2026-10-19");
    assert!(harness.cache.peek().unwrap().data.is_empty());

    test.assert_mocks();

    Ok(())
}

/// Expect mock dates to be identical for the same day
#[tokio::test]
async fn mock_dates_are_deterministic() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let harness = Harness::new(&test, flags(0));

    let first = harness.service().generate_mock_delivery_dates();
    harness.clock.advance(TimeDelta::hours(6));
    let second = harness.service().generate_mock_delivery_dates();

    assert_eq!(first, second);

    Ok(())
}

/// Expect malformed upstream items to be dropped while valid ones are cached in order
#[tokio::test]
async fn drops_malformed_upstream_items() -> Result<(), TestError> {
    let payload = json!([
        { "date": "2026-10-22", "available": true },
        { "date": "not a date" },
        { "slots": 3 },
        { "date": "2026-10-20T08:00:00Z" },
    ]);
    let test = TestBuilder::new()
        .with_delivery_dates_endpoint(payload, 1)
        .build()
        .await?;
    let harness = Harness::new(&test, flags(3));

    let dates = harness.service().get_delivery_dates().await;

    let dates: Vec<String> = dates.iter().map(|d| d.date.to_string()).collect();
    assert_eq!(dates, vec!["2026-10-22", "2026-10-20"]);

    test.assert_mocks();

    Ok(())
}

/// Expect a non-array payload to count as a successful, empty response
#[tokio::test]
async fn non_array_payload_is_cached_as_empty() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_raw_endpoint(r#"{"dates":["2026-10-19"]}"#, 1)
        .build()
        .await?;
    let harness = Harness::new(&test, flags(3));

    let resolved = harness.service().resolve().await;

    assert!(resolved.dates.is_empty());
    assert!(matches!(resolved.origin, DateOrigin::Live { .. }));
    assert!(harness.cache.peek().is_some());

    test.assert_mocks();

    Ok(())
}
