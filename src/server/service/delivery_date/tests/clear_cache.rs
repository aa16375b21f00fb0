use super::*;

/// Expect clearing the cache to force the next call upstream
#[tokio::test]
async fn clear_cache_forces_refetch() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_delivery_dates_endpoint(upstream_payload(&["2026-10-19"]), 2)
        .build()
        .await?;
    let harness = Harness::new(&test, flags(3));

    harness.service().resolve().await;
    let cleared = harness.service().clear_cache();
    let cleared_again = harness.service().clear_cache();
    let resolved = harness.service().resolve().await;

    assert!(cleared);
    assert!(!cleared_again);
    assert!(matches!(resolved.origin, DateOrigin::Live { .. }));

    test.assert_mocks();

    Ok(())
}
