//! Tests for the health endpoint.

use axum::extract::State;
use leverdag::server::controller::health::health;

use super::*;

/// Expect the health endpoint to report mock mode
#[tokio::test]
async fn reports_mock_mode() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let clock = test_clock();

    let live = health(State(test.into_app_state(test_flags(), &clock))).await;
    let mock = health(State(test.into_app_state(mock_mode_flags(), &clock))).await;

    assert_eq!(live.0.status, "ok");
    assert!(!live.0.mock_mode);
    assert!(mock.0.mock_mode);

    Ok(())
}
