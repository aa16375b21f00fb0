//! Schedules of the background jobs.

pub mod rate_limit {
    use std::time::Duration;

    /// Interval between sweeps of expired rate limit windows.
    pub const SWEEP_INTERVAL: Duration = Duration::from_millis(60_000);
}
