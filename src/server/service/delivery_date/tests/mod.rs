use std::time::Duration;

use chrono::{TimeZone, Utc};
use leverdag_test_utils::prelude::*;

use crate::server::{
    config::{Config, FeatureFlags, UpstreamConfig},
    service::delivery_date::{
        cache::DeliveryDateCache, client::DeliveryDateClient, DateOrigin, DeliveryDateService,
    },
    util::time::{Clock, DateFormatter, MockClock},
};

mod clear_cache;
mod resolve;

/// Owns everything a [`DeliveryDateService`] borrows.
struct Harness {
    client: DeliveryDateClient,
    cache: DeliveryDateCache,
    clock: MockClock,
    config: Config,
}

impl Harness {
    fn new(test: &TestContext, flags: FeatureFlags) -> Self {
        Self::with_upstream(test.to_upstream_config(), flags)
    }

    fn with_upstream(upstream: UpstreamConfig, flags: FeatureFlags) -> Self {
        let formatter = DateFormatter::default();
        let client = DeliveryDateClient::new(upstream.clone(), flags.api_timeout, formatter.clone())
            .expect("client should build");

        Self {
            client,
            cache: DeliveryDateCache::new(),
            // Friday
            clock: MockClock::new(Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()),
            config: Config {
                host: "127.0.0.1".to_string(),
                port: 0,
                upstream,
                flags,
                formatter,
            },
        }
    }

    fn service(&self) -> DeliveryDateService<'_> {
        DeliveryDateService::new(&self.client, &self.cache, &self.clock, &self.config)
            .with_initial_backoff(Duration::from_millis(1))
    }
}

fn flags(max_retries: u32) -> FeatureFlags {
    FeatureFlags {
        max_retries,
        ..FeatureFlags::default()
    }
}

fn is_weekday(date: chrono::NaiveDate) -> bool {
    use chrono::{Datelike, Weekday};

    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
