use std::sync::Arc;

use crate::server::{
    config::Config,
    error::Error,
    middleware::rate_limit::RateLimiters,
    service::delivery_date::{
        cache::DeliveryDateCache, client::DeliveryDateClient, DeliveryDateService,
    },
    util::time::SharedClock,
};

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub clock: SharedClock,
    pub delivery_client: DeliveryDateClient,
    pub delivery_cache: DeliveryDateCache,
    pub rate_limiters: RateLimiters,
}

impl AppState {
    /// Builds the upstream client, an empty cache and fresh rate limiters from `config`.
    pub fn new(config: Config, clock: SharedClock) -> Result<Self, Error> {
        let delivery_client = DeliveryDateClient::new(
            config.upstream.clone(),
            config.flags.api_timeout,
            config.formatter.clone(),
        )?;
        let rate_limiters = RateLimiters::new(clock.clone(), config.flags.trust_proxy);

        Ok(Self {
            config: Arc::new(config),
            clock,
            delivery_client,
            delivery_cache: DeliveryDateCache::new(),
            rate_limiters,
        })
    }

    pub fn delivery_date_service(&self) -> DeliveryDateService<'_> {
        DeliveryDateService::new(
            &self.delivery_client,
            &self.delivery_cache,
            self.clock.as_ref(),
            &self.config,
        )
    }
}
