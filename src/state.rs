use std::sync::Arc;

use crate::{
    config::Config,
    store::MessageStore,
    stream::{broadcast::Broadcaster, registry::ConnectionRegistry},
    utils::rate_limit::RateLimiter,
};

pub struct AppState {
    pub config: Config,
    pub registry: Arc<ConnectionRegistry>,
    pub broadcaster: Arc<Broadcaster>,
    pub store: MessageStore,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        // A single registry instance feeds both the publish and subscribe paths.
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Arc::new(Broadcaster::new(registry.clone()));

        Self {
            registry,
            broadcaster,
            store: MessageStore::new(config.store_capacity),
            rate_limiter: RateLimiter::new(config.rate_limit_count, config.rate_limit_window),
            config,
        }
    }
}
