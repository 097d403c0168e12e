#![allow(dead_code)]

use axum::{Router, extract::connect_info::MockConnectInfo};
use std::{net::SocketAddr, sync::Arc, time::Duration};

use coinstream::{config::Config, server, state::AppState};

pub const ADMIN_TOKEN: &str = "test_admin_token";

pub fn test_config() -> Config {
    Config {
        port: 0,
        admin_token: ADMIN_TOKEN.to_string(),
        heartbeat_interval: Duration::from_secs(30),
        store_capacity: 1000,
        default_history_limit: 50,
        rate_limit_count: 100,
        rate_limit_window: Duration::from_secs(60),
    }
}

pub fn test_state() -> Arc<AppState> {
    Arc::new(AppState::new(test_config()))
}

pub fn test_state_with(config: Config) -> Arc<AppState> {
    Arc::new(AppState::new(config))
}

/// Full router with a fixed peer address, since `oneshot` never goes through
/// a real TCP accept.
pub fn test_app(state: Arc<AppState>) -> Router {
    server::app(state).layer(MockConnectInfo(
        "127.0.0.1:8080".parse::<SocketAddr>().unwrap(),
    ))
}
