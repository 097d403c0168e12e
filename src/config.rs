use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub admin_token: String,
    pub heartbeat_interval: Duration,
    pub store_capacity: usize,
    pub default_history_limit: usize,
    pub rate_limit_count: u32,
    pub rate_limit_window: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let admin_token = env::var("COINSTREAM_ADMIN_TOKEN")
            .expect("COINSTREAM_ADMIN_TOKEN environment variable must be set");

        let port = env::var("COINSTREAM_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3113);

        let heartbeat_seconds = env::var("COINSTREAM_HEARTBEAT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .expect("COINSTREAM_HEARTBEAT_SECONDS must be a valid number");

        let store_capacity = env::var("COINSTREAM_HISTORY_CAPACITY")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<usize>()
            .expect("COINSTREAM_HISTORY_CAPACITY must be a valid number");

        let default_history_limit = env::var("COINSTREAM_HISTORY_LIMIT")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<usize>()
            .expect("COINSTREAM_HISTORY_LIMIT must be a valid number");

        let rate_limit_count = env::var("COINSTREAM_RATE_LIMIT_COUNT")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<u32>()
            .expect("COINSTREAM_RATE_LIMIT_COUNT must be a valid number");

        let rate_limit_seconds = env::var("COINSTREAM_RATE_LIMIT_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .expect("COINSTREAM_RATE_LIMIT_SECONDS must be a valid number");

        Self {
            port,
            admin_token,
            heartbeat_interval: Duration::from_secs(heartbeat_seconds),
            store_capacity,
            default_history_limit,
            rate_limit_count,
            rate_limit_window: Duration::from_secs(rate_limit_seconds),
        }
    }
}
