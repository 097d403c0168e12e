use coinstream::{Config, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .init();

    let config = Config::from_env();
    tracing::info!(
        port = config.port,
        heartbeat_seconds = config.heartbeat_interval.as_secs(),
        history_capacity = config.store_capacity,
        "starting coinstream"
    );

    Server::new(config).run().await
}
