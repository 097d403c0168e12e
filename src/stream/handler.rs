use axum::{
    extract::{ConnectInfo, Query, State},
    response::sse::Sse,
};
use chrono::Utc;
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::mpsc;

use crate::{
    error::ApiError,
    models::subscriber::{SubscribeQuery, Subscriber},
    state::AppState,
    stream::{connection::EventStream, heartbeat},
    utils::id_generator,
};

// Events queued per connection before a slow client counts as dead.
const EVENT_BUFFER: usize = 32;

pub async fn sse_handler(
    Query(query): Query<SubscribeQuery>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<AppState>>,
) -> Result<Sse<EventStream>, ApiError> {
    let Some((user_id, username)) = query.validated() else {
        return Err(ApiError::BadRequest("User ID and username required".into()));
    };

    if !state.rate_limiter.allow(addr).await {
        return Err(ApiError::TooManyRequests);
    }

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let connection_id = id_generator::connection_id(&user_id, Utc::now().timestamp_millis());
    let subscriber = Subscriber::new(connection_id.clone(), user_id, username, tx);

    state.registry.register(subscriber.clone()).await;
    state.broadcaster.send_connected(&subscriber);
    state.broadcaster.publish_presence().await;

    let heartbeat = heartbeat::spawn(
        state.broadcaster.clone(),
        subscriber,
        state.config.heartbeat_interval,
    );
    state.registry.attach_heartbeat(&connection_id, heartbeat).await;

    let total = state.registry.count().await;
    tracing::info!(
        connection_id = %connection_id,
        total,
        "sse client connected"
    );

    Ok(Sse::new(EventStream::new(
        rx,
        state.broadcaster.clone(),
        connection_id,
    )))
}
