use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use super::{handlers, middleware::admin_auth};
use crate::{state::AppState, stream};

pub fn configure_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/chat",
            get(handlers::recent_messages).post(handlers::post_message),
        )
        .route("/api/chat/sse", get(stream::handler::sse_handler))
        .route(
            "/api/stats",
            get(handlers::stats_handler)
                .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth)),
        )
        .with_state(state)
}
