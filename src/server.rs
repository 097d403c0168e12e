use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{api::routes, config::Config, error::ApiError, state::AppState};

pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let url = format!("0.0.0.0:{}", self.state.config.port);
        let listener = tokio::net::TcpListener::bind(&url).await?;
        tracing::info!("listening on http://{url}");

        axum::serve(
            listener,
            app(self.state).into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    routes::configure_api_routes(state)
        .fallback(|| async { ApiError::NotFound })
        .layer((TraceLayer::new_for_http(), CorsLayer::permissive()))
}
