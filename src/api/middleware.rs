use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::{error::ApiError, state::AppState};

pub async fn admin_auth(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        == Some(state.config.admin_token.as_str())
    {
        Ok(next.run(req).await)
    } else {
        Err(ApiError::Unauthorized)
    }
}
