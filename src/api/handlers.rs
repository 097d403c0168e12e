use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        self,
        message::{ChatMessage, OutboundMessage, PostMessage},
        subscriber::ClientStats,
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Accepts a chat message, stores it, and fans it out. Publishing always
/// succeeds once validation passes, no matter how many subscribers are
/// reachable right now.
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PostMessage>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Ok(Json(payload)) = payload else {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    };
    let Some((user_id, username, body)) = payload.validated() else {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    };

    let message = state
        .store
        .append(ChatMessage::new(user_id, username, body))
        .await;
    state.broadcaster.publish_message(&message).await;

    Ok(Json(json!({ "success": true, "message": message })))
}

pub async fn recent_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Value>> {
    let Some(user_id) = models::non_empty(query.user_id) else {
        return Err(ApiError::BadRequest("User ID required".into()));
    };

    let limit = query
        .limit
        .unwrap_or(state.config.default_history_limit)
        .min(state.config.store_capacity);

    let messages: Vec<OutboundMessage> = state
        .store
        .recent(limit)
        .await
        .into_iter()
        .map(|message| OutboundMessage::new(message, &user_id))
        .collect();

    Ok(Json(json!({ "messages": messages })))
}

#[derive(serde::Serialize)]
struct Stats {
    connections: usize,
    clients: Vec<ClientStats>,
    messages: usize,
}

pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let clients: Vec<ClientStats> = state
        .registry
        .snapshot()
        .await
        .into_iter()
        .map(|subscriber| ClientStats {
            connection_id: subscriber.connection_id.clone(),
            user_id: subscriber.user_id.clone(),
            username: subscriber.username.clone(),
            connected_at: subscriber.connected_at,
            last_seen: subscriber.last_seen,
        })
        .collect();
    let connections = clients.len();

    Json(json!(Stats {
        connections,
        clients,
        messages: state.store.count().await,
    }))
}
