use serde::Serialize;
use std::sync::Arc;

use super::message::OutboundMessage;

/// The wire-level union pushed to subscribers, serialized as
/// `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum StreamEvent {
    Connected {
        #[serde(rename = "connectionId")]
        connection_id: Arc<str>,
    },
    Message(OutboundMessage),
    UserCount {
        count: usize,
    },
    Heartbeat {
        timestamp: i64,
    },
}
