use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::{
    sync::mpsc::{Sender, error::TrySendError},
    task::AbortHandle,
};

use super::{event::StreamEvent, non_empty};

/// One live connection to the chat stream. Owned by the registry for its
/// whole lifetime; the sender half of the connection's event channel is the
/// only way to reach the client.
#[derive(Clone)]
pub struct Subscriber {
    pub connection_id: Arc<str>,
    pub user_id: String,
    pub username: String,
    tx: Sender<StreamEvent>,
    pub connected_at: DateTime<Utc>,
    pub last_seen: i64,
    pub heartbeat: Option<AbortHandle>,
}

impl Subscriber {
    pub fn new(
        connection_id: Arc<str>,
        user_id: String,
        username: String,
        tx: Sender<StreamEvent>,
    ) -> Self {
        Self {
            connection_id,
            user_id,
            username,
            tx,
            connected_at: Utc::now(),
            last_seen: Utc::now().timestamp_millis(),
            heartbeat: None,
        }
    }

    // Non-blocking; a full or closed channel counts as a dead connection.
    pub fn send(&self, event: StreamEvent) -> Result<(), TrySendError<StreamEvent>> {
        self.tx.try_send(event)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl SubscribeQuery {
    pub fn validated(self) -> Option<(String, String)> {
        Some((non_empty(self.user_id)?, non_empty(self.username)?))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub connection_id: Arc<str>,
    pub user_id: String,
    pub username: String,
    pub connected_at: DateTime<Utc>,
    pub last_seen: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn subscriber(capacity: usize) -> (Subscriber, mpsc::Receiver<StreamEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Subscriber::new(Arc::from("u1-1-abc"), "u1".to_string(), "Alice".to_string(), tx),
            rx,
        )
    }

    #[tokio::test]
    async fn send_fails_when_channel_is_full() {
        let (subscriber, _rx) = subscriber(1);

        assert!(subscriber.send(StreamEvent::UserCount { count: 1 }).is_ok());
        assert!(subscriber.send(StreamEvent::UserCount { count: 2 }).is_err());
    }

    #[tokio::test]
    async fn send_fails_when_receiver_is_gone() {
        let (subscriber, rx) = subscriber(8);
        drop(rx);

        assert!(subscriber.send(StreamEvent::UserCount { count: 1 }).is_err());
    }

    #[test]
    fn subscribe_query_requires_both_identity_fields() {
        let missing = SubscribeQuery {
            user_id: Some("u1".to_string()),
            username: None,
        };
        assert!(missing.validated().is_none());

        let blank = SubscribeQuery {
            user_id: Some("  ".to_string()),
            username: Some("Alice".to_string()),
        };
        assert!(blank.validated().is_none());

        let ok = SubscribeQuery {
            user_id: Some(" u1 ".to_string()),
            username: Some("Alice".to_string()),
        };
        assert_eq!(ok.validated(), Some(("u1".to_string(), "Alice".to_string())));
    }
}
