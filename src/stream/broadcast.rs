use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;

use crate::{
    models::{
        event::StreamEvent,
        message::{ChatMessage, OutboundMessage},
        subscriber::Subscriber,
    },
    stream::registry::ConnectionRegistry,
};

/// Pushes events to every registered subscriber. Delivery is best-effort and
/// per-subscriber: a failed send disconnects that subscriber and nobody else.
/// No lock is held while sending; each pass works on a registry snapshot.
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Fans a chat message out to everyone, serializing per subscriber so
    /// each receiver gets its own own-message flag.
    pub async fn publish_message(&self, message: &ChatMessage) {
        let subscribers = self.registry.snapshot().await;
        let total = subscribers.len();
        let mut failed = Vec::new();

        for subscriber in subscribers {
            let event =
                StreamEvent::Message(OutboundMessage::new(message.clone(), &subscriber.user_id));
            if subscriber.send(event).is_err() {
                failed.push(subscriber.connection_id);
            }
        }

        tracing::debug!(
            message_id = %message.id,
            delivered = total - failed.len(),
            "broadcast chat message"
        );

        for connection_id in failed {
            self.close(&connection_id).await;
        }
    }

    /// Announces the current subscriber count to everyone. When a send fails
    /// the count it announced is already stale, so the dead connection is
    /// pruned and the announcement repeats until a pass survives intact.
    pub async fn publish_presence(&self) {
        loop {
            let count = self.registry.count().await;
            let mut failed = Vec::new();

            for subscriber in self.registry.snapshot().await {
                if subscriber.send(StreamEvent::UserCount { count }).is_err() {
                    failed.push(subscriber.connection_id);
                }
            }

            if failed.is_empty() {
                break;
            }
            for connection_id in failed {
                self.drop_subscriber(&connection_id).await;
            }
        }
    }

    /// Keep-alive for exactly one subscriber.
    pub fn publish_heartbeat(
        &self,
        subscriber: &Subscriber,
    ) -> Result<(), TrySendError<StreamEvent>> {
        subscriber.send(StreamEvent::Heartbeat {
            timestamp: Utc::now().timestamp_millis(),
        })
    }

    /// Greets a freshly registered subscriber with its connection id.
    pub fn send_connected(&self, subscriber: &Subscriber) {
        let _ = subscriber.send(StreamEvent::Connected {
            connection_id: subscriber.connection_id.clone(),
        });
    }

    /// The one and only Open -> Closed transition for a connection: remove,
    /// announce the new count, stop the heartbeat. Safe to call from any
    /// path (client abort, failed broadcast, failed heartbeat) any number of
    /// times; only the first call does anything.
    pub async fn close(&self, connection_id: &str) {
        let Some(subscriber) = self.registry.unregister(connection_id).await else {
            return;
        };
        let remaining = self.registry.count().await;
        tracing::info!(
            connection_id,
            remaining,
            "sse client disconnected"
        );

        self.publish_presence().await;

        // Cancel last: this may be the heartbeat task closing its own connection.
        if let Some(heartbeat) = subscriber.heartbeat {
            heartbeat.abort();
        }
    }

    // Removal without a presence announcement, for pruning inside
    // publish_presence itself.
    async fn drop_subscriber(&self, connection_id: &str) {
        if let Some(subscriber) = self.registry.unregister(connection_id).await {
            if let Some(heartbeat) = subscriber.heartbeat {
                heartbeat.abort();
            }
            let remaining = self.registry.count().await;
            tracing::info!(
                connection_id,
                remaining,
                "sse client disconnected"
            );
        }
    }
}
