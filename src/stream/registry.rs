use std::{collections::HashMap, sync::Arc};
use tokio::{sync::RwLock, task::AbortHandle};

use crate::models::subscriber::Subscriber;

/// The set of live connections, keyed by connection id. Shared between the
/// subscription endpoint, the broadcaster, and every heartbeat task; all
/// mutation happens under the lock, iteration happens on snapshots.
#[derive(Default)]
pub struct ConnectionRegistry {
    subscribers: RwLock<HashMap<Arc<str>, Subscriber>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, subscriber: Subscriber) -> Arc<str> {
        let connection_id = subscriber.connection_id.clone();
        self.subscribers
            .write()
            .await
            .insert(connection_id.clone(), subscriber);
        connection_id
    }

    /// Idempotent removal; returns the subscriber on first call only.
    pub async fn unregister(&self, connection_id: &str) -> Option<Subscriber> {
        self.subscribers.write().await.remove(connection_id)
    }

    /// Wires up the heartbeat canceller once the timer task exists. If the
    /// connection is already gone the task is aborted on the spot.
    pub async fn attach_heartbeat(&self, connection_id: &str, handle: AbortHandle) {
        let mut subscribers = self.subscribers.write().await;
        match subscribers.get_mut(connection_id) {
            Some(subscriber) => subscriber.heartbeat = Some(handle),
            None => handle.abort(),
        }
    }

    pub async fn touch(&self, connection_id: &str, timestamp_ms: i64) {
        if let Some(subscriber) = self.subscribers.write().await.get_mut(connection_id) {
            subscriber.last_seen = timestamp_ms;
        }
    }

    /// Momentary copy of all subscribers; safe to iterate while the registry
    /// keeps changing underneath.
    pub async fn snapshot(&self) -> Vec<Subscriber> {
        self.subscribers.read().await.values().cloned().collect()
    }

    pub async fn count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}
