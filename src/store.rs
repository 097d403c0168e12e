use chrono::Utc;
use std::collections::VecDeque;
use tokio::sync::RwLock;

use crate::{models::message::ChatMessage, utils::id_generator};

/// Bounded in-memory history of recent chat messages. Oldest entries are
/// evicted silently once the capacity is reached; nothing survives a restart.
pub struct MessageStore {
    messages: RwLock<VecDeque<ChatMessage>>,
    capacity: usize,
}

impl MessageStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    /// Appends a message, assigning an id and timestamp unless already set,
    /// and returns the stored form.
    pub async fn append(&self, mut message: ChatMessage) -> ChatMessage {
        if message.timestamp == 0 {
            message.timestamp = Utc::now().timestamp_millis();
        }
        if message.id.is_empty() {
            message.id = id_generator::message_id(message.timestamp);
        }

        let mut messages = self.messages.write().await;
        messages.push_back(message.clone());
        while messages.len() > self.capacity {
            messages.pop_front();
        }

        message
    }

    /// The last `limit` messages in chronological order, oldest first.
    pub async fn recent(&self, limit: usize) -> Vec<ChatMessage> {
        let messages = self.messages.read().await;
        let skip = messages.len().saturating_sub(limit);
        messages.iter().skip(skip).cloned().collect()
    }

    pub async fn count(&self) -> usize {
        self.messages.read().await.len()
    }
}
