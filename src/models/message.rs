use serde::{Deserialize, Serialize};

use super::non_empty;

/// A chat message as held by the store. `id` and `timestamp` are assigned on
/// append when left empty; once appended the message is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub username: String,
    #[serde(rename = "message")]
    pub body: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(user_id: String, username: String, body: String) -> Self {
        Self {
            id: String::new(),
            user_id,
            username,
            body,
            timestamp: 0,
        }
    }
}

/// A message as delivered to one receiver, with the own-message flag
/// computed against that receiver's identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    #[serde(flatten)]
    pub message: ChatMessage,
    pub is_own: bool,
}

impl OutboundMessage {
    pub fn new(message: ChatMessage, receiver_id: &str) -> Self {
        let is_own = message.user_id == receiver_id;
        Self { message, is_own }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessage {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PostMessage {
    // Any missing or blank field invalidates the whole payload.
    pub fn validated(self) -> Option<(String, String, String)> {
        Some((
            non_empty(self.user_id)?,
            non_empty(self.username)?,
            non_empty(self.message)?,
        ))
    }
}
