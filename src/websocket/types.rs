// websocket/types.rs

use serde::Deserialize;
use uuid::Uuid;

/// Push frames arriving on the live-update channel. Only the shape needed
/// to decide what to re-fetch is modeled: the channel is at-least-once
/// and possibly out of order, so push bodies are invalidation hints and
/// never an authoritative message source.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum LiveUpdate {
    #[serde(rename = "new_message")]
    NewMessage {
        #[serde(default)]
        message: Option<MessageHint>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageHint {
    #[serde(default)]
    pub match_id: Option<Uuid>,
}

/// What the listener asks the hosting view to re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshHint {
    /// Re-run the message/status fetches for one conversation.
    Conversation(Uuid),
    /// Re-fetch the conversation list.
    ConversationList,
}
