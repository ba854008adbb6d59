use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message inside a match's conversation, as stored by the backend.
/// `response_to_question` is only ever set on the conversation-opening
/// message; the backend ignores it everywhere else. Timestamps are naive
/// UTC, which is how the backend serializes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub match_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub response_to_question: Option<usize>,
    pub sent_at: NaiveDateTime,
    #[serde(default)]
    pub read_at: Option<NaiveDateTime>,
}

/// Outbound payload for POST /conversations/{match_id}/messages.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessagePayload {
    pub content: String,
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_to_question: Option<usize>,
}

impl SendMessagePayload {
    pub fn text(content: impl Into<String>, response_to_question: Option<usize>) -> Self {
        Self {
            content: content.into(),
            message_type: "text".to_string(),
            response_to_question,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ConversationStatus {
    pub conversation_started: bool,
}

/// A prompt answer published by the other party in a match, eligible as
/// the anchor for the conversation-opening message.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RespondablePrompt {
    pub question_index: usize,
    pub question: String,
    pub answer: String,
}
