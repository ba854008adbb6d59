// api/conversations.rs

use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::client::{ApiClient, ApiError};
use crate::models::message::{ConversationStatus, Message, RespondablePrompt, SendMessagePayload};
use crate::services::conversation_gate::ConversationBackend;

#[derive(Deserialize)]
struct MessagesResponse {
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct PromptsResponse {
    questions_with_answers: Vec<RespondablePrompt>,
}

pub struct ConversationApi;

impl ConversationApi {
    pub async fn status(api: &ApiClient, match_id: Uuid) -> Result<ConversationStatus, ApiError> {
        api.get(&format!("/conversations/{}/status", match_id)).await
    }

    /// The other participant's prompt answers, eligible as first-message
    /// anchors for the current user.
    pub async fn respondable_prompts(
        api: &ApiClient,
        match_id: Uuid,
    ) -> Result<Vec<RespondablePrompt>, ApiError> {
        let body: PromptsResponse = api
            .get(&format!("/conversations/{}/questions", match_id))
            .await?;
        Ok(body.questions_with_answers)
    }

    pub async fn messages(api: &ApiClient, match_id: Uuid) -> Result<Vec<Message>, ApiError> {
        let body: MessagesResponse = api
            .get(&format!("/conversations/{}/messages", match_id))
            .await?;
        Ok(body.messages)
    }

    pub async fn send(
        api: &ApiClient,
        match_id: Uuid,
        payload: &SendMessagePayload,
    ) -> Result<Message, ApiError> {
        api.post(&format!("/conversations/{}/messages", match_id), payload)
            .await
    }
}

/// The production backend for the conversation gate: the HTTP API behind
/// a shared client handle.
impl ConversationBackend for Arc<ApiClient> {
    async fn fetch_status(&self, match_id: Uuid) -> Result<ConversationStatus, ApiError> {
        ConversationApi::status(self, match_id).await
    }

    async fn fetch_prompts(&self, match_id: Uuid) -> Result<Vec<RespondablePrompt>, ApiError> {
        ConversationApi::respondable_prompts(self, match_id).await
    }

    async fn fetch_messages(&self, match_id: Uuid) -> Result<Vec<Message>, ApiError> {
        ConversationApi::messages(self, match_id).await
    }

    async fn send_message(
        &self,
        match_id: Uuid,
        payload: &SendMessagePayload,
    ) -> Result<Message, ApiError> {
        ConversationApi::send(self, match_id, payload).await
    }
}
