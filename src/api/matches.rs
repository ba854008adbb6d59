// api/matches.rs

use serde::Deserialize;

use crate::api::client::{ApiClient, ApiError};
use crate::models::matching::{ConversationSummary, ProfileCard};

#[derive(Deserialize)]
struct MatchesResponse {
    matches: Vec<ProfileCard>,
}

#[derive(Deserialize)]
struct ConversationsResponse {
    conversations: Vec<ConversationSummary>,
}

pub struct MatchApi;

impl MatchApi {
    /// Fetches the profiles of everyone the current user has matched with.
    pub async fn list(api: &ApiClient) -> Result<Vec<ProfileCard>, ApiError> {
        let body: MatchesResponse = api.get("/matches").await?;
        Ok(body.matches)
    }

    /// Fetches the conversation list with last-message previews.
    pub async fn conversations(api: &ApiClient) -> Result<Vec<ConversationSummary>, ApiError> {
        let body: ConversationsResponse = api.get("/conversations").await?;
        Ok(body.conversations)
    }
}
