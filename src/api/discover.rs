// api/discover.rs

use serde::Deserialize;
use uuid::Uuid;

use crate::api::client::{ApiClient, ApiError};
use crate::models::matching::{LikeOutcome, ProfileCard};

#[derive(Deserialize)]
struct DiscoverResponse {
    users: Vec<ProfileCard>,
}

pub struct DiscoverApi;

impl DiscoverApi {
    /// Fetches the next batch of profiles to swipe on. Profiles the user
    /// already liked (and the user's own) are excluded server-side.
    pub async fn feed(api: &ApiClient, limit: Option<usize>) -> Result<Vec<ProfileCard>, ApiError> {
        let path = match limit {
            Some(limit) => format!("/discover?limit={}", limit),
            None => "/discover".to_string(),
        };
        let body: DiscoverResponse = api.get(&path).await?;
        Ok(body.users)
    }

    /// Records that the current user viewed a profile. The backend only
    /// accepts a like after the profile has been viewed.
    pub async fn record_view(api: &ApiClient, user_id: Uuid) -> Result<(), ApiError> {
        let _: serde_json::Value = api
            .post(&format!("/profile/{}/view", user_id), &serde_json::json!({}))
            .await?;
        Ok(())
    }

    pub async fn like(api: &ApiClient, user_id: Uuid) -> Result<LikeOutcome, ApiError> {
        api.post(&format!("/profile/{}/like", user_id), &serde_json::json!({}))
            .await
    }
}
