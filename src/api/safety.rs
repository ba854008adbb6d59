// api/safety.rs

use serde::Deserialize;
use uuid::Uuid;

use crate::api::auth::MessageReceipt;
use crate::api::client::{ApiClient, ApiError};
use crate::models::matching::ProfileCard;
use crate::models::safety::{BlockRequest, ReportRequest, SafetyStats, SafetyTip};

#[derive(Deserialize)]
struct BlockedUsersResponse {
    blocked_users: Vec<ProfileCard>,
}

#[derive(Deserialize)]
struct TipsResponse {
    tips: Vec<SafetyTip>,
}

pub struct SafetyApi;

impl SafetyApi {
    pub async fn report(
        api: &ApiClient,
        user_id: Uuid,
        report: &ReportRequest,
    ) -> Result<MessageReceipt, ApiError> {
        api.post(&format!("/users/{}/report", user_id), report).await
    }

    /// Blocks a user; they disappear from the discover feed and can no
    /// longer message the current user.
    pub async fn block(
        api: &ApiClient,
        user_id: Uuid,
        request: &BlockRequest,
    ) -> Result<MessageReceipt, ApiError> {
        api.post(&format!("/users/{}/block", user_id), request).await
    }

    pub async fn unblock(api: &ApiClient, user_id: Uuid) -> Result<MessageReceipt, ApiError> {
        api.post(&format!("/users/{}/unblock", user_id), &serde_json::json!({}))
            .await
    }

    pub async fn blocked(api: &ApiClient) -> Result<Vec<ProfileCard>, ApiError> {
        let body: BlockedUsersResponse = api.get("/users/blocked").await?;
        Ok(body.blocked_users)
    }

    /// Safety tips shown in the safety center (public endpoint).
    pub async fn tips(api: &ApiClient) -> Result<Vec<SafetyTip>, ApiError> {
        let body: TipsResponse = api.get_public("/safety/tips").await?;
        Ok(body.tips)
    }

    pub async fn stats(api: &ApiClient) -> Result<SafetyStats, ApiError> {
        api.get_public("/safety/stats").await
    }

    /// Triggers the panic flow: alerts emergency contacts and logs the
    /// user's last known location server-side.
    pub async fn panic_alert(api: &ApiClient) -> Result<MessageReceipt, ApiError> {
        api.post("/safety/panic", &serde_json::json!({})).await
    }
}
