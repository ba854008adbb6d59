// api/profile.rs

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::api::auth::MessageReceipt;
use crate::api::client::{ApiClient, ApiError};
use crate::models::profile::{
    LocationUpdate, PhotoUploadReceipt, ProfileQuestion, ProfileUpdate, SearchPreferences,
};
use crate::models::user::{UserProfile, VerificationStatus};

#[derive(Deserialize)]
struct QuestionsResponse {
    questions: Vec<ProfileQuestion>,
}

pub struct ProfileApi;

impl ProfileApi {
    /// Fetches the published pool of profile questions (public endpoint).
    pub async fn questions(api: &ApiClient) -> Result<Vec<ProfileQuestion>, ApiError> {
        let body: QuestionsResponse = api.get_public("/profile/questions").await?;
        Ok(body.questions)
    }

    pub async fn me(api: &ApiClient) -> Result<UserProfile, ApiError> {
        api.get("/profile/me").await
    }

    pub async fn update(api: &ApiClient, update: &ProfileUpdate) -> Result<MessageReceipt, ApiError> {
        api.put("/profile", update).await
    }

    /// Uploads one profile photo as a multipart form.
    ///
    /// # Arguments
    /// * `bytes` - Raw image bytes
    /// * `filename` - Original file name, used by the backend for type checks
    /// * `content_type` - MIME type, must be an image/* type
    pub async fn upload_photo(
        api: &ApiClient,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<PhotoUploadReceipt, ApiError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(ApiError::Network)?;
        let form = Form::new().part("file", part);
        api.post_multipart("/profile/upload-photo", form).await
    }

    pub async fn set_location(api: &ApiClient, update: &LocationUpdate) -> Result<MessageReceipt, ApiError> {
        api.post("/profile/location", update).await
    }

    pub async fn set_search_preferences(
        api: &ApiClient,
        preferences: &SearchPreferences,
    ) -> Result<MessageReceipt, ApiError> {
        api.put("/profile/search-preferences", preferences).await
    }

    pub async fn verification_status(api: &ApiClient) -> Result<VerificationStatus, ApiError> {
        api.get("/profile/verification-status").await
    }

    /// Submits a base64-encoded selfie for photo verification review.
    pub async fn submit_photo_verification(
        api: &ApiClient,
        photo_base64: &str,
    ) -> Result<MessageReceipt, ApiError> {
        api.post(
            "/profile/verify-photo",
            &serde_json::json!({ "verification_photo": photo_base64 }),
        )
        .await
    }
}
