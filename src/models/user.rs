use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::profile::PromptAnswer;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterData {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters long"))]
    pub first_name: String,
    #[validate(range(min = 18, max = 100, message = "Age must be between 18 and 100"))]
    pub age: u8,
    pub gender: String,
    pub gender_preference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

/// Minimal user payload returned alongside an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub age: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: AccountSummary,
}

/// The current user's own profile as served by /profile/me.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub age: u8,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub question_answers: Vec<PromptAnswer>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: NaiveDateTime,
    pub last_active: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationStatus {
    pub verification_status: String,
    #[serde(default)]
    pub is_verified: bool,
}
