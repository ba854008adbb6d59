// api/auth.rs

use serde::Deserialize;

use crate::api::client::{ApiClient, ApiError};
use crate::models::user::{AuthResponse, LoginData, RegisterData};

/// Plain {"message": "..."} acknowledgement body.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageReceipt {
    pub message: String,
}

pub struct AuthApi;

impl AuthApi {
    /// Registers a new account. The backend sends a verification email;
    /// the returned receipt carries its acknowledgement message.
    pub async fn register(api: &ApiClient, payload: &RegisterData) -> Result<MessageReceipt, ApiError> {
        api.post_public("/register", payload).await
    }

    /// Exchanges credentials for an access token and the account summary.
    /// The caller is responsible for installing the token on the client.
    pub async fn login(api: &ApiClient, payload: &LoginData) -> Result<AuthResponse, ApiError> {
        api.post_public("/login", payload).await
    }

    pub async fn verify_email(api: &ApiClient, token: &str) -> Result<MessageReceipt, ApiError> {
        api.post_public("/verify-email", &serde_json::json!({ "token": token }))
            .await
    }

    pub async fn resend_verification(api: &ApiClient, email: &str) -> Result<MessageReceipt, ApiError> {
        api.post_public("/resend-verification", &serde_json::json!({ "email": email }))
            .await
    }
}
