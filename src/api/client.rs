// api/client.rs

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use thiserror::Error;

use crate::config::ClientConfig;

/// Errors produced by the HTTP collaborator layer
#[derive(Error, Debug)]
pub enum ApiError {
    /// Error when the request never produced a response (DNS, connect,
    /// timeout) or the response body could not be read/decoded
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Error when the backend answered with a non-success status. The
    /// detail is the backend's own message, surfaced verbatim.
    #[error("Backend rejected the request ({status}): {detail}")]
    Remote { status: u16, detail: String },

    /// Error when an authenticated endpoint is called before login
    #[error("Not authenticated: no access token has been set")]
    NotAuthenticated,
}

impl ApiError {
    /// HTTP status of a remote rejection, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// FastAPI-style error body: {"detail": "..."}
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Shared HTTP client for the backend API. Holds the base URL and the
/// bearer token issued at login; safe to share behind an Arc.
pub struct ApiClient {
    http: reqwest::Client,
    api_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url(),
            token: RwLock::new(None),
        }
    }

    /// Installs the access token returned by the login endpoint. All
    /// subsequent authenticated calls carry it as a bearer header.
    pub fn set_token(&self, token: impl Into<String>) {
        let mut slot = self.token.write().expect("token lock poisoned");
        *slot = Some(token.into());
    }

    pub fn clear_token(&self) {
        let mut slot = self.token.write().expect("token lock poisoned");
        *slot = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    /// The currently installed access token, if any. The live-update
    /// channel needs it as a query parameter rather than a header.
    pub fn token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    fn bearer(&self) -> Result<String, ApiError> {
        self.token
            .read()
            .expect("token lock poisoned")
            .clone()
            .ok_or(ApiError::NotAuthenticated)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// GET an authenticated endpoint and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let token = self.bearer()?;
        let response = self.http.get(self.url(path)).bearer_auth(token).send().await?;
        Self::decode(response).await
    }

    /// GET a public endpoint (no bearer header).
    pub async fn get_public<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let token = self.bearer()?;
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// POST a public endpoint (registration, login, email verification).
    pub async fn post_public<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let token = self.bearer()?;
        let response = self
            .http
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// POST a multipart form (photo upload).
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let token = self.bearer()?;
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Maps a response to the typed body, or to ApiError::Remote carrying
    /// the backend's `detail` message when the status is non-success.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        tracing::debug!("{} {}", status, response.url());
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.detail,
            Err(_) if !body.is_empty() => body,
            Err(_) => status.to_string(),
        };
        Err(ApiError::Remote {
            status: status.as_u16(),
            detail,
        })
    }
}
