// config.rs

use dotenv::dotenv;
use std::env;
use thiserror::Error;
use uuid::Uuid;

/// Configuration-related error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error when required environment variable is not found
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// Error when the backend URL has an unusable scheme
    #[error("Backend URL must start with http:// or https://: {0}")]
    InvalidBackendUrl(String),
}

/// Client configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    backend_url: String,
}

impl ClientConfig {
    /// Loads the backend URL from DATECONNECT_BACKEND_URL
    ///
    /// # Returns
    /// * `Result<ClientConfig, ConfigError>` - Resolved configuration or an error
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let backend_url = env::var("DATECONNECT_BACKEND_URL")
            .map_err(|_| ConfigError::EnvVarNotFound("DATECONNECT_BACKEND_URL".to_string()))?;
        Self::new(backend_url)
    }

    pub fn new(backend_url: impl Into<String>) -> Result<Self, ConfigError> {
        let backend_url: String = backend_url.into();
        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(ConfigError::InvalidBackendUrl(backend_url));
        }
        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL for REST calls; every route lives under the /api prefix.
    pub fn api_url(&self) -> String {
        format!("{}/api", self.backend_url)
    }

    /// WebSocket endpoint for the live-update channel of the given user.
    /// The scheme is derived from the HTTP base URL (http -> ws, https -> wss).
    pub fn ws_url(&self, user_id: Uuid, token: &str) -> String {
        let ws_base = self
            .backend_url
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1);
        format!("{}/ws/{}?token={}", ws_base, user_id, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_urls() {
        assert!(ClientConfig::new("ftp://example.com").is_err());
    }

    #[test]
    fn derives_ws_scheme_from_http_scheme() {
        let cfg = ClientConfig::new("https://date.example.com/").unwrap();
        let user_id = Uuid::new_v4();
        let url = cfg.ws_url(user_id, "tok");
        assert!(url.starts_with("wss://date.example.com/ws/"));
        assert!(url.ends_with("?token=tok"));
        assert_eq!(cfg.api_url(), "https://date.example.com/api");
    }
}
