// crates/network/src/client.rs
//! HTTP client wrapper
//!
//! Requests are sent once. Failed requests surface to the caller instead of
//! being retried behind its back.

use crate::error::{NetworkError, NetworkResult};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Maximum redirects to follow
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("VinylCast/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

/// JSON-over-HTTP client
#[derive(Debug, Clone)]
pub struct Client {
    inner: ReqwestClient,
    config: ClientConfig,
}

impl Client {
    /// Creates a new client with default configuration
    pub fn new() -> NetworkResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> NetworkResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(NetworkError::Http)?;

        Ok(Self {
            inner: client,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GETs `url` and decodes the JSON body
    pub async fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> NetworkResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(self.inner.get(url).query(query)).await?;
        decode(response).await
    }

    /// POSTs `body` as JSON and decodes the JSON reply
    pub async fn post_json<B, T>(
        &self,
        url: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> NetworkResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.inner.post(url).query(query).json(body))
            .await?;
        decode(response).await
    }

    /// Sends a request, turning non-success statuses into errors
    async fn send(&self, request: RequestBuilder) -> NetworkResult<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                NetworkError::Timeout
            } else {
                NetworkError::Http(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        });

        if status == StatusCode::TOO_MANY_REQUESTS {
            log::warn!("Request quota exhausted: {}", message);
            return Err(NetworkError::Quota(message));
        }

        log::warn!("Request failed with {}: {}", status, message);
        Err(NetworkError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> NetworkResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| NetworkError::Decode(e.to_string()))
}

/// Pulls a message out of `{"error": {"message": ..}}` or `{"error": ".."}`
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.starts_with("VinylCast/"));
    }

    #[test]
    fn test_client_creation() {
        let client = Client::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_with_custom_config() {
        let config = ClientConfig {
            timeout: Duration::from_secs(10),
            user_agent: "TestAgent".to_string(),
            max_redirects: 5,
        };
        let client = Client::with_config(config).unwrap();
        assert_eq!(client.config().max_redirects, 5);
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error":{"code":400,"message":"API key not valid"}}"#),
            Some("API key not valid".to_string())
        );
        assert_eq!(
            error_message(r#"{"error":"Permission denied"}"#),
            Some("Permission denied".to_string())
        );
        assert_eq!(error_message("<html>"), None);
        assert_eq!(error_message(r#"{"ok":true}"#), None);
    }
}
