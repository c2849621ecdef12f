//! Assistant configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lowest accepted request spacing
pub const MIN_REQUEST_INTERVAL_FLOOR_MS: u64 = 5000;

/// Generative-text endpoint settings
///
/// The API key itself never lives in the file; `api_key_env` names the
/// environment variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssistantConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,

    /// Minimum spacing between outgoing requests, never below 5000
    pub min_request_interval_ms: u64,

    pub request_timeout_secs: u64,

    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "VINYLCAST_AI_KEY".to_string(),
            min_request_interval_ms: MIN_REQUEST_INTERVAL_FLOOR_MS,
            request_timeout_secs: 30,
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 800,
        }
    }
}

impl AssistantConfig {
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reads the key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl ConfigSection for AssistantConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::not_empty(&self.base_url, "assistant.base_url"),
            Validator::http_url(&self.base_url, "assistant.base_url"),
            Validator::not_empty(&self.model, "assistant.model"),
            Validator::not_empty(&self.api_key_env, "assistant.api_key_env"),
            Validator::in_range(
                self.min_request_interval_ms,
                MIN_REQUEST_INTERVAL_FLOOR_MS,
                60_000,
                "assistant.min_request_interval_ms",
            ),
            Validator::in_range(
                self.request_timeout_secs,
                1,
                300,
                "assistant.request_timeout_secs",
            ),
            Validator::in_range(self.temperature, 0.0, 2.0, "assistant.temperature"),
            Validator::in_range(self.top_k, 1, 100, "assistant.top_k"),
            Validator::in_range(self.top_p, 0.0, 1.0, "assistant.top_p"),
            Validator::in_range(
                self.max_output_tokens,
                1,
                8192,
                "assistant.max_output_tokens",
            ),
        ])
    }

    fn merge(&mut self, other: Self) {
        self.base_url = other.base_url;
        self.model = other.model;
        self.api_key_env = other.api_key_env;
        self.min_request_interval_ms = other.min_request_interval_ms;
        self.request_timeout_secs = other.request_timeout_secs;
        self.temperature = other.temperature;
        self.top_k = other.top_k;
        self.top_p = other.top_p;
        self.max_output_tokens = other.max_output_tokens;
    }

    fn section_name(&self) -> &'static str {
        "assistant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AssistantConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_request_interval(), Duration::from_millis(5000));
    }

    #[test]
    fn test_spacing_below_floor_is_rejected() {
        for ms in [0, 1000, 4999] {
            let config = AssistantConfig {
                min_request_interval_ms: ms,
                ..Default::default()
            };
            let errors = config.validate().unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "assistant.min_request_interval_ms");
        }

        let config = AssistantConfig {
            min_request_interval_ms: 8000,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_sampling() {
        let config = AssistantConfig {
            temperature: 3.0,
            top_p: 1.5,
            top_k: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().len(), 3);
    }

    #[test]
    fn test_invalid_base_url() {
        let config = AssistantConfig {
            base_url: "generativelanguage.googleapis.com".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors[0].field, "assistant.base_url");
    }

    #[test]
    fn test_api_key_from_env() {
        let config = AssistantConfig {
            api_key_env: "VINYLCAST_TEST_ASSISTANT_KEY".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_key(), None);

        std::env::set_var("VINYLCAST_TEST_ASSISTANT_KEY", "abc");
        assert_eq!(config.api_key(), Some("abc".to_string()));
        std::env::remove_var("VINYLCAST_TEST_ASSISTANT_KEY");
    }
}
