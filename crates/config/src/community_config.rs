//! Community Q&A configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Realtime database and submission limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommunityConfig {
    /// Database root, e.g. `https://<project>.firebaseio.com`; empty disables
    /// the community board
    pub database_url: String,

    pub collection: String,

    /// Environment variable holding an optional database auth token
    pub auth_token_env: String,

    pub feed_limit: usize,
    pub max_name_chars: usize,
    pub max_question_chars: usize,
    pub refresh_interval_secs: u64,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            collection: "questions".to_string(),
            auth_token_env: "VINYLCAST_DB_TOKEN".to_string(),
            feed_limit: 50,
            max_name_chars: 50,
            max_question_chars: 500,
            refresh_interval_secs: 5,
        }
    }
}

impl CommunityConfig {
    pub fn is_enabled(&self) -> bool {
        !self.database_url.trim().is_empty()
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn auth_token(&self) -> Option<String> {
        std::env::var(&self.auth_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

impl ConfigSection for CommunityConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::http_url(&self.database_url, "community.database_url"),
            Validator::not_empty(&self.collection, "community.collection"),
            Validator::in_range(self.feed_limit, 1, 500, "community.feed_limit"),
            Validator::in_range(self.max_name_chars, 1, 50, "community.max_name_chars"),
            Validator::in_range(
                self.max_question_chars,
                1,
                500,
                "community.max_question_chars",
            ),
            Validator::in_range(
                self.refresh_interval_secs,
                1,
                3600,
                "community.refresh_interval_secs",
            ),
        ])
    }

    fn merge(&mut self, other: Self) {
        self.database_url = other.database_url;
        self.collection = other.collection;
        self.auth_token_env = other.auth_token_env;
        self.feed_limit = other.feed_limit;
        self.max_name_chars = other.max_name_chars;
        self.max_question_chars = other.max_question_chars;
        self.refresh_interval_secs = other.refresh_interval_secs;
    }

    fn section_name(&self) -> &'static str {
        "community"
    }
}
