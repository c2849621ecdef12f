// crates/network/src/realtime.rs
//! Realtime Database REST client
//!
//! Questions live under `{database_url}/{collection}` as objects keyed by
//! the push id the database assigns.

use crate::client::Client;
use crate::error::{NetworkError, NetworkResult};
use crate::store::CommunityStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vinylcast_core::{CommunityQuestion, NewQuestion, Timestamp};

pub const DEFAULT_COLLECTION: &str = "questions";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredQuestion {
    name: String,
    question: String,
    /// Epoch milliseconds
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

#[derive(Debug, Clone)]
pub struct RealtimeDbStore {
    client: Client,
    database_url: String,
    collection: String,
    auth_token: Option<String>,
}

impl RealtimeDbStore {
    pub fn new(client: Client, database_url: impl Into<String>) -> NetworkResult<Self> {
        let database_url = database_url.into();
        if !(database_url.starts_with("https://") || database_url.starts_with("http://")) {
            return Err(NetworkError::InvalidUrl(database_url));
        }

        Ok(Self {
            client,
            database_url: database_url.trim_end_matches('/').to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            auth_token: None,
        })
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into().trim_matches('/').to_string();
        self
    }

    /// Sent as the `auth` query parameter
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn collection_url(&self) -> String {
        format!("{}/{}.json", self.database_url, self.collection)
    }

    fn auth_query(&self) -> Vec<(&'static str, String)> {
        self.auth_token
            .iter()
            .map(|token| ("auth", token.clone()))
            .collect()
    }
}

#[async_trait]
impl CommunityStore for RealtimeDbStore {
    async fn append(
        &self,
        question: NewQuestion,
        timestamp: Timestamp,
    ) -> NetworkResult<CommunityQuestion> {
        let record = StoredQuestion {
            name: question.name().to_string(),
            question: question.question().to_string(),
            timestamp: timestamp.as_millis(),
        };

        let pushed: PushResponse = self
            .client
            .post_json(&self.collection_url(), &self.auth_query(), &record)
            .await?;

        log::info!("Stored question {} from {}", pushed.name, record.name);
        Ok(question.into_stored(pushed.name, timestamp))
    }

    async fn recent(&self, limit: usize) -> NetworkResult<Vec<CommunityQuestion>> {
        let mut query = self.auth_query();
        query.push(("orderBy", "\"timestamp\"".to_string()));
        query.push(("limitToLast", limit.to_string()));

        // an empty collection reads back as `null`
        let records: Option<HashMap<String, StoredQuestion>> =
            self.client.get_json(&self.collection_url(), &query).await?;

        Ok(newest_first(records.unwrap_or_default(), limit))
    }
}

fn newest_first(records: HashMap<String, StoredQuestion>, limit: usize) -> Vec<CommunityQuestion> {
    let mut questions: Vec<CommunityQuestion> = records
        .into_iter()
        .map(|(id, record)| CommunityQuestion {
            id,
            name: record.name,
            question: record.question,
            timestamp: Timestamp::from_millis(record.timestamp),
        })
        .collect();

    // push ids sort chronologically, which breaks timestamp ties
    questions.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
    questions.truncate(limit);
    questions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, ts: i64) -> StoredQuestion {
        StoredQuestion {
            name: name.to_string(),
            question: "q".to_string(),
            timestamp: ts,
        }
    }

    #[test]
    fn test_newest_first_with_tie_break() {
        let mut records = HashMap::new();
        records.insert("-N1".to_string(), record("a", 100));
        records.insert("-N3".to_string(), record("c", 300));
        records.insert("-N2".to_string(), record("b", 300));

        let ordered = newest_first(records, 50);
        let ids: Vec<&str> = ordered.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["-N3", "-N2", "-N1"]);
    }

    #[test]
    fn test_newest_first_truncates() {
        let records = (0..60)
            .map(|i| (format!("-K{:03}", i), record("x", i)))
            .collect();
        let ordered = newest_first(records, 50);
        assert_eq!(ordered.len(), 50);
        assert_eq!(ordered[0].timestamp.as_millis(), 59);
    }

    #[test]
    fn test_collection_url() {
        let store = RealtimeDbStore::new(Client::new().unwrap(), "https://db.example.com/")
            .unwrap()
            .with_collection("/questions/");
        assert_eq!(store.collection_url(), "https://db.example.com/questions.json");
    }

    #[test]
    fn test_rejects_non_http_url() {
        assert!(RealtimeDbStore::new(Client::new().unwrap(), "db.example.com").is_err());
    }
}
