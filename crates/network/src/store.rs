// crates/network/src/store.rs
//! Append-only community question store

use crate::error::NetworkResult;
use async_trait::async_trait;
use vinylcast_core::{CommunityQuestion, NewQuestion, Timestamp};

#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// Persists a validated question and returns it with its store key
    async fn append(
        &self,
        question: NewQuestion,
        timestamp: Timestamp,
    ) -> NetworkResult<CommunityQuestion>;

    /// Up to `limit` questions, newest first
    async fn recent(&self, limit: usize) -> NetworkResult<Vec<CommunityQuestion>>;
}
