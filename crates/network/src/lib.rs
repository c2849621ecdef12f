// crates/network/src/lib.rs
//! Remote services for VinylCast
//!
//! A JSON HTTP [`Client`], the generative-text [`Assistant`] and the
//! community [`QnaBoard`] backed by a realtime database.

mod ai;
mod client;
mod error;
mod qna;
mod realtime;
mod store;

pub use ai::{
    build_prompt, Assistant, GeminiEndpoint, GenerationConfig, TextEndpoint, DEFAULT_BASE_URL,
    DEFAULT_MIN_REQUEST_INTERVAL, DEFAULT_MODEL, OUT_OF_SCOPE_REPLY,
};
pub use client::{Client, ClientConfig};
pub use error::{NetworkError, NetworkResult, QUOTA_MESSAGE};
pub use qna::{QnaBoard, QnaLimits, DEFAULT_FEED_LIMIT, MIN_REFRESH_INTERVAL};
pub use realtime::{RealtimeDbStore, DEFAULT_COLLECTION};
pub use store::CommunityStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_exports_accessible() {
        let client = Client::new().expect("Failed to create client");
        let _: GeminiEndpoint = GeminiEndpoint::new(client.clone(), "key");
        let _: RealtimeDbStore = RealtimeDbStore::new(client, "https://db.example.com").unwrap();
        let _ = QnaLimits::default();
    }
}
