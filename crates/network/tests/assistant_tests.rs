// crates/network/tests/assistant_tests.rs
//! Assistant spacing with a fake endpoint, and the Gemini wire format
//! against a mock server

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use vinylcast_network::{
    Assistant, Client, GeminiEndpoint, NetworkError, NetworkResult, TextEndpoint,
    OUT_OF_SCOPE_REPLY, QUOTA_MESSAGE,
};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records when each prompt reached the endpoint
#[derive(Default)]
struct RecordingEndpoint {
    dispatches: Mutex<Vec<(Instant, String)>>,
    fail_with_quota: bool,
}

impl RecordingEndpoint {
    fn times(&self) -> Vec<Instant> {
        self.dispatches.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

#[async_trait]
impl TextEndpoint for RecordingEndpoint {
    async fn generate(&self, prompt: &str) -> NetworkResult<String> {
        self.dispatches
            .lock()
            .unwrap()
            .push((Instant::now(), prompt.to_string()));
        if self.fail_with_quota {
            return Err(NetworkError::Quota("Resource has been exhausted".into()));
        }
        Ok("Việt Nam gia nhập WTO ngày 11/1/2007.".to_string())
    }
}

fn assistant(endpoint: Arc<RecordingEndpoint>) -> Assistant {
    Assistant::new(endpoint, Duration::from_millis(5000))
}

#[tokio::test(start_paused = true)]
async fn back_to_back_requests_are_spaced() {
    let endpoint = Arc::new(RecordingEndpoint::default());
    let assistant = assistant(Arc::clone(&endpoint));

    assistant.ask("Khi nào Việt Nam gia nhập WTO?").await.unwrap();
    assistant.ask("FDI năm 2008?").await.unwrap();

    let times = endpoint.times();
    assert_eq!(times.len(), 2);
    assert!(times[1].duration_since(times[0]) >= Duration::from_millis(5000));
}

#[tokio::test(start_paused = true)]
async fn zero_spacing_still_waits_five_seconds() {
    let endpoint = Arc::new(RecordingEndpoint::default());
    let assistant = Assistant::new(Arc::clone(&endpoint) as Arc<dyn TextEndpoint>, Duration::ZERO);
    assert_eq!(assistant.min_interval(), Duration::from_millis(5000));

    assistant.ask("WTO?").await.unwrap();
    assistant.ask("FDI?").await.unwrap();

    let times = endpoint.times();
    assert!(times[1].duration_since(times[0]) >= Duration::from_millis(5000));
}

#[tokio::test(start_paused = true)]
async fn concurrent_requests_queue_in_turn() {
    let endpoint = Arc::new(RecordingEndpoint::default());
    let assistant = assistant(Arc::clone(&endpoint));

    let mut tasks = Vec::new();
    for i in 0..3 {
        let assistant = assistant.clone();
        tasks.push(tokio::spawn(async move {
            assistant.ask(&format!("câu hỏi {}", i)).await
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }

    let mut times = endpoint.times();
    times.sort();
    assert_eq!(times.len(), 3);
    for pair in times.windows(2) {
        assert!(pair[1].duration_since(pair[0]) >= Duration::from_millis(5000));
    }
}

#[tokio::test(start_paused = true)]
async fn empty_question_is_not_sent() {
    let endpoint = Arc::new(RecordingEndpoint::default());
    let assistant = assistant(Arc::clone(&endpoint));

    let result = assistant.ask("   ").await;
    assert!(matches!(result, Err(NetworkError::InvalidRequest(_))));
    assert!(endpoint.times().is_empty());
}

#[tokio::test(start_paused = true)]
async fn prompt_wraps_trimmed_question() {
    let endpoint = Arc::new(RecordingEndpoint::default());
    let assistant = assistant(Arc::clone(&endpoint));

    assistant.ask("  Lạm phát 2008?  ").await.unwrap();
    let prompt = endpoint.dispatches.lock().unwrap()[0].1.clone();
    assert!(prompt.contains("**Câu hỏi:** Lạm phát 2008?\n"));
    assert!(prompt.contains(OUT_OF_SCOPE_REPLY));
}

#[tokio::test(start_paused = true)]
async fn quota_error_has_its_own_display_text() {
    let endpoint = Arc::new(RecordingEndpoint {
        fail_with_quota: true,
        ..Default::default()
    });
    let assistant = assistant(endpoint);

    assert_eq!(assistant.ask_for_display("WTO?").await, QUOTA_MESSAGE);
}

struct SlowEndpoint;

#[async_trait]
impl TextEndpoint for SlowEndpoint {
    async fn generate(&self, _prompt: &str) -> NetworkResult<String> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok("late".to_string())
    }
}

#[tokio::test(start_paused = true)]
async fn slow_endpoint_times_out() {
    let assistant = Assistant::new(Arc::new(SlowEndpoint), Duration::from_millis(5000))
        .with_timeout(Duration::from_secs(30));

    let result = assistant.ask("WTO?").await;
    assert!(matches!(result, Err(NetworkError::Timeout)));
    assert!(!assistant.ask_for_display("WTO?").await.contains("late"));
}

fn gemini(server: &MockServer) -> GeminiEndpoint {
    GeminiEndpoint::new(Client::new().unwrap(), "test-key")
        .with_base_url(format!("{}/v1beta", server.uri()))
}

#[tokio::test]
async fn gemini_request_shape_and_answer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "hello"}]}],
            "generationConfig": {"topK": 40, "maxOutputTokens": 800}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Xin chào"}], "role": "model"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let answer = gemini(&server).generate("hello").await.unwrap();
    assert_eq!(answer, "Xin chào");
}

#[tokio::test]
async fn gemini_429_is_quota() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    let err = gemini(&server).generate("hello").await.unwrap_err();
    assert!(err.is_quota());
    assert_eq!(err.user_message(), QUOTA_MESSAGE);
}

#[tokio::test]
async fn gemini_error_body_message_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid. Please pass a valid API key."}
        })))
        .mount(&server)
        .await;

    match gemini(&server).generate("hello").await {
        Err(NetworkError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.starts_with("API key not valid"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn gemini_without_candidates_is_empty_answer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let err = gemini(&server).generate("hello").await.unwrap_err();
    assert!(matches!(err, NetworkError::EmptyAnswer));
}
