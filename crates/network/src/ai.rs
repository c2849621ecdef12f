// crates/network/src/ai.rs
//! Generative-text assistant
//!
//! [`GeminiEndpoint`] speaks the `generateContent` REST API. [`Assistant`]
//! wraps any [`TextEndpoint`] with the domain prompt and a minimum spacing
//! between outgoing requests.

use crate::client::Client;
use crate::error::{NetworkError, NetworkResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use vinylcast_resilience::{RateLimiter, Timeout};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(5000);

/// The reply the model is told to give for off-topic questions
pub const OUT_OF_SCOPE_REPLY: &str = "⚠️ Xin lỗi, tôi chỉ có thể trả lời các câu hỏi về lịch sử và kinh tế Việt Nam trong giai đoạn 2006-2015. Vui lòng đặt câu hỏi liên quan đến chủ đề này!";

/// Something that turns a prompt into text
#[async_trait]
pub trait TextEndpoint: Send + Sync {
    async fn generate(&self, prompt: &str) -> NetworkResult<String>;
}

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 800,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// `candidates[0].content.parts[0].text`
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }
}

/// Google Generative Language API client
#[derive(Debug, Clone)]
pub struct GeminiEndpoint {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    generation: GenerationConfig,
}

impl GeminiEndpoint {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            generation: GenerationConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextEndpoint for GeminiEndpoint {
    async fn generate(&self, prompt: &str) -> NetworkResult<String> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self.generation,
        };

        let response: GenerateResponse = self
            .client
            .post_json(&self.url(), &[("key", self.api_key.clone())], &request)
            .await?;

        response.into_text().ok_or(NetworkError::EmptyAnswer)
    }
}

/// Wraps a question in the domain instructions
pub fn build_prompt(question: &str) -> String {
    format!(
        "Bạn là một chuyên gia về lịch sử và kinh tế Việt Nam, đặc biệt là giai đoạn 2006-2015 \
(từ sau khi gia nhập WTO đến thời kỳ tái cơ cấu kinh tế).

**QUY TẮC QUAN TRỌNG:**
1. CHỈ trả lời các câu hỏi liên quan đến:
   - Việt Nam giai đoạn 2006-2015
   - Kinh tế, chính trị, xã hội Việt Nam trong thời kỳ này
   - WTO, hội nhập quốc tế, FDI
   - Doanh nghiệp nhà nước, cổ phần hóa, cải cách
   - Khủng hoảng 2008-2009 và tác động đến Việt Nam
   - Định hướng xã hội chủ nghĩa, an sinh xã hội
   - Chính sách kinh tế vĩ mô, lạm phát, tái cơ cấu

2. NẾU câu hỏi KHÔNG liên quan đến các chủ đề trên, hãy trả lời:
   \"{refusal}\"

3. NẾU câu hỏi có liên quan, hãy trả lời súc tích, chính xác (2-3 đoạn văn).

**Câu hỏi:** {question}

**Trả lời bằng tiếng Việt:**",
        refusal = OUT_OF_SCOPE_REPLY,
        question = question
    )
}

/// Domain assistant with request spacing
///
/// Requests are serialized: a caller arriving inside the spacing window
/// waits for its turn and is then sent, never dropped.
#[derive(Clone)]
pub struct Assistant {
    endpoint: Arc<dyn TextEndpoint>,
    limiter: RateLimiter,
    timeout: Option<Timeout>,
}

impl Assistant {
    /// Spacing below [`DEFAULT_MIN_REQUEST_INTERVAL`] is raised to it
    pub fn new(endpoint: Arc<dyn TextEndpoint>, min_interval: Duration) -> Self {
        if min_interval < DEFAULT_MIN_REQUEST_INTERVAL {
            log::warn!(
                "Request spacing {:?} is below the {:?} minimum; using the minimum",
                min_interval,
                DEFAULT_MIN_REQUEST_INTERVAL
            );
        }
        Self {
            endpoint,
            limiter: RateLimiter::new(min_interval.max(DEFAULT_MIN_REQUEST_INTERVAL)),
            timeout: None,
        }
    }

    /// Bounds each endpoint call; the wait for a slot is not counted
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(Timeout::new(timeout));
        self
    }

    pub fn min_interval(&self) -> Duration {
        self.limiter.min_interval()
    }

    pub async fn ask(&self, question: &str) -> NetworkResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(NetworkError::InvalidRequest(
                "question must not be empty".to_string(),
            ));
        }

        let prompt = build_prompt(question);
        let dispatched = self.limiter.acquire().await;
        log::debug!("Assistant request dispatched at {:?}", dispatched);

        let result = match &self.timeout {
            Some(timeout) => timeout.execute(self.endpoint.generate(&prompt)).await?,
            None => self.endpoint.generate(&prompt).await,
        };

        if let Err(e) = &result {
            log::warn!("Assistant request failed: {}", e);
        }
        result
    }

    /// Like [`ask`](Self::ask), with every failure turned into display text
    pub async fn ask_for_display(&self, question: &str) -> String {
        match self.ask(question).await {
            Ok(answer) => answer,
            Err(e) => e.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_question_and_refusal() {
        let prompt = build_prompt("Việt Nam gia nhập WTO năm nào?");
        assert!(prompt.contains("**Câu hỏi:** Việt Nam gia nhập WTO năm nào?"));
        assert!(prompt.contains(OUT_OF_SCOPE_REPLY));
    }

    #[test]
    fn test_generation_config_wire_names() {
        let json = serde_json::to_value(GenerationConfig::default()).unwrap();
        assert_eq!(json["topK"], 40);
        assert_eq!(json["maxOutputTokens"], 800);
        assert!(json.get("top_k").is_none());
    }

    #[test]
    fn test_extract_text() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Năm 2007."}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text(), Some("Năm 2007.".to_string()));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.into_text(), None);

        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(blocked.into_text(), None);
    }

    #[test]
    fn test_endpoint_url() {
        let endpoint = GeminiEndpoint::new(Client::new().unwrap(), "k")
            .with_base_url("http://localhost:9/v1beta/");
        assert_eq!(
            endpoint.url(),
            "http://localhost:9/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
