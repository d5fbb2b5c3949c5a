use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::providers::{endpoint, read_success_body, ProviderError};

pub const MODEL: &str = "gemini-1.5-flash";
const TEMPERATURE: f32 = 0.2;
const MAX_OUTPUT_TOKENS: u32 = 2048;
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

/// Google Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = endpoint(
            &self.base_url,
            &format!("v1beta/models/{MODEL}:generateContent"),
        );
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request_body)
            .send()
            .await?;

        let body = read_success_body(response).await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed
            .into_text()
            .ok_or(ProviderError::EmptyContent { provider: "gemini" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::spawn_stub;
    use axum::{
        http::{HeaderMap, StatusCode, Uri},
        Json, Router,
    };
    use serde_json::{json, Value};

    fn client(base: String) -> GeminiClient {
        GeminiClient::new(Client::new(), "test-key".to_string(), base)
    }

    #[tokio::test]
    async fn test_generate_returns_first_candidate_text() {
        let router = Router::new().fallback(
            |uri: Uri, headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers[API_KEY_HEADER], "test-key");
                assert!(uri.query().is_none());
                assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
                Json(json!({
                    "candidates": [{"content": {"parts": [{"text": "{\"matchScore\": 80}"}]}}],
                    "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 5}
                }))
            },
        );
        let base = spawn_stub(router).await;

        let text = client(base).generate("hello").await.unwrap();
        assert_eq!(text, "{\"matchScore\": 80}");
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_content() {
        let router = Router::new().fallback(|| async { Json(json!({"candidates": []})) });
        let base = spawn_stub(router).await;

        let err = client(base).generate("hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyContent { provider: "gemini" }));
    }

    #[tokio::test]
    async fn test_server_error_is_api_error() {
        let router = Router::new().fallback(|| async {
            (StatusCode::INTERNAL_SERVER_ERROR, "boom")
        });
        let base = spawn_stub(router).await;

        let err = client(base).generate("hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 500, .. }));
    }
}
