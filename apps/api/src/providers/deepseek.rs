use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::providers::{endpoint, read_success_body, ProviderError};

pub const MODEL: &str = "deepseek-chat";
const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// DeepSeek client (OpenAI-compatible chat completions).
#[derive(Clone)]
pub struct DeepSeekClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl DeepSeekClient {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(endpoint(&self.base_url, "v1/chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let body = read_success_body(response).await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "DeepSeek call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::EmptyContent {
                provider: "deepseek",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::spawn_stub;
    use axum::{http::HeaderMap, Json, Router};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_generate_sends_bearer_and_reads_first_choice() {
        let handler = |headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(
                headers.get("authorization").and_then(|v| v.to_str().ok()),
                Some("Bearer sk-test")
            );
            assert_eq!(body["model"], MODEL);
            assert_eq!(body["messages"][0]["content"], "analyze");
            Json(json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"matchScore\": 64}"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 4}
            }))
        };
        let router = Router::new().fallback(handler);
        let base = spawn_stub(router).await;

        let client = DeepSeekClient::new(Client::new(), "sk-test".to_string(), base);
        assert_eq!(client.generate("analyze").await.unwrap(), "{\"matchScore\": 64}");
    }

    #[tokio::test]
    async fn test_blank_content_is_empty() {
        let router = Router::new().fallback(|| async {
            Json(json!({"choices": [{"message": {"content": "  "}}]}))
        });
        let base = spawn_stub(router).await;

        let client = DeepSeekClient::new(Client::new(), "sk-test".to_string(), base);
        assert!(matches!(
            client.generate("analyze").await,
            Err(ProviderError::EmptyContent { .. })
        ));
    }
}
