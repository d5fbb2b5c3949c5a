/// Provider clients: the single point of entry for every outbound HTTP call.
///
/// Content analysis goes through `AiProvider`, page extraction through
/// `ExtractionService`. Both are closed enums chosen from `Config` at startup;
/// no other module talks to an external API.
///
/// Calls are made exactly once. Retrying, timing out and falling back are the
/// caller's decision.
use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

pub mod deepseek;
pub mod firecrawl;
pub mod gemini;
pub mod prompts;
pub mod reader;

pub use deepseek::DeepSeekClient;
pub use firecrawl::FirecrawlClient;
pub use gemini::GeminiClient;
pub use reader::ReaderClient;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{provider} returned empty content")]
    EmptyContent { provider: &'static str },

    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("Timed out after {0}ms")]
    Timeout(u64),
}

impl From<reqwest::Error> for ProviderError {
    /// Request URLs can carry credentials, so they never reach the message.
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

impl ProviderError {
    /// Coarse failure category, safe to hand back to callers.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Http(e) if e.is_timeout() => "timeout",
            Self::Http(_) => "transport_error",
            Self::Api { .. } => "upstream_status",
            Self::Parse(_) => "invalid_response",
            Self::EmptyContent { .. } => "empty_content",
            Self::MissingCredential(_) => "missing_credential",
            Self::Timeout(_) => "timeout",
        }
    }
}

// ────────────────────────────────────────────
// Content-analysis providers
// ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProviderKind {
    Gemini,
    DeepSeek,
}

impl AiProviderKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "deepseek" => Some(Self::DeepSeek),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
        }
    }

    /// Environment variable that must hold this provider's API key.
    pub fn credential_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }
}

#[derive(Clone)]
pub enum AiProvider {
    Gemini(GeminiClient),
    DeepSeek(DeepSeekClient),
}

impl AiProvider {
    /// Builds the configured primary provider. `Ok(None)` when its credential
    /// is absent; requests then go straight to the local pipeline.
    pub fn from_config(config: &Config) -> Result<Option<Self>, ProviderError> {
        let client = http_client(None)?;
        let provider = match config.ai_provider {
            AiProviderKind::Gemini => config.gemini_api_key.as_ref().map(|key| {
                Self::Gemini(GeminiClient::new(
                    client,
                    key.clone(),
                    config.gemini_api_url.clone(),
                ))
            }),
            AiProviderKind::DeepSeek => config.deepseek_api_key.as_ref().map(|key| {
                Self::DeepSeek(DeepSeekClient::new(
                    client,
                    key.clone(),
                    config.deepseek_api_url.clone(),
                ))
            }),
        };
        Ok(provider)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini(_) => AiProviderKind::Gemini.name(),
            Self::DeepSeek(_) => AiProviderKind::DeepSeek.name(),
        }
    }

    /// Sends one prompt and returns the model's raw text reply.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        match self {
            Self::Gemini(client) => client.generate(prompt).await,
            Self::DeepSeek(client) => client.generate(prompt).await,
        }
    }
}

// ────────────────────────────────────────────
// Extraction services
// ────────────────────────────────────────────

#[derive(Clone)]
pub enum ExtractionService {
    Firecrawl(FirecrawlClient),
    Reader(ReaderClient),
}

impl ExtractionService {
    /// Firecrawl when a key is configured, otherwise the credential-free reader.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let client = http_client(Some(config.extraction_timeout))?;
        let service = match &config.firecrawl_api_key {
            Some(key) => Self::Firecrawl(FirecrawlClient::new(
                client,
                key.clone(),
                config.firecrawl_api_url.clone(),
            )),
            None => Self::Reader(ReaderClient::new(client, config.reader_api_url.clone())),
        };
        Ok(service)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Firecrawl(_) => "firecrawl",
            Self::Reader(_) => "reader",
        }
    }

    /// Fetches the page's main readable text.
    pub async fn extract_content(&self, url: &Url) -> Result<String, ProviderError> {
        match self {
            Self::Firecrawl(client) => client.scrape(url).await,
            Self::Reader(client) => client.read(url).await,
        }
    }
}

// ────────────────────────────────────────────
// Shared helpers
// ────────────────────────────────────────────

pub(crate) fn http_client(timeout: Option<Duration>) -> Result<Client, ProviderError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Joins a base URL and a path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    Nested { error: ErrorBody },
    Flat { error: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Reads the body of a successful response, or turns a non-2xx response into
/// `ProviderError::Api` with the provider's message when it sent one.
pub(crate) async fn read_success_body(response: Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(ErrorEnvelope::Nested { error }) => error.message,
            Ok(ErrorEnvelope::Flat { error }) => error,
            Err(_) => body,
        };
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// The outermost `{ ... }` span of a model reply, after fence stripping.
/// Models sometimes wrap the object in a sentence of prose.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let text = strip_json_fences(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    pub async fn spawn_stub(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Base URL of a local port with nothing listening on it.
    pub async fn refused_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"matchScore\": 70}\n```";
        assert_eq!(strip_json_fences(input), "{\"matchScore\": 70}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"matchScore\": 70}\n```";
        assert_eq!(strip_json_fences(input), "{\"matchScore\": 70}");
    }

    #[test]
    fn test_extract_json_object_from_prose() {
        let input =
            "Here is the analysis: {\"matchScore\": 70, \"keyFindings\": []} Hope this helps!";
        assert_eq!(
            extract_json_object(input),
            Some("{\"matchScore\": 70, \"keyFindings\": []}")
        );
    }

    #[test]
    fn test_extract_json_object_none_without_braces() {
        assert_eq!(extract_json_object("I cannot help with that."), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        assert_eq!(
            endpoint("https://api.deepseek.com/", "/v1/chat/completions"),
            "https://api.deepseek.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!(AiProviderKind::parse("Gemini"), Some(AiProviderKind::Gemini));
        assert_eq!(AiProviderKind::parse("deepseek"), Some(AiProviderKind::DeepSeek));
        assert_eq!(AiProviderKind::parse("openai"), None);
    }

    #[tokio::test]
    async fn test_non_success_status_becomes_api_error() {
        use axum::{http::StatusCode, Json};
        use serde_json::json;

        let router = axum::Router::new().fallback(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"error": {"message": "quota exceeded"}})),
            )
        });
        let base = test_support::spawn_stub(router).await;

        let response = reqwest::get(&base).await.unwrap();
        match read_success_body(response).await {
            Err(ProviderError::Api { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_error_hides_request_url() {
        let base = test_support::refused_base_url().await;
        let err: ProviderError = reqwest::get(format!("{base}/v1?key=secret-value"))
            .await
            .unwrap_err()
            .into();

        assert_eq!(err.category(), "transport_error");
        assert!(!err.to_string().contains("secret-value"));
        assert!(!format!("{err:?}").contains("secret-value"));
    }

    #[test]
    fn test_categories_carry_no_detail() {
        let err = ProviderError::Api {
            status: 401,
            message: "bad key abc123".to_string(),
        };
        assert_eq!(err.category(), "upstream_status");
        assert_eq!(ProviderError::Timeout(5_000).category(), "timeout");
        assert_eq!(
            ProviderError::MissingCredential("GEMINI_API_KEY").category(),
            "missing_credential"
        );
    }
}
