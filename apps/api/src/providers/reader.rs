use reqwest::{header::ACCEPT, Client, Url};
use serde::Deserialize;

use crate::providers::{endpoint, read_success_body, ProviderError};

#[derive(Debug, Deserialize)]
struct ReaderResponse {
    data: Option<ReaderData>,
}

#[derive(Debug, Deserialize)]
struct ReaderData {
    content: Option<String>,
}

/// Credential-free reader endpoint (`GET {base}/{page url}`), e.g. r.jina.ai.
#[derive(Clone)]
pub struct ReaderClient {
    client: Client,
    base_url: String,
}

impl ReaderClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub async fn read(&self, url: &Url) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(endpoint(&self.base_url, url.as_str()))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let body = read_success_body(response).await?;
        let parsed: ReaderResponse = serde_json::from_str(&body)?;

        parsed
            .data
            .and_then(|data| data.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::EmptyContent { provider: "reader" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::spawn_stub;
    use axum::{http::Uri, Json, Router};
    use serde_json::json;

    #[tokio::test]
    async fn test_read_appends_page_url_and_returns_content() {
        let router = Router::new().fallback(|uri: Uri| async move {
            assert_eq!(uri.path(), "/https://jobs.example.com/123");
            Json(json!({"code": 200, "data": {"title": "Job", "content": "Senior Rust Engineer"}}))
        });
        let base = spawn_stub(router).await;

        let client = ReaderClient::new(Client::new(), base);
        let url = Url::parse("https://jobs.example.com/123").unwrap();
        assert_eq!(client.read(&url).await.unwrap(), "Senior Rust Engineer");
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_error() {
        let router = Router::new().fallback(|| async { "<html>blocked</html>" });
        let base = spawn_stub(router).await;

        let client = ReaderClient::new(Client::new(), base);
        let url = Url::parse("https://jobs.example.com/123").unwrap();
        assert!(matches!(client.read(&url).await, Err(ProviderError::Parse(_))));
    }
}
