use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::providers::{endpoint, read_success_body, ProviderError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'a str; 1],
    only_main_content: bool,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    data: Option<ScrapeData>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    content: Option<String>,
}

/// Firecrawl `/v1/scrape` client. Needs an API key.
#[derive(Clone)]
pub struct FirecrawlClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FirecrawlClient {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Main content of the page as markdown.
    pub async fn scrape(&self, url: &Url) -> Result<String, ProviderError> {
        let request_body = ScrapeRequest {
            url: url.as_str(),
            formats: ["markdown"],
            only_main_content: true,
        };

        let response = self
            .client
            .post(endpoint(&self.base_url, "v1/scrape"))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let body = read_success_body(response).await?;
        let parsed: ScrapeResponse = serde_json::from_str(&body)?;

        parsed
            .data
            .and_then(|data| data.markdown.or(data.content))
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::EmptyContent {
                provider: "firecrawl",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::spawn_stub;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_scrape_returns_markdown() {
        let router = Router::new().fallback(|Json(body): Json<Value>| async move {
            assert_eq!(body["url"], "https://jobs.example.com/123");
            assert_eq!(body["formats"][0], "markdown");
            assert_eq!(body["onlyMainContent"], true);
            Json(json!({"success": true, "data": {"markdown": "# Rust Engineer"}}))
        });
        let base = spawn_stub(router).await;

        let client = FirecrawlClient::new(Client::new(), "fc-key".to_string(), base);
        let url = Url::parse("https://jobs.example.com/123").unwrap();
        assert_eq!(client.scrape(&url).await.unwrap(), "# Rust Engineer");
    }

    #[tokio::test]
    async fn test_missing_data_is_empty_content() {
        let router = Router::new().fallback(|| async { Json(json!({"success": false})) });
        let base = spawn_stub(router).await;

        let client = FirecrawlClient::new(Client::new(), "fc-key".to_string(), base);
        let url = Url::parse("https://jobs.example.com/123").unwrap();
        assert!(matches!(
            client.scrape(&url).await,
            Err(ProviderError::EmptyContent { provider: "firecrawl" })
        ));
    }
}
