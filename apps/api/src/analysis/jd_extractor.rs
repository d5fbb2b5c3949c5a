//! JD Extractor: job-posting URL → readable text → `JobDescription`.

use reqwest::Url;
use tracing::{info, warn};

use crate::analysis::keyword_extractor::extract_keywords;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::JobDescription;
use crate::providers::{prompts::truncate_chars, ExtractionService, ProviderError};

/// Retrieved page text is cut to this many characters before extraction.
pub const MAX_RAW_CONTENT_CHARS: usize = 5_000;

#[derive(Clone)]
pub struct JdExtractor {
    service: ExtractionService,
}

impl JdExtractor {
    pub fn new(service: ExtractionService) -> Self {
        Self { service }
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Ok(Self::new(ExtractionService::from_config(config)?))
    }

    pub fn service_name(&self) -> &'static str {
        self.service.name()
    }

    /// Fetches the posting and runs the keyword extractor on it. The service's
    /// client carries the extraction timeout.
    pub async fn extract_jd_from_url(&self, url: &str) -> Result<JobDescription, AppError> {
        let url = validate_url(url)?;

        info!("Extracting JD from {url} via {}", self.service.name());
        let content = self.service.extract_content(&url).await.map_err(|e| {
            warn!("JD extraction via {} failed: {e}", self.service.name());
            AppError::UpstreamUnavailable(format!(
                "could not retrieve the job posting via {}: {e}",
                self.service.name()
            ))
        })?;

        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::UpstreamUnavailable(
                "the job posting page had no readable content".to_string(),
            ));
        }

        // Truncate before extracting so key_skills only names terms that
        // survive in raw_content.
        extract_keywords(truncate_chars(content, MAX_RAW_CONTENT_CHARS), None)
    }
}

/// Absolute `http`/`https` URL with a host, or `InvalidInput`.
pub fn validate_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::InvalidInput(format!("'{raw}' is not a valid URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::InvalidInput(format!(
            "unsupported URL scheme '{}'; use http or https",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(AppError::InvalidInput(format!("'{raw}' has no host")));
    }
    Ok(url)
}
