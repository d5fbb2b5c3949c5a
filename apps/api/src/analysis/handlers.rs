//! Axum route handlers for the Match API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::dictionary::dictionary;
use crate::analysis::keyword_extractor::extract_keywords;
use crate::analysis::pipeline::validate_inputs;
use crate::errors::AppError;
use crate::models::{AnalysisReport, Industry, JobDescription};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractKeywordsRequest {
    #[serde(default, alias = "jobDescription")]
    pub jd_text: String,
    pub industry: Option<String>,
}

/// `jd_url` is only used when `jd_text` is blank.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, alias = "resumeText")]
    pub resume_text: String,
    #[serde(default, alias = "jobDescription")]
    pub jd_text: String,
    #[serde(alias = "jobUrl")]
    pub jd_url: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractJdRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct HighConversionQuery {
    pub industry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IndustryEntry {
    pub id: Industry,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IndustriesResponse {
    pub industries: Vec<IndustryEntry>,
}

#[derive(Debug, Serialize)]
pub struct HighConversionResponse {
    pub industry: Industry,
    pub keywords: Vec<&'static str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match/keywords
///
/// Structured extraction of a raw job description. No provider call.
pub async fn handle_extract_keywords(
    Json(request): Json<ExtractKeywordsRequest>,
) -> Result<Json<JobDescription>, AppError> {
    let industry = Industry::resolve(request.industry.as_deref());
    let job = extract_keywords(&request.jd_text, industry)?;
    Ok(Json(job))
}

/// POST /api/v1/match/analyze
///
/// Full résumé vs JD analysis, AI-enhanced when the provider answers.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let jd_text = resolve_jd_text(&state, &request).await?;
    let industry = Industry::resolve(request.industry.as_deref());

    let report = state
        .engine
        .analyze_resume(&request.resume_text, &jd_text, industry)
        .await?;
    Ok(Json(report))
}

/// POST /api/v1/match/resume
///
/// Job-matching entry point. Same contract as `/analyze`.
pub async fn handle_match_resume(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let jd_text = resolve_jd_text(&state, &request).await?;
    let industry = Industry::resolve(request.industry.as_deref());

    let report = state
        .engine
        .match_resume_to_job(&request.resume_text, &jd_text, industry)
        .await?;
    Ok(Json(report))
}

/// POST /api/v1/match/extract-jd
///
/// Fetches a posting through the extraction service and structures it.
pub async fn handle_extract_jd(
    State(state): State<AppState>,
    Json(request): Json<ExtractJdRequest>,
) -> Result<Json<JobDescription>, AppError> {
    let job = state.jd_extractor.extract_jd_from_url(&request.url).await?;
    Ok(Json(job))
}

/// GET /api/v1/match/industries
pub async fn handle_list_industries() -> Json<IndustriesResponse> {
    let industries = Industry::ALL
        .iter()
        .map(|industry| IndustryEntry {
            id: *industry,
            label: industry.label(),
        })
        .collect();
    Json(IndustriesResponse { industries })
}

/// GET /api/v1/match/high-conversion-keywords?industry=
///
/// Missing or unknown industry resolves to `general`.
pub async fn handle_high_conversion_keywords(
    Query(query): Query<HighConversionQuery>,
) -> Result<Json<HighConversionResponse>, AppError> {
    let industry = Industry::resolve(query.industry.as_deref()).unwrap_or_default();
    let keywords = dictionary()?
        .high_conversion(industry)
        .iter()
        .map(|term| term.name)
        .collect();
    Ok(Json(HighConversionResponse { industry, keywords }))
}

/// Inline JD text wins; otherwise the URL is extracted. The résumé is checked
/// first so an empty one never costs a network call.
async fn resolve_jd_text(state: &AppState, request: &AnalyzeRequest) -> Result<String, AppError> {
    if !request.jd_text.trim().is_empty() {
        return Ok(request.jd_text.clone());
    }
    match request.jd_url.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(url) => {
            validate_inputs(&request.resume_text, url)?;
            let job = state.jd_extractor.extract_jd_from_url(url).await?;
            Ok(job.raw_content)
        }
        None => Ok(String::new()),
    }
}
