//! AI Provider Orchestrator: optional provider analysis with strict fallback
//! to the local pipeline.
//!
//! Flow: START → AI_ATTEMPT → {AI_SUCCESS | AI_FAILURE} → LOCAL_PIPELINE →
//!       MERGE → DONE
//!
//! The provider is called at most once per request, bounded by a timeout, and
//! never retried. Every provider failure is absorbed here; the caller only
//! ever sees input validation or internal errors.

use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Deserialize;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::pipeline::{run_local_pipeline, validate_inputs, LocalAnalysis};
use crate::analysis::prompts::build_analyze_prompt;
use crate::analysis::scorer::{current_hiring, hiring_probability, ScoringWeights};
use crate::analysis::suggestions::{rank, MAX_IMPACT, MAX_PRIORITY, MIN_PRIORITY};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    AnalysisReport, AnalysisSource, HiringProbability, Industry, KeywordAnalysis, MatchResult,
    ProviderOutcome, Suggestion, SuggestionType,
};
use crate::providers::{extract_json_object, AiProvider, AiProviderKind, ProviderError};

const MAX_KEY_FINDINGS: usize = 5;
const DEFAULT_PRIORITY: u8 = 3;
const DEFAULT_IMPACT: u8 = 5;

// ────────────────────────────────────────────
// Provider response (lenient)
// ────────────────────────────────────────────

/// What the provider is asked to return. Only `matchScore` is mandatory;
/// everything else is sanitized or replaced by the local result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAnalysis {
    pub match_score: f64,
    pub hiring_probability: Option<ProviderHiring>,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<ProviderSuggestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderHiring {
    pub current: Option<f64>,
    pub optimized: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSuggestion {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<String>,
    pub priority: Option<f64>,
    pub expected_impact: Option<f64>,
}

/// Parses a raw model reply: fences stripped, surrounding prose ignored.
pub fn parse_provider_analysis(text: &str) -> Result<ProviderAnalysis, ProviderError> {
    let candidate = extract_json_object(text).unwrap_or(text);
    Ok(serde_json::from_str(candidate)?)
}

// ────────────────────────────────────────────
// State machine
// ────────────────────────────────────────────

/// Result of the single provider attempt.
#[derive(Debug)]
pub enum AiAttempt {
    Success {
        analysis: ProviderAnalysis,
        provider: &'static str,
        latency_ms: u64,
    },
    Failure {
        provider: Option<&'static str>,
        latency_ms: u64,
        error: ProviderError,
    },
}

/// Output of `merge`: the authoritative result plus its labels.
#[derive(Debug, Clone)]
pub struct Merged {
    pub result: MatchResult,
    pub keywords: KeywordAnalysis,
    pub ai_enhanced: bool,
    pub provider: ProviderOutcome,
}

/// Shared, cheaply clonable analysis engine held in `AppState`.
#[derive(Clone)]
pub struct MatchEngine {
    provider: Option<AiProvider>,
    provider_kind: AiProviderKind,
    timeout: Duration,
    weights: ScoringWeights,
}

impl MatchEngine {
    pub fn new(
        provider: Option<AiProvider>,
        provider_kind: AiProviderKind,
        timeout: Duration,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            provider,
            provider_kind,
            timeout,
            weights,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Ok(Self::new(
            AiProvider::from_config(config)?,
            config.ai_provider,
            config.ai_timeout,
            config.scoring,
        ))
    }

    /// Name of the configured provider, if it has a credential.
    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(AiProvider::name)
    }

    /// Full analysis of a résumé against a JD.
    pub async fn analyze_resume(
        &self,
        resume_text: &str,
        jd_text: &str,
        industry: Option<Industry>,
    ) -> Result<AnalysisReport, AppError> {
        validate_inputs(resume_text, jd_text)?;

        let attempt = self.attempt_ai(resume_text, jd_text).await;
        let local = run_local_pipeline(resume_text, jd_text, industry, &self.weights)?;
        let industry = local.job.industry;
        let resume_structure = local.structure.clone();
        let merged = merge(attempt, local, &self.weights);

        info!(
            "Analysis complete: score={} ai_enhanced={} source={:?}",
            merged.result.overall_match_score, merged.ai_enhanced, merged.provider.source
        );

        let next_steps = merged
            .result
            .suggestions
            .iter()
            .map(|s| s.action.clone())
            .collect();

        Ok(AnalysisReport {
            analysis_id: Uuid::new_v4(),
            result: merged.result,
            keywords: merged.keywords,
            resume_structure,
            next_steps,
            ai_enhanced: merged.ai_enhanced,
            provider: merged.provider,
            industry,
            analyzed_at: Utc::now(),
        })
    }

    /// Same contract as `analyze_resume`; kept as the job-matching entry point.
    pub async fn match_resume_to_job(
        &self,
        resume_text: &str,
        jd_text: &str,
        industry: Option<Industry>,
    ) -> Result<AnalysisReport, AppError> {
        self.analyze_resume(resume_text, jd_text, industry).await
    }

    async fn attempt_ai(&self, resume_text: &str, jd_text: &str) -> AiAttempt {
        let Some(provider) = &self.provider else {
            let error = ProviderError::MissingCredential(self.provider_kind.credential_var());
            debug!("Skipping AI analysis: {error}");
            return AiAttempt::Failure {
                provider: None,
                latency_ms: 0,
                error,
            };
        };

        let prompt = build_analyze_prompt(resume_text, jd_text);
        let started = Instant::now();

        let outcome = match timeout(self.timeout, provider.generate(&prompt)).await {
            Ok(Ok(text)) => parse_provider_analysis(&text),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ProviderError::Timeout(self.timeout.as_millis() as u64)),
        };
        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(analysis) => {
                info!(
                    "AI analysis succeeded: provider={} latency_ms={}",
                    provider.name(),
                    latency_ms
                );
                AiAttempt::Success {
                    analysis,
                    provider: provider.name(),
                    latency_ms,
                }
            }
            Err(e) => {
                warn!(
                    "AI analysis failed, using local result: provider={} latency_ms={} error={}",
                    provider.name(),
                    latency_ms,
                    e
                );
                AiAttempt::Failure {
                    provider: Some(provider.name()),
                    latency_ms,
                    error: e,
                }
            }
        }
    }
}

// ────────────────────────────────────────────
// Merge
// ────────────────────────────────────────────

/// Picks the authoritative source. Skills, experience and keywords always
/// come from the local pipeline.
pub fn merge(attempt: AiAttempt, local: LocalAnalysis, weights: &ScoringWeights) -> Merged {
    let LocalAnalysis {
        result: local_result,
        keywords,
        ..
    } = local;

    match attempt {
        AiAttempt::Failure {
            provider,
            latency_ms,
            error,
        } => Merged {
            result: local_result,
            keywords,
            ai_enhanced: false,
            provider: ProviderOutcome {
                source: AnalysisSource::Local,
                provider_name: provider.map(str::to_string),
                latency_ms,
                // Category only: provider messages may echo request details.
                error: Some(error.category().to_string()),
            },
        },
        AiAttempt::Success {
            analysis,
            provider,
            latency_ms,
        } => {
            let overall = clamp_score(analysis.match_score);

            let mut suggestions: Vec<Suggestion> = analysis
                .suggestions
                .into_iter()
                .filter_map(sanitize_suggestion)
                .collect();
            if suggestions.is_empty() {
                suggestions = local_result.suggestions;
            } else {
                rank(&mut suggestions);
            }

            let mut key_findings: Vec<String> = analysis
                .key_findings
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .take(MAX_KEY_FINDINGS)
                .collect();
            if key_findings.is_empty() {
                key_findings = local_result.key_findings;
            }

            let reported = analysis
                .hiring_probability
                .and_then(|h| Some((h.current?, h.optimized)));
            let hiring = match reported {
                Some((current, optimized)) => {
                    let current = clamp_score(current);
                    let optimized = optimized.map(clamp_score).unwrap_or(current).max(current);
                    HiringProbability {
                        current,
                        optimized,
                        improvement: optimized as i32 - current as i32,
                    }
                }
                None => hiring_probability(current_hiring(overall, weights), &suggestions),
            };

            Merged {
                result: MatchResult {
                    overall_match_score: overall,
                    skills_match: local_result.skills_match,
                    experience_match: local_result.experience_match,
                    hiring_probability: hiring,
                    suggestions,
                    key_findings,
                },
                keywords,
                ai_enhanced: true,
                provider: ProviderOutcome {
                    source: AnalysisSource::Ai,
                    provider_name: Some(provider.to_string()),
                    latency_ms,
                    error: None,
                },
            }
        }
    }
}

fn clamp_score(value: f64) -> u32 {
    if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u32
    } else {
        0
    }
}

fn clamp_u8(value: Option<f64>, min: u8, max: u8, default: u8) -> u8 {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(min as f64, max as f64) as u8)
        .unwrap_or(default)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Clamps ranges and defaults unknown enums. Drops entries with neither a
/// title nor an action.
fn sanitize_suggestion(raw: ProviderSuggestion) -> Option<Suggestion> {
    let title = non_blank(raw.title);
    let action = non_blank(raw.action);
    let title = title.or_else(|| action.clone())?;
    let action = action.unwrap_or_else(|| title.clone());

    let kind = match raw.kind.as_deref().map(str::to_lowercase).as_deref() {
        Some("critical") => SuggestionType::Critical,
        Some("enhancement") => SuggestionType::Enhancement,
        _ => SuggestionType::Optimization,
    };

    Some(Suggestion {
        kind,
        description: non_blank(raw.description).unwrap_or_else(|| title.clone()),
        title,
        action,
        priority: clamp_u8(raw.priority, MIN_PRIORITY, MAX_PRIORITY, DEFAULT_PRIORITY),
        expected_impact: clamp_u8(raw.expected_impact, 0, MAX_IMPACT, DEFAULT_IMPACT),
    })
}
