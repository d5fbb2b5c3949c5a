use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Industry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    Critical,
    Enhancement,
    Optimization,
}

/// A single improvement action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub title: String,
    pub description: String,
    pub action: String,
    /// 1 (lowest) – 5 (highest)
    pub priority: u8,
    /// Estimated score-point gain, 0 – 20
    pub expected_impact: u8,
}

/// Three-way skill partition plus the skills sub-score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsMatch {
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    pub additional: BTreeSet<String>,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceMatch {
    pub required: String,
    pub current: String,
    pub satisfied: bool,
    pub gap_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiringProbability {
    pub current: u32,
    pub optimized: u32,
    pub improvement: i32,
}

/// The engine's single output type. Everything in here is a deterministic
/// function of the inputs and the provider outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub overall_match_score: u32,
    pub skills_match: SkillsMatch,
    pub experience_match: ExperienceMatch,
    pub hiring_probability: HiringProbability,
    pub suggestions: Vec<Suggestion>,
    pub key_findings: Vec<String>,
}

/// ATS-oriented structure checks on the résumé. Always local.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeStructure {
    pub score: u32,
    pub word_count: usize,
    pub sections_found: Vec<String>,
    pub has_quantifiable: bool,
    pub has_summary: bool,
    pub action_verbs: Vec<String>,
    /// 55 (long sentences) – 85 (short sentences)
    pub readability_score: u32,
}

/// Frequency-based keyword overlap between résumé and JD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub found: Vec<String>,
    pub missing: Vec<String>,
    /// Percentage of JD keywords present in the résumé.
    pub density: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Ai,
    Local,
}

/// Which source produced the authoritative result. Labeling only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderOutcome {
    pub source: AnalysisSource,
    pub provider_name: Option<String>,
    pub latency_ms: u64,
    pub error: Option<String>,
}

/// Response envelope for `analyze_resume` / `match_resume_to_job`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    #[serde(flatten)]
    pub result: MatchResult,
    pub keywords: KeywordAnalysis,
    pub resume_structure: ResumeStructure,
    pub next_steps: Vec<String>,
    pub ai_enhanced: bool,
    pub provider: ProviderOutcome,
    /// Industry used for the high-conversion lookup (given or detected).
    pub industry: Industry,
    pub analyzed_at: DateTime<Utc>,
}
