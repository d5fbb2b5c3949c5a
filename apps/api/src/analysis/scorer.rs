//! Scorer: weighted 0–100 match score, résumé structure check and hiring
//! probability.
//!
//! All arithmetic is done in `f64` and rounded once per sub-score, so
//! identical inputs give identical output.

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::NormalizedText;
use crate::analysis::skill_matcher::SkillPartition;
use crate::errors::AppError;
use crate::models::{
    ExperienceMatch, HiringProbability, JobDescription, SkillsMatch, Suggestion, SuggestionType,
    NOT_SPECIFIED,
};

const QUANTIFIABLE_POINTS: f64 = 40.0;
const SECTION_POINTS: f64 = 40.0;
const LENGTH_POINTS: f64 = 20.0;
const SECTIONS_FOR_FULL_CREDIT: usize = 3;
pub const MIN_WORDS: usize = 150;
pub const MAX_WORDS: usize = 1_200;
const MAX_PLAUSIBLE_YEARS: u32 = 50;

const SECTION_HEADERS: &[&str] = &[
    "experience",
    "education",
    "skills",
    "summary",
    "projects",
    "certifications",
];

const SUMMARY_HEADERS: &[&str] = &["summary", "profile", "objective", "about me"];

const ACTION_VERBS: &[&str] = &[
    "achieved",
    "implemented",
    "developed",
    "managed",
    "led",
    "created",
    "optimized",
    "improved",
    "increased",
    "decreased",
    "launched",
    "designed",
    "engineered",
    "architected",
    "coordinated",
    "executed",
    "delivered",
    "transformed",
    "streamlined",
    "automated",
    "integrated",
    "migrated",
];

/// Fewer distinct action verbs than this earns a suggestion.
pub const MIN_ACTION_VERBS: usize = 5;

/// `(average words per sentence below, score)`; longer sentences score 55.
const READABILITY_BANDS: &[(f64, u32)] = &[(15.0, 85), (20.0, 75), (25.0, 65)];
const READABILITY_FLOOR: u32 = 55;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub structure: f64,
    pub hiring_dampening: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.60,
            experience: 0.25,
            structure: 0.15,
            hiring_dampening: 0.85,
        }
    }
}

/// Outcome of the structural/ATS checks on the raw résumé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureReport {
    pub has_quantifiable: bool,
    pub has_summary: bool,
    pub sections_found: Vec<&'static str>,
    pub word_count: usize,
    /// Action verbs found, in list order.
    pub action_verbs: Vec<&'static str>,
    /// Average-sentence-length bucket, 55..=85. Not part of `score`.
    pub readability: u32,
    pub score: u32,
}

impl StructureReport {
    pub fn few_action_verbs(&self) -> bool {
        self.action_verbs.len() < MIN_ACTION_VERBS
    }

    pub fn length_ok(&self) -> bool {
        (MIN_WORDS..=MAX_WORDS).contains(&self.word_count)
    }

    pub fn too_short(&self) -> bool {
        self.word_count < MIN_WORDS
    }
}

/// Everything the local pipeline computes before suggestions.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub overall: u32,
    pub skills_match: SkillsMatch,
    pub experience_match: ExperienceMatch,
    pub experience_score: u32,
    pub structure: StructureReport,
}

struct ScorerPatterns {
    experience_years: Regex,
    date_range: Regex,
    quantifiable: Regex,
}

static PATTERNS: Lazy<Result<ScorerPatterns, regex::Error>> = Lazy::new(|| {
    Ok(ScorerPatterns {
        experience_years: Regex::new(concat!(
            r"(?i)\b(\d{1,3})\+?[ \t]*(?:years?|yrs?)[ \t]+",
            r"(?:of[ \t]+)?(?:[a-z\-]+[ \t]+){0,3}?experience\b",
        ))?,
        date_range: Regex::new(concat!(
            r"(?i)\b((?:19|20)\d{2})[ \t]*(?:-|–|—|to)[ \t]*(?:[a-z]{3,9}\.?[ \t]+)?",
            r"((?:19|20)\d{2}|present|current|now)\b",
        ))?,
        quantifiable: Regex::new(
            r"(?i)\d+(?:\.\d+)?[ \t]*%|[$€£][ \t]?\d|\b\d+(?:\.\d+)?[ \t]*(?:k|m|x|million|billion|users|customers|clients|people|engineers|projects|hours|days|weeks)\b|\b(?:increased|decreased|reduced|improved|grew|saved|cut|boosted)\b[^.\n]{0,40}\d",
        )?,
    })
});

fn patterns() -> Result<&'static ScorerPatterns, AppError> {
    match &*PATTERNS {
        Ok(patterns) => Ok(patterns),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "scorer pattern failed to compile: {e}"
        ))),
    }
}

pub fn warm_up() -> Result<(), AppError> {
    patterns().map(|_| ())
}

// ────────────────────────────────────────────
// Sub-scores
// ────────────────────────────────────────────

/// `round(100·matched / (matched + missing))`; 100 when the JD lists no skills.
pub fn skills_score(matched: usize, missing: usize) -> u32 {
    let total = matched + missing;
    if total == 0 {
        return 100;
    }
    (100.0 * matched as f64 / total as f64).round() as u32
}

/// Candidate experience in years. An explicit "N years of … experience"
/// wins (largest one); otherwise the span from the earliest start to the
/// latest end of the employment date ranges. Other "N years" mentions
/// ("30 years of history") are ignored.
fn resume_years(source: &str, patterns: &ScorerPatterns, current_year: i32) -> Option<u32> {
    let stated = patterns
        .experience_years
        .captures_iter(source)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .filter(|n| *n <= MAX_PLAUSIBLE_YEARS)
        .max();
    if stated.is_some() {
        return stated;
    }

    let ranges: Vec<(i32, i32)> = patterns
        .date_range
        .captures_iter(source)
        .filter_map(|caps| {
            let start = caps.get(1)?.as_str().parse::<i32>().ok()?;
            let end = match caps.get(2)?.as_str().parse::<i32>() {
                Ok(year) => year,
                Err(_) => current_year,
            };
            (start <= end && end <= current_year).then_some((start, end))
        })
        .collect();
    let earliest = ranges.iter().map(|(start, _)| *start).min()?;
    let latest = ranges.iter().map(|(_, end)| *end).max()?;
    u32::try_from(latest - earliest)
        .ok()
        .filter(|years| *years <= MAX_PLAUSIBLE_YEARS)
}

/// First number of an experience level that talks about years
/// ("5+ years" → 5, "3-5 years" → 3). Seniority words alone give `None`.
fn required_years(experience_level: &str) -> Option<u32> {
    let lower = experience_level.to_lowercase();
    if !(lower.contains("year") || lower.contains("yr")) {
        return None;
    }
    lower
        .split(|c: char| !c.is_ascii_digit())
        .find(|digits| !digits.is_empty())?
        .parse()
        .ok()
}

/// Unknown years on either side count as satisfied.
fn experience_alignment(
    experience_level: &str,
    required: Option<u32>,
    current: Option<u32>,
) -> (ExperienceMatch, u32) {
    let (satisfied, gap_description, score) = match (required, current) {
        (None, _) => (
            true,
            "No specific experience requirement detected".to_string(),
            100,
        ),
        (Some(req), None) => (
            true,
            format!(
                "Years of experience not stated in the résumé; \
                 assumed to meet the {req}-year requirement"
            ),
            100,
        ),
        (Some(req), Some(cur)) if cur >= req => (
            true,
            format!("Meets the {req}-year requirement with {cur} years"),
            100,
        ),
        (Some(req), Some(cur)) => (
            false,
            format!("{} more year(s) of experience needed ({cur} of {req})", req - cur),
            (100.0 * cur as f64 / req as f64).round() as u32,
        ),
    };

    let experience = ExperienceMatch {
        required: experience_level.to_string(),
        current: current
            .map(|years| format!("{years} years"))
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        satisfied,
        gap_description,
    };
    (experience, score)
}

fn check_structure(resume: &NormalizedText, quantifiable: &Regex) -> StructureReport {
    let has_quantifiable = quantifiable.is_match(resume.source());
    let sections_found: Vec<&'static str> = SECTION_HEADERS
        .iter()
        .copied()
        .filter(|header| resume.contains_term(header))
        .collect();
    let has_summary = SUMMARY_HEADERS
        .iter()
        .any(|header| resume.contains_term(header));
    let word_count = resume.source().split_whitespace().count();
    let action_verbs: Vec<&'static str> = ACTION_VERBS
        .iter()
        .copied()
        .filter(|verb| resume.contains_term(verb))
        .collect();
    let readability = readability_score(resume.source());

    let section_fraction =
        sections_found.len().min(SECTIONS_FOR_FULL_CREDIT) as f64 / SECTIONS_FOR_FULL_CREDIT as f64;
    let length_ok = (MIN_WORDS..=MAX_WORDS).contains(&word_count);

    let raw = if has_quantifiable { QUANTIFIABLE_POINTS } else { 0.0 }
        + SECTION_POINTS * section_fraction
        + if length_ok { LENGTH_POINTS } else { 0.0 };

    StructureReport {
        has_quantifiable,
        has_summary,
        sections_found,
        word_count,
        action_verbs,
        readability,
        score: raw.round() as u32,
    }
}

/// Buckets the average words per sentence. Line breaks end a sentence too,
/// since résumé bullets rarely carry a full stop.
fn readability_score(source: &str) -> u32 {
    let sentences = source
        .split(|c: char| matches!(c, '.' | '!' | '?' | '\n'))
        .filter(|sentence| sentence.split_whitespace().next().is_some())
        .count();
    if sentences == 0 {
        return READABILITY_BANDS[0].1;
    }
    let words = source.split_whitespace().count();
    let average = words as f64 / sentences as f64;

    READABILITY_BANDS
        .iter()
        .find(|(limit, _)| average < *limit)
        .map_or(READABILITY_FLOOR, |(_, score)| *score)
}

/// Weighted combination, clamped to 0..=100.
pub fn overall_score(
    skills: u32,
    experience: u32,
    structure: u32,
    weights: &ScoringWeights,
) -> u32 {
    let raw = weights.skills * skills as f64
        + weights.experience * experience as f64
        + weights.structure * structure as f64;
    raw.round().clamp(0.0, 100.0) as u32
}

// ────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────

pub fn score(
    partition: SkillPartition,
    jd: &JobDescription,
    resume: &NormalizedText,
    weights: &ScoringWeights,
) -> Result<ScoreCard, AppError> {
    let patterns = patterns()?;

    let skills_score = skills_score(partition.matched.len(), partition.missing.len());
    let (experience_match, experience_score) = experience_alignment(
        &jd.experience_level,
        required_years(&jd.experience_level),
        resume_years(resume.source(), patterns, Utc::now().year()),
    );
    let structure = check_structure(resume, &patterns.quantifiable);

    let overall = overall_score(skills_score, experience_score, structure.score, weights);

    Ok(ScoreCard {
        overall,
        skills_match: SkillsMatch {
            matched: partition.matched,
            missing: partition.missing,
            additional: partition.additional,
            score: skills_score,
        },
        experience_match,
        experience_score,
        structure,
    })
}

/// `round(overall × dampening)`, clamped to 0..=100.
pub fn current_hiring(overall: u32, weights: &ScoringWeights) -> u32 {
    (overall as f64 * weights.hiring_dampening)
        .round()
        .clamp(0.0, 100.0) as u32
}

/// Optimized probability assumes every critical suggestion gets applied.
pub fn hiring_probability(current: u32, suggestions: &[Suggestion]) -> HiringProbability {
    let critical_gain: u32 = suggestions
        .iter()
        .filter(|s| s.kind == SuggestionType::Critical)
        .map(|s| s.expected_impact as u32)
        .sum();
    let current = current.min(100);
    let optimized = (current + critical_gain).min(100);
    HiringProbability {
        current,
        optimized,
        improvement: optimized as i32 - current as i32,
    }
}
