//! Local pipeline: the deterministic path that always runs.
//!
//! Flow: extract_keywords(JD) → normalize(résumé) → match_skills → score →
//!       generate_suggestions → hiring probability → key findings → keywords.

use std::collections::BTreeSet;

use crate::analysis::dictionary::dictionary;
use crate::analysis::keyword_extractor::extract_keywords;
use crate::analysis::keywords::analyze_keywords;
use crate::analysis::normalizer::normalize;
use crate::analysis::scorer::{current_hiring, hiring_probability, score, ScoreCard, ScoringWeights};
use crate::analysis::skill_matcher::match_skills;
use crate::analysis::suggestions::generate_suggestions;
use crate::errors::AppError;
use crate::models::{Industry, JobDescription, KeywordAnalysis, MatchResult, ResumeStructure};

const MAX_KEY_FINDINGS: usize = 5;
const FINDINGS_LIST_LEN: usize = 3;

/// Output of the local pipeline. `result` is fully formed on its own.
#[derive(Debug, Clone)]
pub struct LocalAnalysis {
    pub result: MatchResult,
    pub keywords: KeywordAnalysis,
    pub structure: ResumeStructure,
    pub job: JobDescription,
}

/// Both texts must contain something other than whitespace.
pub fn validate_inputs(resume_text: &str, jd_text: &str) -> Result<(), AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "resume_text cannot be empty".to_string(),
        ));
    }
    if jd_text.trim().is_empty() {
        return Err(AppError::InvalidInput("jd_text cannot be empty".to_string()));
    }
    Ok(())
}

pub fn run_local_pipeline(
    resume_text: &str,
    jd_text: &str,
    industry: Option<Industry>,
    weights: &ScoringWeights,
) -> Result<LocalAnalysis, AppError> {
    validate_inputs(resume_text, jd_text)?;

    let dictionary = dictionary()?;
    let job = extract_keywords(jd_text, industry)?;
    let resume = normalize(resume_text);

    let partition = match_skills(&resume, &job, dictionary);
    let card = score(partition, &job, &resume, weights)?;

    let suggestions = generate_suggestions(
        &card.skills_match,
        &card.experience_match,
        &card.structure,
        job.industry,
        dictionary,
    );
    let hiring = hiring_probability(current_hiring(card.overall, weights), &suggestions);
    let key_findings = key_findings(&card);
    let keywords = analyze_keywords(&resume, &normalize(jd_text));
    let structure = resume_structure(&card);

    Ok(LocalAnalysis {
        result: MatchResult {
            overall_match_score: card.overall,
            skills_match: card.skills_match,
            experience_match: card.experience_match,
            hiring_probability: hiring,
            suggestions,
            key_findings,
        },
        keywords,
        structure,
        job,
    })
}

fn resume_structure(card: &ScoreCard) -> ResumeStructure {
    let report = &card.structure;
    ResumeStructure {
        score: report.score,
        word_count: report.word_count,
        sections_found: report.sections_found.iter().map(|s| s.to_string()).collect(),
        has_quantifiable: report.has_quantifiable,
        has_summary: report.has_summary,
        action_verbs: report.action_verbs.iter().map(|v| v.to_string()).collect(),
        readability_score: report.readability,
    }
}

/// Three to five short observations about the match.
fn key_findings(card: &ScoreCard) -> Vec<String> {
    let skills = &card.skills_match;
    let required = skills.matched.len() + skills.missing.len();
    let mut findings = Vec::new();

    if required == 0 {
        findings.push("No specific skill requirements detected in the job description".to_string());
    } else {
        findings.push(format!(
            "Matches {} of {} required skills ({}%)",
            skills.matched.len(),
            required,
            skills.score
        ));
    }

    if !skills.missing.is_empty() {
        findings.push(format!("Missing key skills: {}", first_few(&skills.missing)));
    }

    findings.push(card.experience_match.gap_description.clone());

    if card.structure.has_quantifiable {
        findings.push("Includes quantifiable achievements".to_string());
    } else {
        findings.push("No quantifiable achievements detected".to_string());
    }

    if !skills.additional.is_empty() {
        findings.push(format!(
            "{} additional skill(s) beyond the job description, including {}",
            skills.additional.len(),
            first_few(&skills.additional)
        ));
    }

    findings.truncate(MAX_KEY_FINDINGS);
    findings
}

fn first_few(set: &BTreeSet<String>) -> String {
    set.iter()
        .take(FINDINGS_LIST_LEN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
