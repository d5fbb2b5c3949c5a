//! Suggestion Generator: ranked improvement actions.
//!
//! Rules run in a fixed order (high-conversion gaps, experience gap,
//! structural fixes, remaining gaps) and the output is stably sorted by
//! priority, then expected impact, both descending.

use crate::analysis::dictionary::Dictionary;
use crate::analysis::scorer::{StructureReport, MAX_WORDS, MIN_ACTION_VERBS, MIN_WORDS};
use crate::models::{ExperienceMatch, Industry, SkillsMatch, Suggestion, SuggestionType};

const HIGH_CONVERSION_MAX_IMPACT: f64 = 15.0;

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;
pub const MAX_IMPACT: u8 = 20;

pub fn generate_suggestions(
    skills: &SkillsMatch,
    experience: &ExperienceMatch,
    structure: &StructureReport,
    industry: Industry,
    dictionary: &Dictionary,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    let mut remaining = Vec::new();

    // (1) high-conversion gaps
    for skill in &skills.missing {
        match dictionary.high_conversion_rank(industry, skill) {
            Some((position, len)) => {
                suggestions.push(high_conversion_gap(skill, position, len, industry))
            }
            None => remaining.push(skill.as_str()),
        }
    }

    // (2) experience gap
    if !experience.satisfied {
        suggestions.push(Suggestion {
            kind: SuggestionType::Critical,
            title: "Close the Experience Gap".to_string(),
            description: format!(
                "The role asks for {}; {}.",
                experience.required, experience.gap_description
            ),
            action: "Lead with the roles and projects closest to this position and state \
                     your total years of relevant experience in the summary."
                .to_string(),
            priority: 4,
            expected_impact: 10,
        });
    }

    // (3) structure
    if !structure.has_quantifiable {
        suggestions.push(Suggestion {
            kind: SuggestionType::Enhancement,
            title: "Add Quantifiable Achievements".to_string(),
            description: "No measurable results were found. Numbers make impact concrete \
                          for both ATS filters and recruiters."
                .to_string(),
            action: "Rewrite your strongest bullets with concrete figures, \
                     e.g. \"Reduced deploy time by 40%\" or \"Managed a team of 5\"."
                .to_string(),
            priority: 3,
            expected_impact: 10,
        });
    }
    if !structure.has_summary {
        suggestions.push(Suggestion {
            kind: SuggestionType::Enhancement,
            title: "Add a Professional Summary".to_string(),
            description: "The résumé has no summary or profile section.".to_string(),
            action: "Open with a 2-3 line summary naming your target role, years of \
                     experience and strongest matching skills."
                .to_string(),
            priority: 3,
            expected_impact: 6,
        });
    }
    if structure.few_action_verbs() {
        suggestions.push(Suggestion {
            kind: SuggestionType::Enhancement,
            title: "Use More Action Verbs".to_string(),
            description: format!(
                "Only {} of the action verbs ATS filters look for were found; \
                 {MIN_ACTION_VERBS} or more reads as accomplishment-driven.",
                structure.action_verbs.len()
            ),
            action: "Start bullets with verbs such as \"Led\", \"Implemented\", \
                     \"Optimized\" or \"Delivered\" instead of \"Responsible for\"."
                .to_string(),
            priority: 3,
            expected_impact: 5,
        });
    }
    if !structure.length_ok() {
        let (description, action) = if structure.too_short() {
            (
                format!(
                    "The résumé has {} words; fewer than {MIN_WORDS} reads as thin.",
                    structure.word_count
                ),
                "Expand your recent roles with responsibilities, tools used and outcomes.",
            )
        } else {
            (
                format!(
                    "The résumé has {} words; more than {MAX_WORDS} is hard to scan.",
                    structure.word_count
                ),
                "Trim older or less relevant roles and keep bullets to one or two lines.",
            )
        };
        suggestions.push(Suggestion {
            kind: SuggestionType::Enhancement,
            title: "Adjust Résumé Length".to_string(),
            description,
            action: action.to_string(),
            priority: 2,
            expected_impact: 5,
        });
    }

    // (4) other gaps
    for skill in remaining {
        suggestions.push(Suggestion {
            kind: SuggestionType::Optimization,
            title: format!("Mention {skill}"),
            description: format!(
                "The job description asks for {skill}, which the résumé does not mention."
            ),
            action: format!(
                "If you have used {skill}, name it explicitly using the job description's wording."
            ),
            priority: 2,
            expected_impact: 4,
        });
    }

    rank(&mut suggestions);
    suggestions
}

/// Stable sort: priority desc, then expected impact desc.
pub fn rank(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(b.expected_impact.cmp(&a.expected_impact))
    });
}

fn high_conversion_gap(skill: &str, position: usize, len: usize, industry: Industry) -> Suggestion {
    let impact = (HIGH_CONVERSION_MAX_IMPACT * (len - position) as f64 / len as f64)
        .round()
        .max(1.0) as u8;
    Suggestion {
        kind: SuggestionType::Critical,
        title: format!("Add {skill}"),
        description: format!(
            "{skill} is a high-conversion keyword for {} roles and appears in the \
             job description but not in your résumé.",
            industry.label()
        ),
        action: format!(
            "Add {skill} to your skills section and back it with a bullet \
             showing where you used it."
        ),
        priority: 5,
        expected_impact: impact.min(MAX_IMPACT),
    }
}
