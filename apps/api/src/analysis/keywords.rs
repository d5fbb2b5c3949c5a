//! Keyword Density Analyzer: frequency-based keyword overlap between the
//! résumé and the JD, independent of the skill dictionaries.

use std::collections::{BTreeMap, HashSet};

use crate::analysis::normalizer::NormalizedText;
use crate::models::KeywordAnalysis;

const MAX_JD_KEYWORDS: usize = 30;
const MIN_WORD_CHARS: usize = 4;

const STOPWORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "your", "our", "are", "about", "what", "which", "when", "also", "into", "more", "than",
    "them", "then", "these", "those", "been", "were", "such", "able", "well", "must", "should",
];

const SUFFIXES: &[&str] = &["ing", "ed", "er", "est", "ly", "tion", "sion", "ness", "ment"];

/// Strips the first matching common suffix when enough of the word remains.
fn stem(word: &str) -> String {
    SUFFIXES
        .iter()
        .find(|suffix| word.ends_with(*suffix) && word.len() > suffix.len() + 2)
        .map(|suffix| word[..word.len() - suffix.len()].to_string())
        .unwrap_or_else(|| word.to_string())
}

fn stems(text: &NormalizedText) -> impl Iterator<Item = String> + '_ {
    text.tokens()
        .iter()
        .flat_map(|token| token.split(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|word| {
            word.len() >= MIN_WORD_CHARS
                && !word.chars().all(|c| c.is_ascii_digit())
                && !STOPWORDS.contains(word)
        })
        .map(stem)
}

/// Top JD keywords by frequency (ties alphabetical), split into those the
/// résumé contains and those it lacks.
pub fn analyze_keywords(resume: &NormalizedText, jd: &NormalizedText) -> KeywordAnalysis {
    let mut frequency: BTreeMap<String, usize> = BTreeMap::new();
    for word in stems(jd) {
        *frequency.entry(word).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = frequency.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(MAX_JD_KEYWORDS);

    let resume_stems: HashSet<String> = stems(resume).collect();

    let (found, missing): (Vec<String>, Vec<String>) = ranked
        .into_iter()
        .map(|(word, _)| word)
        .partition(|word| resume_stems.contains(word));

    let total = found.len() + missing.len();
    let density = if total == 0 {
        0
    } else {
        (100.0 * found.len() as f64 / total as f64).round() as u32
    };

    KeywordAnalysis {
        found,
        missing,
        density,
    }
}
