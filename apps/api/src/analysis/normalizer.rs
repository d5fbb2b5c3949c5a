//! Text Normalizer: lowercases, strips noise and expands abbreviations so
//! downstream matching is case- and variant-insensitive.

/// Standalone abbreviation → full form. Matched per token segment, never inside
/// a longer word.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("ml", "machine learning"),
    ("ai", "artificial intelligence"),
    ("k8s", "kubernetes"),
    ("nlp", "natural language processing"),
    ("dl", "deep learning"),
    ("postgres", "postgresql"),
    ("nodejs", "node.js"),
    ("reactjs", "react"),
    ("golang", "go"),
    ("sr", "senior"),
    ("jr", "junior"),
    ("yrs", "years"),
    ("yr", "year"),
    ("mgmt", "management"),
    ("oop", "object-oriented programming"),
    ("tdd", "test-driven development"),
    ("hr", "human resources"),
    ("qa", "quality assurance"),
];

/// Immutable normalized form of one raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    tokens: Vec<String>,
    source: String,
}

impl NormalizedText {
    /// Normalized text: tokens joined by single spaces.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The raw input this value was built from. Structural heuristics that
    /// depend on `%`, `$` or casing read this instead of the normalized text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Word-boundary containment: `term` must not be flanked by a letter or
    /// digit on either side. `term` is expected to be normalized already.
    pub fn contains_term(&self, term: &str) -> bool {
        if term.is_empty() {
            return false;
        }

        let haystack = self.text.as_str();
        let mut from = 0;
        while let Some(offset) = haystack[from..].find(term) {
            let begin = from + offset;
            let end = begin + term.len();

            let clear_before = haystack[..begin]
                .chars()
                .next_back()
                .map_or(true, |c| !is_word_char(c));
            let clear_after = haystack[end..]
                .chars()
                .next()
                .map_or(true, |c| !is_word_char(c));

            if clear_before && clear_after {
                return true;
            }

            from = begin
                + haystack[begin..]
                    .chars()
                    .next()
                    .map_or(1, |c| c.len_utf8());
        }
        false
    }
}

/// Normalizes arbitrary UTF-8 text. Never fails; empty input yields an
/// empty-token value.
pub fn normalize(text: &str) -> NormalizedText {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_allowed(c) { c } else { ' ' })
        .collect();

    let expanded = cleaned
        .split_whitespace()
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| token.chars().any(|c| c.is_ascii_alphanumeric()))
        .map(expand_token)
        .collect::<Vec<_>>()
        .join(" ");

    let tokens: Vec<String> = expanded.split_whitespace().map(str::to_string).collect();

    NormalizedText {
        text: tokens.join(" "),
        tokens,
        source: text.to_string(),
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_lowercase()
        || c.is_ascii_digit()
        || matches!(c, '+' | '-' | '.' | '/' | '#' | ' ')
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Expands abbreviations in each `/`- or `-`-separated segment of a token,
/// keeping the separators. `ml/ai` becomes `machine learning/artificial intelligence`;
/// `node.js` is one segment and stays as-is.
fn expand_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut segment_start = 0;

    for (i, c) in token.char_indices() {
        if c == '/' || c == '-' {
            out.push_str(expand_segment(&token[segment_start..i]));
            out.push(c);
            segment_start = i + c.len_utf8();
        }
    }
    out.push_str(expand_segment(&token[segment_start..]));
    out
}

fn expand_segment(segment: &str) -> &str {
    ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == segment)
        .map(|(_, full)| *full)
        .unwrap_or(segment)
}
