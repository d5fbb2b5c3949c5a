use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use crate::analysis::scorer::ScoringWeights;
use crate::providers::AiProviderKind;

const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_DEEPSEEK_API_URL: &str = "https://api.deepseek.com";
const DEFAULT_FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev";
const DEFAULT_READER_API_URL: &str = "https://r.jina.ai";

/// Application configuration loaded from environment variables.
/// Every variable is optional; without any API key the engine runs on the
/// local pipeline alone.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub ai_provider: AiProviderKind,
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub deepseek_api_key: Option<String>,
    pub deepseek_api_url: String,
    pub ai_timeout: Duration,
    pub firecrawl_api_key: Option<String>,
    pub firecrawl_api_url: String,
    pub reader_api_url: String,
    pub extraction_timeout: Duration,
    pub scoring: ScoringWeights,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let gemini_api_key = var("GEMINI_API_KEY").or_else(|| var("GOOGLE_AI_API_KEY"));
        let deepseek_api_key = var("DEEPSEEK_API_KEY");

        let ai_provider = match var("AI_PROVIDER") {
            Some(name) => AiProviderKind::parse(&name)
                .with_context(|| format!("AI_PROVIDER '{name}' must be one of: gemini, deepseek"))?,
            None if gemini_api_key.is_none() && deepseek_api_key.is_some() => {
                AiProviderKind::DeepSeek
            }
            None => AiProviderKind::Gemini,
        };

        let defaults = ScoringWeights::default();
        let scoring = ScoringWeights {
            skills: parse_or(var("SCORE_WEIGHT_SKILLS"), "SCORE_WEIGHT_SKILLS", defaults.skills)?,
            experience: parse_or(
                var("SCORE_WEIGHT_EXPERIENCE"),
                "SCORE_WEIGHT_EXPERIENCE",
                defaults.experience,
            )?,
            structure: parse_or(
                var("SCORE_WEIGHT_STRUCTURE"),
                "SCORE_WEIGHT_STRUCTURE",
                defaults.structure,
            )?,
            hiring_dampening: parse_or(
                var("HIRING_DAMPENING"),
                "HIRING_DAMPENING",
                defaults.hiring_dampening,
            )?,
        };
        validate_weights(&scoring)?;

        Ok(Config {
            port: parse_or(var("PORT"), "PORT", 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            ai_provider,
            gemini_api_key,
            gemini_api_url: var("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            deepseek_api_key,
            deepseek_api_url: var("DEEPSEEK_API_URL")
                .unwrap_or_else(|| DEFAULT_DEEPSEEK_API_URL.to_string()),
            ai_timeout: Duration::from_millis(parse_or(
                var("AI_TIMEOUT_MS"),
                "AI_TIMEOUT_MS",
                5_000,
            )?),
            firecrawl_api_key: var("FIRECRAWL_API_KEY"),
            firecrawl_api_url: var("FIRECRAWL_API_URL")
                .unwrap_or_else(|| DEFAULT_FIRECRAWL_API_URL.to_string()),
            reader_api_url: var("READER_API_URL")
                .unwrap_or_else(|| DEFAULT_READER_API_URL.to_string()),
            extraction_timeout: Duration::from_secs(parse_or(
                var("EXTRACTION_TIMEOUT_SECS"),
                "EXTRACTION_TIMEOUT_SECS",
                30,
            )?),
            scoring,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{key} has an invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}

fn validate_weights(weights: &ScoringWeights) -> Result<()> {
    for (key, value) in [
        ("SCORE_WEIGHT_SKILLS", weights.skills),
        ("SCORE_WEIGHT_EXPERIENCE", weights.experience),
        ("SCORE_WEIGHT_STRUCTURE", weights.structure),
    ] {
        if !value.is_finite() || value < 0.0 {
            bail!("{key} must be a non-negative number, got {value}");
        }
    }
    if !(0.0..=1.0).contains(&weights.hiring_dampening) {
        bail!(
            "HIRING_DAMPENING must be between 0 and 1, got {}",
            weights.hiring_dampening
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_any_variable() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.ai_provider, AiProviderKind::Gemini);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.ai_timeout, Duration::from_millis(5_000));
        assert_eq!(config.extraction_timeout, Duration::from_secs(30));
        assert_eq!(config.reader_api_url, DEFAULT_READER_API_URL);
        assert_eq!(config.scoring, ScoringWeights::default());
    }

    #[test]
    fn test_google_key_is_gemini_fallback() {
        let config = config_from(&[("GOOGLE_AI_API_KEY", "g-key")]).unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("g-key"));
    }

    #[test]
    fn test_provider_defaults_to_first_with_a_key() {
        let config = config_from(&[("DEEPSEEK_API_KEY", "ds-key")]).unwrap();
        assert_eq!(config.ai_provider, AiProviderKind::DeepSeek);

        let config =
            config_from(&[("DEEPSEEK_API_KEY", "ds-key"), ("GEMINI_API_KEY", "g-key")]).unwrap();
        assert_eq!(config.ai_provider, AiProviderKind::Gemini);
    }

    #[test]
    fn test_explicit_provider_wins() {
        let config =
            config_from(&[("AI_PROVIDER", "DeepSeek"), ("GEMINI_API_KEY", "g-key")]).unwrap();
        assert_eq!(config.ai_provider, AiProviderKind::DeepSeek);
    }

    #[test]
    fn test_unknown_provider_fails() {
        assert!(config_from(&[("AI_PROVIDER", "openai")]).is_err());
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = config_from(&[("GEMINI_API_KEY", "  "), ("PORT", "")]).unwrap();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_malformed_numbers_fail_with_the_variable_name() {
        let err = config_from(&[("AI_TIMEOUT_MS", "soon")]).err().unwrap();
        assert!(err.to_string().contains("AI_TIMEOUT_MS"));

        assert!(config_from(&[("PORT", "99999")]).is_err());
        assert!(config_from(&[("SCORE_WEIGHT_SKILLS", "-0.5")]).is_err());
        assert!(config_from(&[("HIRING_DAMPENING", "1.5")]).is_err());
    }

    #[test]
    fn test_weights_override() {
        let config =
            config_from(&[("SCORE_WEIGHT_SKILLS", "0.5"), ("HIRING_DAMPENING", "0.9")]).unwrap();
        assert_eq!(config.scoring.skills, 0.5);
        assert_eq!(config.scoring.hiring_dampening, 0.9);
        assert_eq!(config.scoring.experience, 0.25);
    }
}
