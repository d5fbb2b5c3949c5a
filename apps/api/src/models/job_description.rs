use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Industry;

/// Sentinel for structured fields no extraction rule matched.
pub const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
    Yes,
    No,
    Hybrid,
    #[default]
    Unknown,
}

/// Structured job description produced by the keyword extractor.
///
/// `key_skills` only ever holds dictionary terms whose normalized form occurs
/// in the normalized `raw_content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub job_title: String,
    pub company_name: String,
    pub key_skills: BTreeSet<String>,
    pub experience_level: String,
    pub salary_range: String,
    pub location: String,
    pub remote: RemoteStatus,
    pub employment_type: String,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    /// Industry the dictionaries were scoped to: the caller's, or the detected one.
    pub industry: Industry,
    pub raw_content: String,
    pub extracted_at: DateTime<Utc>,
}
