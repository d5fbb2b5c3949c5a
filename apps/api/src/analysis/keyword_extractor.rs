//! Keyword Extractor: turns raw job-description text into a structured
//! `JobDescription`: dictionary skills plus regex-extracted fields.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::analysis::dictionary::dictionary;
use crate::analysis::normalizer::normalize;
use crate::errors::AppError;
use crate::models::{Industry, JobDescription, RemoteStatus, NOT_SPECIFIED};

const NO_RESPONSIBILITIES: &str = "Responsibilities not clearly specified";
const MAX_FIELD_CHARS: usize = 120;
const MAX_TITLE_WORDS: usize = 8;

const NOT_A_COMPANY: &[&str] = &["Our", "Us", "The", "We", "You", "This", "A", "An"];

const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

// ────────────────────────────────────────────
// Line selection (responsibilities / requirements / benefits)
// ────────────────────────────────────────────

struct LineRule {
    markers: &'static [&'static str],
    min_chars: usize,
    max_items: usize,
}

const RESPONSIBILITIES: LineRule = LineRule {
    markers: &["develop", "design", "manage", "implement", "create", "work"],
    min_chars: 20,
    max_items: 8,
};

const REQUIREMENTS: LineRule = LineRule {
    markers: &[
        "requirement",
        "qualification",
        "skill",
        "experience",
        "degree",
        "certification",
        "must have",
        "required",
        "needed",
        "essential",
    ],
    min_chars: 15,
    max_items: 6,
};

const BENEFITS: LineRule = LineRule {
    markers: &[
        "benefit",
        "insurance",
        "health",
        "dental",
        "vision",
        "401k",
        "retirement",
        "vacation",
        "pto",
        "paid time off",
        "stock",
        "equity",
        "bonus",
    ],
    min_chars: 10,
    max_items: 5,
};

fn select_lines(text: &str, rule: &LineRule) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for line in text.lines() {
        let stripped = strip_bullet(line);
        if stripped.chars().count() <= rule.min_chars {
            continue;
        }
        let lower = stripped.to_lowercase();
        if !rule.markers.iter().any(|marker| lower.contains(marker)) {
            continue;
        }
        if !selected.iter().any(|s| s == stripped) {
            selected.push(stripped.to_string());
        }
        if selected.len() == rule.max_items {
            break;
        }
    }
    selected
}

/// Strips `-`, `*`, `•` style bullets and `1.` / `1)` numbering.
fn strip_bullet(line: &str) -> &str {
    let trimmed = line
        .trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '·' | '▪' | '◦' | '>'))
        .trim_start();

    let rest = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() < trimmed.len() && (rest.starts_with('.') || rest.starts_with(')')) {
        rest[1..].trim()
    } else {
        trimmed.trim_end()
    }
}

// ────────────────────────────────────────────
// Field rules
// ────────────────────────────────────────────

type Extract = fn(&Captures<'_>) -> Option<String>;

/// One `(pattern, extractor)` step of an ordered rule chain.
struct FieldRule {
    pattern: Regex,
    extract: Extract,
}

impl FieldRule {
    fn new(pattern: &str, extract: Extract) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            extract,
        })
    }
}

struct FieldRules {
    job_title: Vec<FieldRule>,
    company: Vec<FieldRule>,
    experience: Vec<FieldRule>,
    salary: Vec<FieldRule>,
    location: Vec<FieldRule>,
    employment_type: Vec<FieldRule>,
    remote: Vec<(Regex, RemoteStatus)>,
}

static FIELD_RULES: Lazy<Result<FieldRules, regex::Error>> = Lazy::new(FieldRules::compile);

fn field_rules() -> Result<&'static FieldRules, AppError> {
    match &*FIELD_RULES {
        Ok(rules) => Ok(rules),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "field extraction rule failed to compile: {e}"
        ))),
    }
}

/// Forces rule compilation. Called once at startup.
pub fn warm_up() -> Result<(), AppError> {
    field_rules().map(|_| ())
}

impl FieldRules {
    fn compile() -> Result<Self, regex::Error> {
        let job_title = vec![
            FieldRule::new(
                r"(?im)^[ \t]*(?:job[ \t]+title|position|role)[ \t]*[:\-][ \t]*(.+)$",
                clean,
            )?,
            FieldRule::new(
                r"(?i)\b(?:senior|junior|lead|principal|staff|entry-level|mid-level)[ \t]+(?:[a-z]+[ \t]+){0,3}?(?:engineer|developer|architect|scientist|manager|analyst|designer|nurse|accountant|specialist|consultant|representative)\b",
                clean,
            )?,
            FieldRule::new(
                r"(?i)\b(?:software|frontend|front-end|backend|back-end|full[- ]?stack|data|machine[ \t]+learning|devops|cloud|mobile|product|marketing|sales|financial|registered)[ \t]+(?:engineer|developer|architect|scientist|manager|analyst|nurse)\b",
                clean,
            )?,
            FieldRule::new(r"\A\s*([^\n]{3,80})(?:\n|\z)", title_line)?,
        ];

        let company = vec![
            FieldRule::new(
                r"(?im)^[ \t]*company(?:[ \t]+name)?[ \t]*[:\-][ \t]*(.+)$",
                clean,
            )?,
            FieldRule::new(
                r"\b([A-Z][A-Za-z0-9&]*(?:[ \t]+[A-Z][A-Za-z0-9&]*){0,3})[ \t]+is[ \t]+hiring\b",
                company_name,
            )?,
            FieldRule::new(
                r"(?i:\b(?:join|work[ \t]+at))[ \t]+([A-Z][A-Za-z0-9&]*(?:[ \t]+[A-Z][A-Za-z0-9&]*){0,3})",
                company_name,
            )?,
            FieldRule::new(
                r"\b([A-Z][A-Za-z0-9&]*(?:[ \t]+[A-Z][A-Za-z0-9&]*){0,3}[ \t]+(?:Inc|LLC|Corp|Ltd|Technologies|Solutions|Labs|Group))\b",
                company_name,
            )?,
        ];

        let experience = vec![
            FieldRule::new(
                r"(?i)\b(\d{1,2}\+?(?:[ \t]*(?:-|to)[ \t]*\d{1,2})?[ \t]*(?:years?|yrs?))[ \t]+(?:of[ \t]+)?(?:[a-z\-]+[ \t]+){0,2}?experience",
                clean,
            )?,
            FieldRule::new(
                r"(?i)\bexperience[ \t]*:?[ \t]*(?:of[ \t]+)?(\d{1,2}\+?(?:[ \t]*(?:-|to)[ \t]*\d{1,2})?[ \t]*(?:years?|yrs?))",
                clean,
            )?,
            FieldRule::new(
                r"(?i)\b(?:minimum|at[ \t]+least)[ \t]+(?:of[ \t]+)?(\d{1,2}\+?[ \t]*(?:years?|yrs?))",
                clean,
            )?,
            // Seniority words count only next to a role noun ("lead generation" is not a level).
            FieldRule::new(
                concat!(
                    r"(?i)\b(senior|junior|lead|principal|staff|entry-level|mid-level)",
                    r"(?:[ \t\-]+[a-z/]+){0,3}?[ \t\-]+",
                    r"(?:engineer|developer|architect|scientist|manager|analyst|designer|nurse|",
                    r"accountant|specialist|consultant|representative|role|position|level)s?\b",
                ),
                clean,
            )?,
            FieldRule::new(
                r"(?i)\b(?:team|tech|technical|engineering|project|platform|design)[ \t]+(lead)\b",
                clean,
            )?,
            FieldRule::new(r"(?i)\b(internship|intern)s?\b", clean)?,
        ];

        let salary = vec![
            FieldRule::new(
                r"(?i)[$€£][ \t]?\d[\d,]*(?:\.\d+)?k?(?:[ \t]*(?:-|–|to)[ \t]*[$€£]?[ \t]?\d[\d,]*(?:\.\d+)?k?)?(?:[ \t]*(?:/[ \t]*(?:year|yr|hour|hr)|per[ \t]+(?:year|annum|hour)|annually))?",
                clean,
            )?,
            FieldRule::new(
                r"(?i)\b(?:salary|compensation|pay)(?:[ \t]+range)?[ \t]*[:\-]?[ \t]*(\d[\d,]*k?(?:[ \t]*(?:-|–|to)[ \t]*\d[\d,]*k?)?)",
                clean,
            )?,
        ];

        let location = vec![
            FieldRule::new(r"(?im)^[ \t]*location[ \t]*[:\-][ \t]*(.+)$", clean)?,
            FieldRule::new(
                r"(?i:\bbased[ \t]+in)[ \t]+([A-Z][a-zA-Z]+(?:[ \t]+[A-Z][a-zA-Z]+)*(?:,[ \t]*[A-Z][a-zA-Z]+)?)",
                clean,
            )?,
            FieldRule::new(
                r"\b([A-Z][a-zA-Z]+(?:[ \t]+[A-Z][a-zA-Z]+)*,[ \t]*[A-Z]{2})\b",
                city_state,
            )?,
            FieldRule::new(
                r"(?i)\b(?:remote|work[ \t]+from[ \t]+home|wfh)\b",
                |_| Some("Remote".to_string()),
            )?,
            FieldRule::new(r"(?i)\bhybrid\b", |_| Some("Hybrid".to_string()))?,
        ];

        let employment_type = vec![
            FieldRule::new(
                r"(?i)\b(?:employment|job|contract|position)[ \t]+type[ \t]*[:\-]?[ \t]*(full[- \t]?time|part[- \t]?time|contract|temporary|internship|freelance)",
                employment,
            )?,
            FieldRule::new(
                r"(?i)\b(full[- \t]?time|part[- \t]?time|contract|temporary|freelance)[ \t]+(?:position|role|job|opportunity|employment|basis)\b",
                employment,
            )?,
            FieldRule::new(r"(?i)\b(full[- \t]?time|part[- \t]?time|internship)\b", employment)?,
        ];

        // Hybrid first: "hybrid, partially remote" is not fully remote.
        let remote = vec![
            (
                Regex::new(r"(?i)\bhybrid\b|\bpartially[ \t]+remote\b")?,
                RemoteStatus::Hybrid,
            ),
            (
                Regex::new(r"(?i)\b(?:remote|work[ \t]+from[ \t]+home|wfh|distributed[ \t]+team)\b")?,
                RemoteStatus::Yes,
            ),
            (
                Regex::new(r"(?i)\b(?:on-?site|in[- \t]office|in[- \t]person)\b")?,
                RemoteStatus::No,
            ),
        ];

        Ok(Self {
            job_title,
            company,
            experience,
            salary,
            location,
            employment_type,
            remote,
        })
    }
}

/// First accepted match of an ordered chain.
fn first_match(chain: &[FieldRule], text: &str) -> Option<String> {
    chain.iter().find_map(|rule| {
        rule.pattern
            .captures(text)
            .and_then(|caps| (rule.extract)(&caps))
    })
}

fn remote_status(rules: &[(Regex, RemoteStatus)], text: &str) -> RemoteStatus {
    rules
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, status)| *status)
        .unwrap_or_default()
}

// ── extractors ──

fn captured<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
}

fn tidy(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!'));
    trimmed.chars().take(MAX_FIELD_CHARS).collect()
}

fn clean(caps: &Captures<'_>) -> Option<String> {
    captured(caps).map(tidy).filter(|s| !s.is_empty())
}

/// Accepts the first line as a title only when it reads like one.
fn title_line(caps: &Captures<'_>) -> Option<String> {
    let raw = captured(caps)?.trim();
    if raw.ends_with('.')
        || raw.contains(':')
        || raw.contains("http")
        || !raw.chars().any(char::is_alphabetic)
        || raw.split_whitespace().count() > MAX_TITLE_WORDS
    {
        return None;
    }
    Some(tidy(raw))
}

fn company_name(caps: &Captures<'_>) -> Option<String> {
    let name = tidy(captured(caps)?);
    let first = name.split_whitespace().next()?;
    if NOT_A_COMPANY.contains(&first) {
        None
    } else {
        Some(name)
    }
}

fn city_state(caps: &Captures<'_>) -> Option<String> {
    let value = tidy(captured(caps)?);
    let state = value.rsplit(',').next()?.trim();
    US_STATES.contains(&state).then_some(value)
}

fn employment(caps: &Captures<'_>) -> Option<String> {
    let lower = captured(caps)?.to_lowercase();
    let canonical = match lower.split_whitespace().collect::<Vec<_>>().join("-").as_str() {
        "fulltime" => "full-time".to_string(),
        "parttime" => "part-time".to_string(),
        other => other.to_string(),
    };
    Some(canonical)
}

// ────────────────────────────────────────────
// Public operation
// ────────────────────────────────────────────

/// Extracts a structured `JobDescription` from raw JD text, stamped now.
pub fn extract_keywords(
    jd_text: &str,
    industry: Option<Industry>,
) -> Result<JobDescription, AppError> {
    parse_job_description(jd_text, industry, Utc::now())
}

/// Deterministic core of `extract_keywords`.
///
/// Without an industry the general dictionary is scanned and the industry is
/// detected for the high-conversion lookup.
pub fn parse_job_description(
    jd_text: &str,
    industry: Option<Industry>,
    extracted_at: DateTime<Utc>,
) -> Result<JobDescription, AppError> {
    if jd_text.trim().is_empty() {
        return Err(AppError::InvalidInput("jd_text cannot be empty".to_string()));
    }

    let dictionary = dictionary()?;
    let rules = field_rules()?;

    let normalized = normalize(jd_text);
    let key_skills = dictionary.scan(&normalized, industry);
    let industry = industry.unwrap_or_else(|| dictionary.detect_industry(&normalized));

    let field = |chain: &[FieldRule]| {
        first_match(chain, jd_text).unwrap_or_else(|| NOT_SPECIFIED.to_string())
    };

    let mut responsibilities = select_lines(jd_text, &RESPONSIBILITIES);
    if responsibilities.is_empty() {
        responsibilities.push(NO_RESPONSIBILITIES.to_string());
    }

    Ok(JobDescription {
        job_title: field(&rules.job_title),
        company_name: field(&rules.company),
        key_skills,
        experience_level: field(&rules.experience),
        salary_range: field(&rules.salary),
        location: field(&rules.location),
        remote: remote_status(&rules.remote, jd_text),
        employment_type: field(&rules.employment_type),
        responsibilities,
        requirements: select_lines(jd_text, &REQUIREMENTS),
        benefits: select_lines(jd_text, &BENEFITS),
        industry,
        raw_content: jd_text.to_string(),
        extracted_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const BACKEND_JD: &str = r#"Senior Backend Engineer
Acme Robotics is hiring!
Location: Austin, TX
Salary: $120,000 - $150,000 per year
Employment Type: Full-time
Hybrid schedule, 3 days in office.

Responsibilities:
- Design and implement scalable microservices in Rust and Python
- Work closely with product to create reliable APIs
- Manage CI/CD pipelines on AWS

Requirements:
- 5+ years of experience in backend development
- Strong knowledge of PostgreSQL and Docker
- Excellent communication skills

Benefits:
- Health, dental and vision insurance
- 401k matching and equity
"#;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
    }

    fn parse(text: &str) -> JobDescription {
        parse_job_description(text, None, fixed_time()).unwrap()
    }

    #[test]
    fn test_rules_compile() {
        assert!(warm_up().is_ok());
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let err = extract_keywords("   \n\t", None).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_structured_fields() {
        let jd = parse(BACKEND_JD);
        assert_eq!(jd.job_title, "Senior Backend Engineer");
        assert_eq!(jd.company_name, "Acme Robotics");
        assert_eq!(jd.location, "Austin, TX");
        assert_eq!(jd.salary_range, "$120,000 - $150,000 per year");
        assert_eq!(jd.employment_type, "full-time");
        assert_eq!(jd.experience_level, "5+ years");
        assert_eq!(jd.remote, RemoteStatus::Hybrid);
        assert_eq!(jd.industry, Industry::Technology);
        assert_eq!(jd.extracted_at, fixed_time());
    }

    #[test]
    fn test_key_skills_from_general_dictionary() {
        let jd = parse(BACKEND_JD);
        for skill in [
            "Rust",
            "Python",
            "Microservices",
            "CI/CD",
            "AWS",
            "PostgreSQL",
            "Docker",
            "Communication",
        ] {
            assert!(jd.key_skills.contains(skill), "missing {skill}");
        }
        assert!(!jd.key_skills.contains("SQL"));
    }

    #[test]
    fn test_key_skills_occur_in_raw_content() {
        let jd = parse(BACKEND_JD);
        let dict = dictionary().unwrap();
        let normalized = normalize(&jd.raw_content);
        for skill in &jd.key_skills {
            assert!(normalized.contains_term(&dict.pattern_for(skill)), "{skill}");
        }
    }

    #[test]
    fn test_line_lists() {
        let jd = parse(BACKEND_JD);
        assert_eq!(
            jd.responsibilities[0],
            "Design and implement scalable microservices in Rust and Python"
        );
        assert!(jd
            .responsibilities
            .contains(&"Manage CI/CD pipelines on AWS".to_string()));
        assert!(jd.responsibilities.len() <= 8);
        assert_eq!(
            jd.requirements,
            vec![
                "5+ years of experience in backend development".to_string(),
                "Excellent communication skills".to_string(),
            ]
        );
        assert_eq!(
            jd.benefits,
            vec![
                "Health, dental and vision insurance".to_string(),
                "401k matching and equity".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_recognizable_content_uses_sentinels() {
        let jd = parse("We are looking for a motivated person to join our friendly team.");
        assert!(jd.key_skills.is_empty());
        assert_eq!(jd.job_title, NOT_SPECIFIED);
        assert_eq!(jd.company_name, NOT_SPECIFIED);
        assert_eq!(jd.salary_range, NOT_SPECIFIED);
        assert_eq!(jd.remote, RemoteStatus::Unknown);
        assert_eq!(jd.responsibilities, vec![NO_RESPONSIBILITIES.to_string()]);
        assert!(jd.benefits.is_empty());
        assert_eq!(jd.industry, Industry::General);
    }

    #[test]
    fn test_given_industry_scopes_dictionary() {
        let jd = parse_job_description(
            "Registered nurse for patient care. Python a plus.",
            Some(Industry::Healthcare),
            fixed_time(),
        )
        .unwrap();
        assert!(jd.key_skills.contains("Patient Care"));
        assert!(!jd.key_skills.contains("Python"));
        assert_eq!(jd.industry, Industry::Healthcare);
    }

    #[test]
    fn test_explicit_title_line_wins() {
        let jd = parse("Job Title: Data Platform Lead\nWe build things.");
        assert_eq!(jd.job_title, "Data Platform Lead");
    }

    #[test]
    fn test_remote_detection() {
        assert_eq!(parse("Fully remote role").remote, RemoteStatus::Yes);
        assert_eq!(parse("This is an on-site position").remote, RemoteStatus::No);
    }

    #[test]
    fn test_experience_at_least() {
        let jd = parse("Candidates need at least 3 years in retail.");
        assert_eq!(jd.experience_level, "3 years");
    }

    #[test]
    fn test_seniority_needs_a_role_noun() {
        let jd = parse("Drive lead generation and CRM hygiene for our sales org.");
        assert_eq!(jd.experience_level, NOT_SPECIFIED);

        assert_eq!(parse("We are hiring a Lead data engineer.").experience_level, "Lead");
        assert_eq!(parse("This is a senior-level position.").experience_level, "senior");
        assert_eq!(parse("Report to the Tech Lead on payments.").experience_level, "Lead");
        assert_eq!(parse("Summer internship in finance").experience_level, "internship");
    }

    #[test]
    fn test_city_state_requires_known_state_code() {
        assert_eq!(parse("Office in Denver, CO.").location, "Denver, CO");
        assert_eq!(parse("Tools: Docker, CI pipelines.").location, NOT_SPECIFIED);
    }

    #[test]
    fn test_numbered_bullets_are_stripped() {
        let jd = parse("1. Develop internal tooling for the data team");
        assert_eq!(
            jd.responsibilities,
            vec!["Develop internal tooling for the data team".to_string()]
        );
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        assert_eq!(parse(BACKEND_JD), parse(BACKEND_JD));
    }
}
