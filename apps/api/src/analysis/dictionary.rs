//! Skill dictionaries, the synonym map and the per-industry high-conversion
//! keyword lists.
//!
//! Every entry is normalized once when the dictionary is first touched, and
//! `main` touches it at startup so a broken entry stops the process early.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;

use crate::analysis::normalizer::{normalize, NormalizedText};
use crate::errors::AppError;
use crate::models::Industry;

/// Minimum dictionary hits before a JD is attributed to an industry.
const MIN_INDUSTRY_HITS: usize = 2;

// ────────────────────────────────────────────
// Term tables (display names)
// ────────────────────────────────────────────

const TECHNOLOGY_TERMS: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "Rust",
    "PHP",
    "Ruby",
    "C++",
    "C#",
    "Swift",
    "Kotlin",
    "Scala",
    "SQL",
    "HTML",
    "CSS",
    "React",
    "Next.js",
    "Vue",
    "Angular",
    "Node.js",
    "Express.js",
    "Django",
    "Flask",
    "FastAPI",
    "Spring Boot",
    "Tailwind",
    "GraphQL",
    "REST API",
    "Microservices",
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Redis",
    "Elasticsearch",
    "DynamoDB",
    "AWS",
    "Azure",
    "GCP",
    "Google Cloud",
    "Docker",
    "Kubernetes",
    "Terraform",
    "CI/CD",
    "Jenkins",
    "Git",
    "Linux",
    "DevOps",
    "Machine Learning",
    "Deep Learning",
    "Artificial Intelligence",
    "Natural Language Processing",
    "TensorFlow",
    "PyTorch",
    "Pandas",
    "NumPy",
    "Data Analysis",
    "LLM",
    "MLOps",
    "React Native",
    "Flutter",
    "iOS",
    "Android",
    "Agile",
    "Scrum",
    "Test-Driven Development",
    "Unit Testing",
    "Full-Stack",
    "Figma",
    "UI/UX",
];

const HEALTHCARE_TERMS: &[&str] = &[
    "Patient Care",
    "Medical Records",
    "HIPAA",
    "Clinical",
    "Diagnosis",
    "Treatment Planning",
    "Nursing",
    "Pharmacy",
    "Therapy",
    "Electronic Health Records",
    "Medical Coding",
    "Triage",
    "CPR",
    "BLS",
    "Phlebotomy",
    "Patient Safety",
    "Infection Control",
];

const FINANCE_TERMS: &[&str] = &[
    "Financial Analysis",
    "Risk Management",
    "Compliance",
    "Audit",
    "Investment",
    "Banking",
    "Accounting",
    "FinTech",
    "Trading",
    "Portfolio Management",
    "Regulatory Reporting",
    "Financial Modeling",
    "Forecasting",
    "Budgeting",
    "GAAP",
    "CFA",
    "Valuation",
];

const MARKETING_TERMS: &[&str] = &[
    "Digital Marketing",
    "SEO",
    "SEM",
    "Content Strategy",
    "Social Media",
    "Analytics",
    "Google Analytics",
    "Brand Management",
    "Campaign Management",
    "Conversion Optimization",
    "ROI",
    "Email Marketing",
    "Copywriting",
    "Market Research",
    "HubSpot",
    "A/B Testing",
];

const SALES_TERMS: &[&str] = &[
    "Business Development",
    "Sales Strategy",
    "CRM",
    "Salesforce",
    "Lead Generation",
    "Negotiation",
    "Account Management",
    "B2B",
    "B2C",
    "Quota",
    "Pipeline Management",
    "Cold Calling",
    "Customer Success",
    "Revenue Growth",
];

const SOFT_SKILLS: &[&str] = &[
    "Leadership",
    "Communication",
    "Teamwork",
    "Problem Solving",
    "Collaboration",
    "Project Management",
    "Time Management",
    "Critical Thinking",
    "Mentoring",
    "Stakeholder Management",
    "Adaptability",
    "Presentation",
];

/// Alternative spellings that count as the same skill when matching a résumé.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("PostgreSQL", &["psql"]),
    ("JavaScript", &["ecmascript", "es6"]),
    ("Kubernetes", &["eks", "gke", "aks", "openshift"]),
    ("AWS", &["amazon web services", "ec2", "s3"]),
    ("GCP", &["google cloud"]),
    ("Google Cloud", &["gcp"]),
    (
        "CI/CD",
        &[
            "continuous integration",
            "continuous delivery",
            "continuous deployment",
            "github actions",
            "gitlab ci",
        ],
    ),
    ("REST API", &["restful", "rest apis"]),
    ("Microservices", &["microservice", "service-oriented"]),
    ("Docker", &["containerization", "containers"]),
    ("Full-Stack", &["full stack", "fullstack"]),
    ("Leadership", &["led a team", "team lead", "led teams", "managed a team"]),
    ("Communication", &["communicated", "presentations"]),
    ("Problem Solving", &["problem-solving", "troubleshooting"]),
    ("Teamwork", &["team player", "cross-functional"]),
    ("Collaboration", &["collaborated", "cross-functional"]),
    ("Project Management", &["managed projects", "pmp"]),
    ("Mentoring", &["mentored", "coached"]),
    (
        "Electronic Health Records",
        &["ehr", "emr", "electronic medical records"],
    ),
    ("CRM", &["salesforce", "hubspot"]),
    ("SEO", &["search engine optimization"]),
    ("SEM", &["search engine marketing", "google ads"]),
    ("Financial Modeling", &["financial models"]),
    ("Customer Success", &["client success"]),
];

/// Per-industry high-conversion keywords, most valuable first.
const HIGH_CONVERSION: &[(Industry, &[&str])] = &[
    (
        Industry::Technology,
        &[
            "Full-Stack",
            "React",
            "Node.js",
            "Python",
            "AWS",
            "Docker",
            "Kubernetes",
            "Microservices",
            "REST API",
            "DevOps",
            "CI/CD",
            "Agile",
            "Scrum",
            "TypeScript",
            "JavaScript",
            "MongoDB",
            "PostgreSQL",
            "Redis",
            "GraphQL",
            "Machine Learning",
        ],
    ),
    (
        Industry::Healthcare,
        &[
            "Patient Care",
            "Medical Records",
            "HIPAA",
            "Clinical",
            "Diagnosis",
            "Treatment Planning",
            "Nursing",
            "Pharmacy",
            "Therapy",
            "Electronic Health Records",
        ],
    ),
    (
        Industry::Finance,
        &[
            "Financial Analysis",
            "Risk Management",
            "Compliance",
            "Audit",
            "Investment",
            "Banking",
            "Accounting",
            "FinTech",
            "Trading",
            "Portfolio Management",
        ],
    ),
    (
        Industry::Marketing,
        &[
            "Digital Marketing",
            "SEO",
            "SEM",
            "Content Strategy",
            "Social Media",
            "Analytics",
            "Brand Management",
            "Campaign Management",
            "Conversion Optimization",
            "ROI",
        ],
    ),
    (
        Industry::Sales,
        &[
            "Business Development",
            "Sales Strategy",
            "CRM",
            "Lead Generation",
            "Negotiation",
            "Account Management",
            "B2B",
            "B2C",
            "Quota",
            "Pipeline Management",
        ],
    ),
    (
        Industry::General,
        &[
            "Leadership",
            "Project Management",
            "Communication",
            "Stakeholder Management",
            "Problem Solving",
            "Collaboration",
        ],
    ),
];

// ────────────────────────────────────────────
// Compiled dictionary
// ────────────────────────────────────────────

/// A dictionary entry: display name plus its normalized match pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTerm {
    pub name: &'static str,
    pub pattern: String,
}

#[derive(Debug)]
pub struct Dictionary {
    /// Industry terms only, no soft skills. Used for industry detection.
    industry_terms: Vec<(Industry, Vec<SkillTerm>)>,
    /// Industry terms + soft skills, keyed by industry. `General` is the union.
    scoped: HashMap<Industry, Vec<SkillTerm>>,
    synonyms: HashMap<&'static str, Vec<String>>,
    high_conversion: HashMap<Industry, Vec<SkillTerm>>,
    patterns: HashMap<&'static str, String>,
}

static DICTIONARY: Lazy<Result<Dictionary, String>> = Lazy::new(Dictionary::build);

/// Shared read-only dictionary. A malformed entry surfaces as an internal error.
pub fn dictionary() -> Result<&'static Dictionary, AppError> {
    match &*DICTIONARY {
        Ok(dictionary) => Ok(dictionary),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "skill dictionary failed to load: {e}"
        ))),
    }
}

impl Dictionary {
    fn build() -> Result<Self, String> {
        let soft_skills = compile_terms(SOFT_SKILLS)?;

        let industry_terms = vec![
            (Industry::Technology, compile_terms(TECHNOLOGY_TERMS)?),
            (Industry::Healthcare, compile_terms(HEALTHCARE_TERMS)?),
            (Industry::Finance, compile_terms(FINANCE_TERMS)?),
            (Industry::Marketing, compile_terms(MARKETING_TERMS)?),
            (Industry::Sales, compile_terms(SALES_TERMS)?),
        ];

        let mut scoped = HashMap::new();
        let mut general: Vec<SkillTerm> = Vec::new();
        for (industry, terms) in &industry_terms {
            let mut with_soft = terms.clone();
            with_soft.extend(soft_skills.iter().cloned());
            scoped.insert(*industry, with_soft);
            push_unique(&mut general, terms);
        }
        push_unique(&mut general, &soft_skills);
        scoped.insert(Industry::General, general);

        let mut patterns = HashMap::new();
        for term in scoped.values().flatten() {
            patterns.entry(term.name).or_insert_with(|| term.pattern.clone());
        }

        let mut synonyms = HashMap::new();
        for (name, alternatives) in SYNONYMS {
            let compiled = compile_terms(alternatives)?
                .into_iter()
                .map(|term| term.pattern)
                .collect::<Vec<_>>();
            synonyms.insert(*name, compiled);
        }

        let mut high_conversion = HashMap::new();
        for (industry, names) in HIGH_CONVERSION {
            high_conversion.insert(*industry, compile_terms(names)?);
        }

        Ok(Self {
            industry_terms,
            scoped,
            synonyms,
            high_conversion,
            patterns,
        })
    }

    /// Industry terms + soft skills. `None` and `General` both mean the union.
    pub fn terms(&self, industry: Option<Industry>) -> &[SkillTerm] {
        let key = industry.unwrap_or(Industry::General);
        self.scoped
            .get(&key)
            .or_else(|| self.scoped.get(&Industry::General))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of every scoped term present in `text`.
    pub fn scan(&self, text: &NormalizedText, industry: Option<Industry>) -> BTreeSet<String> {
        self.terms(industry)
            .iter()
            .filter(|term| text.contains_term(&term.pattern))
            .map(|term| term.name.to_string())
            .collect()
    }

    /// Industry with the most term hits, at least `MIN_INDUSTRY_HITS`.
    /// Ties go to the earlier industry in `Industry::ALL`.
    pub fn detect_industry(&self, text: &NormalizedText) -> Industry {
        let mut best = (Industry::General, MIN_INDUSTRY_HITS - 1);
        for (industry, terms) in &self.industry_terms {
            let hits = terms
                .iter()
                .filter(|term| text.contains_term(&term.pattern))
                .count();
            if hits > best.1 {
                best = (*industry, hits);
            }
        }
        best.0
    }

    /// Normalized pattern for a display name. Names outside the dictionary are
    /// normalized on the fly.
    pub fn pattern_for<'a>(&'a self, name: &str) -> Cow<'a, str> {
        match self.patterns.get(name) {
            Some(pattern) => Cow::Borrowed(pattern.as_str()),
            None => Cow::Owned(normalize(name).text().to_string()),
        }
    }

    pub fn synonyms_for(&self, name: &str) -> &[String] {
        self.synonyms.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn high_conversion(&self, industry: Industry) -> &[SkillTerm] {
        self.high_conversion
            .get(&industry)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// `(position, list length)` of `name` in the industry's high-conversion list.
    pub fn high_conversion_rank(&self, industry: Industry, name: &str) -> Option<(usize, usize)> {
        let list = self.high_conversion(industry);
        let pattern = self.pattern_for(name);
        list.iter()
            .position(|term| term.pattern == pattern.as_ref())
            .map(|i| (i, list.len()))
    }
}

fn compile_terms(names: &[&'static str]) -> Result<Vec<SkillTerm>, String> {
    names
        .iter()
        .map(|&name| {
            let normalized = normalize(name);
            if normalized.is_empty() {
                Err(format!("entry '{name}' normalizes to nothing"))
            } else {
                Ok(SkillTerm {
                    name,
                    pattern: normalized.text().to_string(),
                })
            }
        })
        .collect()
}

fn push_unique(into: &mut Vec<SkillTerm>, terms: &[SkillTerm]) {
    for term in terms {
        if !into.iter().any(|t| t.pattern == term.pattern) {
            into.push(term.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_loads() {
        assert!(dictionary().is_ok());
    }

    #[test]
    fn test_entry_that_normalizes_to_nothing_is_rejected() {
        let err = compile_terms(&["Python", "!!!"]).unwrap_err();
        assert!(err.contains("!!!"), "unexpected error: {err}");
    }

    #[test]
    fn test_patterns_are_normalized() {
        let dict = dictionary().unwrap();
        assert_eq!(dict.pattern_for("Node.js"), "node.js");
        assert_eq!(dict.pattern_for("CI/CD"), "ci/cd");
        assert_eq!(
            dict.pattern_for("Artificial Intelligence"),
            "artificial intelligence"
        );
    }

    #[test]
    fn test_unknown_name_is_normalized_on_the_fly() {
        let dict = dictionary().unwrap();
        assert_eq!(dict.pattern_for("Haskell"), "haskell");
    }

    #[test]
    fn test_general_dictionary_is_union_without_duplicates() {
        let dict = dictionary().unwrap();
        let general = dict.terms(None);
        let names: BTreeSet<_> = general.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), general.len());
        assert!(names.contains("Python"));
        assert!(names.contains("HIPAA"));
        assert!(names.contains("Leadership"));
    }

    #[test]
    fn test_industry_scope_includes_soft_skills() {
        let dict = dictionary().unwrap();
        let names: Vec<_> = dict
            .terms(Some(Industry::Healthcare))
            .iter()
            .map(|t| t.name)
            .collect();
        assert!(names.contains(&"HIPAA"));
        assert!(names.contains(&"Communication"));
        assert!(!names.contains(&"Python"));
    }

    #[test]
    fn test_scan_finds_expanded_abbreviations() {
        let dict = dictionary().unwrap();
        let text = normalize("We use k8s, Postgres and ML daily");
        let found = dict.scan(&text, None);
        assert!(found.contains("Kubernetes"));
        assert!(found.contains("PostgreSQL"));
        assert!(found.contains("Machine Learning"));
    }

    #[test]
    fn test_detect_industry_needs_two_hits() {
        let dict = dictionary().unwrap();
        assert_eq!(
            dict.detect_industry(&normalize("Python and Docker required")),
            Industry::Technology
        );
        assert_eq!(
            dict.detect_industry(&normalize("Python only")),
            Industry::General
        );
        assert_eq!(
            dict.detect_industry(&normalize("HIPAA compliant patient care, nursing")),
            Industry::Healthcare
        );
    }

    #[test]
    fn test_high_conversion_rank() {
        let dict = dictionary().unwrap();
        assert_eq!(
            dict.high_conversion_rank(Industry::Technology, "Full-Stack"),
            Some((0, 20))
        );
        assert_eq!(
            dict.high_conversion_rank(Industry::Technology, "Leadership"),
            None
        );
        assert_eq!(
            dict.high_conversion_rank(Industry::General, "Leadership"),
            Some((0, 6))
        );
    }

    #[test]
    fn test_synonyms_are_normalized() {
        let dict = dictionary().unwrap();
        assert!(dict
            .synonyms_for("AWS")
            .contains(&"amazon web services".to_string()));
        assert!(dict.synonyms_for("Rust").is_empty());
    }
}
