//! Skill Matcher: partitions skills into matched / missing / additional.

use std::collections::BTreeSet;

use crate::analysis::dictionary::Dictionary;
use crate::analysis::normalizer::NormalizedText;
use crate::models::JobDescription;

/// Three pairwise-disjoint skill sets. `matched ∪ missing == jd.key_skills`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillPartition {
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    pub additional: BTreeSet<String>,
}

/// A JD skill is matched when its normalized form, or any of its synonyms,
/// occurs in the résumé. Résumé skills the JD never asked for are `additional`.
pub fn match_skills(
    resume: &NormalizedText,
    jd: &JobDescription,
    dictionary: &Dictionary,
) -> SkillPartition {
    let (matched, missing): (BTreeSet<String>, BTreeSet<String>) =
        jd.key_skills.iter().cloned().partition(|skill| {
            resume.contains_term(&dictionary.pattern_for(skill))
                || dictionary
                    .synonyms_for(skill)
                    .iter()
                    .any(|synonym| resume.contains_term(synonym))
        });

    let additional = dictionary
        .scan(resume, None)
        .into_iter()
        .filter(|skill| !jd.key_skills.contains(skill))
        .collect();

    SkillPartition {
        matched,
        missing,
        additional,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dictionary::dictionary;
    use crate::analysis::keyword_extractor::extract_keywords;
    use crate::analysis::normalizer::normalize;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn partition(resume: &str, jd: &str) -> (SkillPartition, JobDescription) {
        let jd = extract_keywords(jd, None).unwrap();
        let result = match_skills(&normalize(resume), &jd, dictionary().unwrap());
        (result, jd)
    }

    #[test]
    fn test_basic_partition() {
        let (result, _) = partition(
            "Skills: Python, AWS, Docker",
            "Required: Python, AWS, Kubernetes, Leadership",
        );
        assert_eq!(result.matched, set(&["AWS", "Python"]));
        assert_eq!(result.missing, set(&["Kubernetes", "Leadership"]));
        assert_eq!(result.additional, set(&["Docker"]));
    }

    #[test]
    fn test_synonym_counts_as_match() {
        let (result, _) = partition(
            "Deployed services to Amazon Web Services with GitHub Actions",
            "Must know AWS and CI/CD",
        );
        assert!(result.matched.contains("AWS"));
        assert!(result.matched.contains("CI/CD"));
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_abbreviation_in_resume_matches_full_term() {
        let (result, _) = partition("Ran k8s clusters", "Kubernetes experience required");
        assert_eq!(result.matched, set(&["Kubernetes"]));
    }

    #[test]
    fn test_partitions_are_disjoint_and_cover_key_skills() {
        let (result, jd) = partition(
            "Python, React, Leadership, Figma, Terraform",
            "We need Python, Go-getters with React, Kubernetes, Terraform and Agile",
        );
        assert!(result.matched.is_disjoint(&result.missing));
        assert!(result.matched.is_disjoint(&result.additional));
        assert!(result.missing.is_disjoint(&result.additional));

        let covered: BTreeSet<String> = result.matched.union(&result.missing).cloned().collect();
        assert_eq!(covered, jd.key_skills);
    }

    #[test]
    fn test_no_requirements_leaves_everything_additional() {
        let (result, jd) = partition("Python and Docker", "Friendly team, great snacks.");
        assert!(jd.key_skills.is_empty());
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
        assert_eq!(result.additional, set(&["Docker", "Python"]));
    }
}
