// Prompts for the AI match analysis. Placeholders: {resume_text}, {jd_text},
// {json_only}.

use crate::providers::prompts::{truncate_chars, JSON_ONLY_INSTRUCTION, MAX_PROMPT_INPUT_CHARS};

pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"{json_only}

You are an expert ATS (Applicant Tracking System) analyst and career coach.
Compare the résumé with the job description and return a match analysis.

Return a JSON object with exactly these fields:
{
  "matchScore": <integer 0-100, overall fit>,
  "hiringProbability": {
    "current": <integer 0-100>,
    "optimized": <integer 0-100, after applying the critical suggestions>
  },
  "keyFindings": [<3-5 short observations>],
  "suggestions": [
    {
      "type": "critical" | "enhancement" | "optimization",
      "title": "<short title>",
      "description": "<what is wrong and why it matters>",
      "action": "<one concrete step>",
      "priority": <integer 1-5, 5 = most important>,
      "expectedImpact": <integer 0-20, score points gained>
    }
  ]
}

Rules:
- Only reference skills and experience that appear in the texts below.
- "critical" is for missing must-have skills and experience gaps.
- Order suggestions from most to least important.

RÉSUMÉ:
{resume_text}

JOB DESCRIPTION:
{jd_text}"#;

pub fn build_analyze_prompt(resume_text: &str, jd_text: &str) -> String {
    ANALYZE_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace(
            "{resume_text}",
            truncate_chars(resume_text, MAX_PROMPT_INPUT_CHARS),
        )
        .replace("{jd_text}", truncate_chars(jd_text, MAX_PROMPT_INPUT_CHARS))
}
