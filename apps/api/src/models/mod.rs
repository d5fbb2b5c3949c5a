pub mod industry;
pub mod job_description;
pub mod match_result;

pub use industry::Industry;
pub use job_description::{JobDescription, RemoteStatus, NOT_SPECIFIED};
pub use match_result::{
    AnalysisReport, AnalysisSource, ExperienceMatch, HiringProbability, KeywordAnalysis,
    MatchResult, ProviderOutcome, ResumeStructure, SkillsMatch, Suggestion, SuggestionType,
};
