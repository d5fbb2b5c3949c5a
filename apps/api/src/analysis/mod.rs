pub mod dictionary;
pub mod handlers;
pub mod jd_extractor;
pub mod keyword_extractor;
pub mod keywords;
pub mod normalizer;
pub mod orchestrator;
pub mod pipeline;
pub mod prompts;
pub mod scorer;
pub mod skill_matcher;
pub mod suggestions;

pub use jd_extractor::JdExtractor;
pub use orchestrator::MatchEngine;

use crate::errors::AppError;

/// Builds the dictionaries and compiles every regex rule. Run once at startup
/// so a malformed entry stops the process instead of failing requests.
pub fn warm_up() -> Result<(), AppError> {
    dictionary::dictionary()?;
    keyword_extractor::warm_up()?;
    scorer::warm_up()
}
