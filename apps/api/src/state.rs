use crate::analysis::{JdExtractor, MatchEngine};

/// Shared application state injected into all route handlers via Axum extractors.
/// Both members hold only immutable configuration and pooled HTTP clients.
#[derive(Clone)]
pub struct AppState {
    pub engine: MatchEngine,
    pub jd_extractor: JdExtractor,
}
