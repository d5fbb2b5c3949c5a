pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Match API
        .route(
            "/api/v1/match/keywords",
            post(handlers::handle_extract_keywords),
        )
        .route("/api/v1/match/analyze", post(handlers::handle_analyze))
        .route("/api/v1/match/resume", post(handlers::handle_match_resume))
        .route("/api/v1/match/extract-jd", post(handlers::handle_extract_jd))
        // Catalog
        .route(
            "/api/v1/match/industries",
            get(handlers::handle_list_industries),
        )
        .route(
            "/api/v1/match/high-conversion-keywords",
            get(handlers::handle_high_conversion_keywords),
        )
        .with_state(state)
}
