mod analysis;
mod config;
mod errors;
mod models;
mod providers;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::{JdExtractor, MatchEngine};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Match API v{}", env!("CARGO_PKG_VERSION"));

    // Dictionaries and rule tables are built once, before the first request
    analysis::warm_up().context("Failed to initialize skill dictionaries and extraction rules")?;
    info!("Skill dictionaries and extraction rules ready");

    // Initialize the match engine (primary AI provider + local pipeline)
    let engine = MatchEngine::from_config(&config).context("Failed to build AI provider client")?;
    match engine.provider_name() {
        Some(name) => info!(
            "AI provider: {name} (timeout {}ms)",
            config.ai_timeout.as_millis()
        ),
        None => warn!(
            "{} is not set; analyses will use the local pipeline only",
            config.ai_provider.credential_var()
        ),
    }

    // Initialize the JD extractor (Firecrawl when keyed, otherwise the reader)
    let jd_extractor =
        JdExtractor::from_config(&config).context("Failed to build extraction service client")?;
    info!("Extraction service: {}", jd_extractor.service_name());

    let state = AppState {
        engine,
        jd_extractor,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
