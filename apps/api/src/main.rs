mod careers;
mod config;
mod db;
mod errors;
mod github;
mod jobs;
mod learning;
mod llm_client;
mod mentor;
mod models;
mod profiles;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::careers::catalog::default_catalog;
use crate::careers::scoring::scorer_for;
use crate::config::Config;
use crate::db::create_pool;
use crate::github::GithubClient;
use crate::jobs::scraper::JobScraper;
use crate::jobs::sync::spawn_periodic_sync;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; missing required env vars abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillPath API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Career catalog and scorer
    let catalog = Arc::new(default_catalog()?);
    let career_scorer = scorer_for(config.scoring_mode);
    info!(
        "Career catalog loaded: {} careers, scoring mode '{}'",
        catalog.careers().len(),
        config.scoring_mode.as_str()
    );

    // External collaborators
    let github = GithubClient::new(config.github_api_url.clone(), config.github_token.clone())
        .context("Failed to build GitHub client")?;
    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let job_scraper = JobScraper::new(
        config.job_board_url.clone(),
        config.job_board_base_url.clone(),
    )
    .context("Failed to build job scraper")?;

    if let Some(secs) = config.job_sync_interval_secs {
        spawn_periodic_sync(job_scraper.clone(), db.clone(), Duration::from_secs(secs));
        info!("Background job board sync every {secs}s");
    }

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_allowed_origin
                .parse::<HeaderValue>()
                .context("CORS_ALLOWED_ORIGIN must be a valid origin")?,
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    // Build app state
    let state = AppState {
        db,
        github,
        llm,
        job_scraper,
        catalog,
        career_scorer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
