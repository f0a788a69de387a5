use std::sync::Arc;

use sqlx::PgPool;

use crate::careers::catalog::CareerCatalog;
use crate::careers::scoring::CareerScorer;
use crate::github::GithubClient;
use crate::jobs::scraper::JobScraper;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub github: GithubClient,
    pub llm: LlmClient,
    pub job_scraper: JobScraper,
    /// Built once at startup; never mutated.
    pub catalog: Arc<CareerCatalog>,
    /// Pluggable career scorer. Chosen via SCORING_MODE.
    pub career_scorer: Arc<dyn CareerScorer>,
}
