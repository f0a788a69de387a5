//! Axum route handlers for the job board.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::jobs::sync::{run_sync, PgJobStore, SyncReport};
use crate::models::job::JobPostingRow;
use crate::state::AppState;

/// GET /jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobPostingRow>>, AppError> {
    let store = PgJobStore::new(state.db.clone());
    Ok(Json(store.list().await?))
}

/// POST /jobs/sync
///
/// Scrapes the listing site once and stores listings with unseen apply links.
pub async fn handle_sync_jobs(State(state): State<AppState>) -> Result<Json<SyncReport>, AppError> {
    let store = PgJobStore::new(state.db.clone());
    let report = run_sync(&state.job_scraper, &store).await?;
    Ok(Json(report))
}
