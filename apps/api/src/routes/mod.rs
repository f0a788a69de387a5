pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::careers::handlers as careers;
use crate::jobs::handlers as jobs;
use crate::learning::handlers as learning;
use crate::mentor;
use crate::profiles::handlers as profiles;
use crate::resume::MAX_RESUME_BYTES;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Career analysis
        .route("/analyze", get(careers::handle_analyze))
        .route(
            "/analyze/resume",
            post(careers::handle_analyze_resume)
                .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES + 64 * 1024)),
        )
        // Learning
        .route("/learning/plan", post(learning::handle_learning_plan))
        .route("/learning/resources", get(learning::handle_list_resources))
        .route(
            "/learning/progress",
            get(learning::handle_get_progress).post(learning::handle_set_progress),
        )
        // Profiles
        .route("/profile/update", post(profiles::handle_update_profile))
        .route("/profile/:id", get(profiles::handle_get_profile))
        // Job board
        .route("/jobs", get(jobs::handle_list_jobs))
        .route("/jobs/sync", post(jobs::handle_sync_jobs))
        // Mentor
        .route("/mentor/ask", post(mentor::handle_ask_mentor))
        .with_state(state)
}
