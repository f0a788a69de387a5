//! Axum route handlers for learning plans, resources and progress.

use axum::{
    extract::{Query, State},
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use uuid::Uuid;

use crate::careers::catalog::CareerCatalog;
use crate::careers::gap_planner::{plan_next_step, GapPlanResult};
use crate::careers::skills::SkillSet;
use crate::careers::CareerError;
use crate::errors::AppError;
use crate::learning::progress::{
    list_completed, set_completion, PgProgressStore, ProgressSummary, ProgressUpdate,
    SetCompletionRequest,
};
use crate::learning::store::PgResourceStore;
use crate::models::learning::{Difficulty, LearningResourceRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LearningPlanRequest {
    #[serde(default)]
    pub user_skills: Vec<String>,
    /// Usually the `all_required_skills` echoed by /analyze.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Fallback when `required_skills` is not supplied.
    pub career: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    pub skill: Option<String>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub user_id: Option<Uuid>,
}

/// POST /learning/plan
///
/// Picks one missing skill and returns beginner resources for it.
pub async fn handle_learning_plan(
    State(state): State<AppState>,
    Json(request): Json<LearningPlanRequest>,
) -> Result<Json<GapPlanResult>, AppError> {
    let user_skills: SkillSet = request.user_skills.iter().collect();
    let required_skills = resolve_required_skills(&state.catalog, request)?;
    let store = PgResourceStore::new(state.db.clone());
    let mut rng = StdRng::from_entropy();

    let plan = plan_next_step(&user_skills, &required_skills, &store, &mut rng).await?;
    Ok(Json(plan))
}

/// Explicit `required_skills` win; otherwise the named career's list is used.
/// Neither given yields an empty list, which the planner rejects as missing input.
fn resolve_required_skills(
    catalog: &CareerCatalog,
    request: LearningPlanRequest,
) -> Result<Vec<String>, CareerError> {
    if !request.required_skills.is_empty() {
        return Ok(request.required_skills);
    }
    match request.career.as_deref() {
        Some(career) => Ok(catalog.find(career)?.required.clone()),
        None => Ok(Vec::new()),
    }
}

/// GET /learning/resources?skill=..&difficulty=..
pub async fn handle_list_resources(
    State(state): State<AppState>,
    Query(params): Query<ResourceQuery>,
) -> Result<Json<Vec<LearningResourceRow>>, AppError> {
    let store = PgResourceStore::new(state.db.clone());
    let skill = params.skill.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let resources = store.list(skill, params.difficulty).await?;
    Ok(Json(resources))
}

/// GET /learning/progress?user_id=..
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Query(params): Query<ProgressQuery>,
) -> Result<Json<ProgressSummary>, AppError> {
    let user_id = params
        .user_id
        .ok_or_else(|| AppError::MissingInput("user_id is required".to_string()))?;
    let store = PgProgressStore::new(state.db.clone());
    Ok(Json(list_completed(&store, user_id).await?))
}

/// POST /learning/progress
///
/// Marks a resource completed or not. Repeating a request is a successful no-op.
pub async fn handle_set_progress(
    State(state): State<AppState>,
    Json(request): Json<SetCompletionRequest>,
) -> Result<Json<ProgressUpdate>, AppError> {
    let (Some(user_id), Some(resource_id)) = (request.user_id, request.resource_id) else {
        return Err(AppError::MissingInput(
            "user_id and resource_id are required".to_string(),
        ));
    };
    let store = PgProgressStore::new(state.db.clone());
    let update = set_completion(&store, user_id, resource_id, request.completed).await?;
    Ok(Json(update))
}
