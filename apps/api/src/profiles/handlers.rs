use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::profiles::{get_profile, upsert_github_username};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub user_id: Option<Uuid>,
    pub github_username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdateResponse {
    pub success: bool,
    pub profile: ProfileRow,
}

/// GET /profile/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(get_profile(&state.db, id).await?))
}

/// POST /profile/update
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileUpdateResponse>, AppError> {
    let github_username = req
        .github_username
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let (Some(user_id), Some(github_username)) = (req.user_id, github_username) else {
        return Err(AppError::MissingInput(
            "User ID and GitHub username are required.".to_string(),
        ));
    };

    let profile = upsert_github_username(&state.db, user_id, github_username).await?;
    Ok(Json(ProfileUpdateResponse {
        success: true,
        profile,
    }))
}
