//! Axum route handlers for career analysis.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::careers::catalog::CareerCatalog;
use crate::careers::scoring::{CareerScorer, ScoreResult, ScoringMode};
use crate::careers::skills::{aggregate_skills, extract_resume_skills, AggregatedSkills, SkillSet};
use crate::careers::CareerError;
use crate::errors::AppError;
use crate::github::language_counts;
use crate::profiles::github_username_for;
use crate::resume::extract_text;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub github_username: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Ranked,
    NoMatchingCareer,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub outcome: AnalysisOutcome,
    pub scoring_mode: ScoringMode,
    pub skills: SkillSet,
    pub careers: Vec<ScoreResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /analyze?github_username=.. | ?user_id=..
///
/// Ranks careers from the user's GitHub repository languages.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeQuery>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let username = match (non_blank(params.github_username), params.user_id) {
        (Some(name), _) => name,
        (None, Some(user_id)) => github_username_for(&state.db, user_id).await?,
        (None, None) => {
            return Err(AppError::MissingInput(
                "github_username or user_id is required".to_string(),
            ))
        }
    };

    let counts = github_languages(&state, &username).await?;
    let aggregated = aggregate_skills(&counts, &[], &state.catalog)?;
    info!("Analyzing {username}: {} language(s)", aggregated.skills.len());

    Ok(Json(rank(
        state.career_scorer.as_ref(),
        &state.catalog,
        aggregated,
    )?))
}

/// POST /analyze/resume (multipart: `github_username`, `resume`)
///
/// Unions GitHub languages and résumé skills, then ranks careers.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut github_username: Option<String> = None;
    let mut resume_pdf: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("github_username") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid github_username: {e}")))?;
                github_username = non_blank(Some(text));
            }
            Some("resume") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid résumé upload: {e}")))?;
                if !bytes.is_empty() {
                    resume_pdf = Some(bytes.to_vec());
                }
            }
            _ => {}
        }
    }

    if github_username.is_none() && resume_pdf.is_none() {
        return Err(AppError::MissingInput(
            "github_username or a résumé file is required".to_string(),
        ));
    }

    let counts = match &github_username {
        Some(name) => github_languages(&state, name).await?,
        None => BTreeMap::new(),
    };

    let resume_skills = match resume_pdf {
        Some(pdf) => {
            let text = extract_text(pdf).await?;
            extract_resume_skills(&text, &state.catalog)
        }
        None => Vec::new(),
    };

    let aggregated = aggregate_skills(&counts, &resume_skills, &state.catalog)?;
    info!(
        "Combined analysis: {} GitHub language(s), {} résumé skill(s), {} total",
        counts.len(),
        resume_skills.len(),
        aggregated.skills.len()
    );

    Ok(Json(rank(
        state.career_scorer.as_ref(),
        &state.catalog,
        aggregated,
    )?))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn github_languages(
    state: &AppState,
    username: &str,
) -> Result<BTreeMap<String, u32>, AppError> {
    let repos = state.github.list_repositories(username).await?;
    Ok(language_counts(&repos))
}

/// Scores the skills; "no career matched" becomes an empty, labelled result.
fn rank(
    scorer: &dyn CareerScorer,
    catalog: &CareerCatalog,
    aggregated: AggregatedSkills,
) -> Result<AnalyzeResponse, AppError> {
    let (outcome, careers) = match scorer.score_all(&aggregated, catalog) {
        Ok(careers) => (AnalysisOutcome::Ranked, careers),
        Err(CareerError::NoMatchingCareer) => (AnalysisOutcome::NoMatchingCareer, Vec::new()),
        Err(e) => return Err(e.into()),
    };

    Ok(AnalyzeResponse {
        outcome,
        scoring_mode: scorer.mode(),
        skills: aggregated.skills,
        careers,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
