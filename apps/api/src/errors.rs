use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::careers::CareerError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No skills found")]
    NoSkillsFound,

    #[error("No matching career")]
    NoMatchingCareer,

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Career not found: {0}")]
    CareerNotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CareerError> for AppError {
    fn from(err: CareerError) -> Self {
        match err {
            CareerError::NoSkillsFound => AppError::NoSkillsFound,
            CareerError::NoMatchingCareer => AppError::NoMatchingCareer,
            CareerError::MissingInput(msg) => AppError::MissingInput(msg),
            CareerError::CareerNotFound(name) => AppError::CareerNotFound(name),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NoSkillsFound => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_SKILLS_FOUND",
                "No skills could be found in the supplied GitHub profile or résumé".to_string(),
            ),
            AppError::NoMatchingCareer => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_MATCHING_CAREER",
                "None of the known careers match these skills".to_string(),
            ),
            AppError::MissingInput(msg) => {
                (StatusCode::BAD_REQUEST, "MISSING_INPUT", msg.clone())
            }
            AppError::CareerNotFound(name) => (
                StatusCode::NOT_FOUND,
                "CAREER_NOT_FOUND",
                format!("Unknown career '{name}'"),
            ),
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!("Upstream unavailable: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE", msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
