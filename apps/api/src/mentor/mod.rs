//! Mentor Q&A — forwards a free-text question to the LLM and returns its answer.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::MENTOR_SYSTEM;
use crate::state::AppState;

const MAX_QUESTION_CHARS: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct MentorRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct MentorResponse {
    pub answer: String,
}

/// Trims the question and enforces presence and length.
pub fn validate_question(question: &str) -> Result<&str, AppError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::MissingInput("question is required".to_string()));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(AppError::Validation(format!(
            "question must be at most {MAX_QUESTION_CHARS} characters"
        )));
    }
    Ok(question)
}

/// POST /mentor/ask
pub async fn handle_ask_mentor(
    State(state): State<AppState>,
    Json(request): Json<MentorRequest>,
) -> Result<Json<MentorResponse>, AppError> {
    let question = validate_question(&request.question)?;
    info!("Mentor question received ({} chars)", question.len());

    let answer = state.llm.ask(question, MENTOR_SYSTEM).await?;
    Ok(Json(MentorResponse { answer }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_question_is_missing_input() {
        assert!(matches!(
            validate_question("   \n"),
            Err(AppError::MissingInput(_))
        ));
    }

    #[test]
    fn test_question_is_trimmed() {
        assert_eq!(
            validate_question("  How do I learn Rust?  ").unwrap(),
            "How do I learn Rust?"
        );
    }

    #[test]
    fn test_overlong_question_rejected() {
        let question = "a".repeat(MAX_QUESTION_CHARS + 1);
        assert!(matches!(
            validate_question(&question),
            Err(AppError::Validation(_))
        ));
    }
}
