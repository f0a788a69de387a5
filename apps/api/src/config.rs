use anyhow::{Context, Result};

use crate::careers::scoring::ScoringMode;

const DEFAULT_JOB_BOARD_URL: &str =
    "https://internshala.com/internships/work-from-home-software-development-internships/";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub scoring_mode: ScoringMode,
    pub job_board_url: String,
    pub job_board_base_url: String,
    /// None disables the background job-board sync.
    pub job_sync_interval_secs: Option<u64>,
    pub cors_allowed_origin: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            github_api_url: optional_env("GITHUB_API_URL")
                .unwrap_or_else(|| "https://api.github.com".to_string()),
            github_token: optional_env("GITHUB_TOKEN"),
            scoring_mode: optional_env("SCORING_MODE")
                .unwrap_or_else(|| "weighted".to_string())
                .parse::<ScoringMode>()
                .map_err(anyhow::Error::msg)
                .context("SCORING_MODE must be 'weighted' or 'matched'")?,
            job_board_url: optional_env("JOB_BOARD_URL")
                .unwrap_or_else(|| DEFAULT_JOB_BOARD_URL.to_string()),
            job_board_base_url: optional_env("JOB_BOARD_BASE_URL")
                .unwrap_or_else(|| "https://internshala.com".to_string()),
            job_sync_interval_secs: optional_env("JOB_SYNC_INTERVAL_SECS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("JOB_SYNC_INTERVAL_SECS must be a whole number of seconds")?
                .filter(|secs| *secs > 0),
            cors_allowed_origin: optional_env("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
