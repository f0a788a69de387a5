//! GitHub client — fetches a user's public repositories and counts their primary languages.
//!
//! One request per call, no retries. Failures surface as `GithubError` and are
//! converted to `AppError` at the handler boundary.
use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;

const USER_AGENT: &str = concat!("skillpath-api/", env!("CARGO_PKG_VERSION"));
const REPOS_PER_PAGE: u32 = 100;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub user '{0}' not found")]
    UserNotFound(String),

    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<GithubError> for AppError {
    fn from(err: GithubError) -> Self {
        if matches!(err, GithubError::UserNotFound(_)) {
            return AppError::NotFound(format!("{err}. The user might not exist."));
        }
        warn!("GitHub request failed: {err}");
        AppError::UpstreamUnavailable(format!("Could not fetch data from GitHub: {err}"))
    }
}

/// The subset of the GitHub repository object this service reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    /// GitHub reports `null` for repositories with no detectable language.
    pub language: Option<String>,
    #[serde(default)]
    pub fork: bool,
}

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(api_url: String, token: Option<String>) -> Result<Self, GithubError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Lists the public repositories of `username` (first page, up to 100).
    pub async fn list_repositories(&self, username: &str) -> Result<Vec<Repository>, GithubError> {
        let url = format!("{}/users/{}/repos", self.api_url, username.trim());

        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", REPOS_PER_PAGE)])
            .header("accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(GithubError::UserNotFound(username.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let repos: Vec<Repository> = response.json().await?;
        debug!(
            "Fetched {} repositories for {username} ({} forks)",
            repos.len(),
            repos.iter().filter(|r| r.fork).count()
        );
        Ok(repos)
    }
}

/// Counts repositories per primary language. Repositories without one are skipped.
pub fn language_counts(repos: &[Repository]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for repo in repos {
        if let Some(language) = repo.language.as_deref().map(str::trim) {
            if !language.is_empty() {
                *counts.entry(language.to_string()).or_insert(0) += 1;
            }
        }
    }
    counts
}
