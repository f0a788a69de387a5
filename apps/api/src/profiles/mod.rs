// User profiles: stored GitHub username and xp total.

pub mod handlers;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<ProfileRow, AppError> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))
}

/// Sets the GitHub username, creating the profile if needed.
pub async fn upsert_github_username(
    pool: &PgPool,
    user_id: Uuid,
    github_username: &str,
) -> Result<ProfileRow, AppError> {
    let profile = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles (id, github_username)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE
            SET github_username = EXCLUDED.github_username, updated_at = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(github_username)
    .fetch_one(pool)
    .await?;

    info!("Profile {user_id} linked to GitHub user {github_username}");
    Ok(profile)
}

/// The stored GitHub username for a profile, or `MissingInput` when none is set.
pub async fn github_username_for(pool: &PgPool, user_id: Uuid) -> Result<String, AppError> {
    get_profile(pool, user_id)
        .await?
        .github_username
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| {
            AppError::MissingInput(format!("Profile {user_id} has no GitHub username"))
        })
}
