use async_trait::async_trait;
use sqlx::PgPool;

use crate::careers::gap_planner::ResourceLookup;
use crate::errors::AppError;
use crate::models::learning::{Difficulty, LearningResourceRow};

/// Postgres-backed learning resource catalog.
pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists resources, optionally narrowed to one skill and/or difficulty.
    pub async fn list(
        &self,
        skill: Option<&str>,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<LearningResourceRow>, AppError> {
        Ok(sqlx::query_as::<_, LearningResourceRow>(
            r#"
            SELECT id, title, url, xp_points, skill_name, difficulty
            FROM learning_resources
            WHERE ($1::text IS NULL OR lower(skill_name) = lower($1))
              AND ($2::difficulty_level IS NULL OR difficulty = $2)
            ORDER BY skill_name, difficulty, title
            "#,
        )
        .bind(skill)
        .bind(difficulty)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl ResourceLookup for PgResourceStore {
    async fn find_resources(
        &self,
        skill: &str,
        difficulty: Difficulty,
    ) -> Result<Vec<LearningResourceRow>, AppError> {
        Ok(sqlx::query_as::<_, LearningResourceRow>(
            r#"
            SELECT id, title, url, xp_points, skill_name, difficulty
            FROM learning_resources
            WHERE lower(skill_name) = lower($1) AND difficulty = $2
            ORDER BY title, id
            "#,
        )
        .bind(skill)
        .bind(difficulty)
        .fetch_all(&self.pool)
        .await?)
    }
}
