//! Progress ledger — which resources a user has completed, and their xp total.
//!
//! Completion is idempotent: marking an already-completed resource reports
//! success without touching the xp total. The store signals duplicates with an
//! explicit outcome variant, so no storage error is ever pattern-matched here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Store seam
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded { xp_total: i32 },
    AlreadyRecorded { xp_total: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed { xp_total: i32 },
    NotRecorded { xp_total: i32 },
}

/// Persistence for completion records. Each mutating call must apply the
/// completion row and the xp adjustment atomically.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn completed_resources(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    async fn xp_total(&self, user_id: Uuid) -> Result<i32, AppError>;

    async fn record_completion(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
    ) -> Result<RecordOutcome, AppError>;

    async fn remove_completion(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
    ) -> Result<RemoveOutcome, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Ledger operations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub completed: Vec<Uuid>,
    pub xp_total: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetCompletionRequest {
    pub user_id: Option<Uuid>,
    pub resource_id: Option<Uuid>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressUpdate {
    pub resource_id: Uuid,
    pub completed: bool,
    /// False when the request matched the existing state.
    pub changed: bool,
    pub xp_total: i32,
}

pub async fn list_completed(
    store: &dyn ProgressStore,
    user_id: Uuid,
) -> Result<ProgressSummary, AppError> {
    let completed = store.completed_resources(user_id).await?;
    let xp_total = store.xp_total(user_id).await?;
    Ok(ProgressSummary {
        completed,
        xp_total,
    })
}

pub async fn set_completion(
    store: &dyn ProgressStore,
    user_id: Uuid,
    resource_id: Uuid,
    completed: bool,
) -> Result<ProgressUpdate, AppError> {
    let (changed, xp_total) = if completed {
        match store.record_completion(user_id, resource_id).await? {
            RecordOutcome::Recorded { xp_total } => (true, xp_total),
            RecordOutcome::AlreadyRecorded { xp_total } => (false, xp_total),
        }
    } else {
        match store.remove_completion(user_id, resource_id).await? {
            RemoveOutcome::Removed { xp_total } => (true, xp_total),
            RemoveOutcome::NotRecorded { xp_total } => (false, xp_total),
        }
    };

    if changed {
        info!("User {user_id} set resource {resource_id} completed={completed}; xp now {xp_total}");
    }

    Ok(ProgressUpdate {
        resource_id,
        completed,
        changed,
        xp_total,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres store
// ────────────────────────────────────────────────────────────────────────────

pub struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn resource_xp(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    resource_id: Uuid,
) -> Result<i32, AppError> {
    sqlx::query_scalar::<_, i32>("SELECT xp_points FROM learning_resources WHERE id = $1")
        .bind(resource_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Learning resource {resource_id} not found")))
}

/// Locks the profile row so concurrent toggles for one user serialize on it.
async fn profile_xp(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: Uuid,
) -> Result<i32, AppError> {
    sqlx::query_scalar::<_, i32>("SELECT xp_total FROM profiles WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn completed_resources(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(sqlx::query_scalar(
            "SELECT resource_id FROM user_progress WHERE user_id = $1 ORDER BY completed_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn xp_total(&self, user_id: Uuid) -> Result<i32, AppError> {
        sqlx::query_scalar::<_, i32>("SELECT xp_total FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))
    }

    async fn record_completion(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
    ) -> Result<RecordOutcome, AppError> {
        let mut tx = self.pool.begin().await?;
        let xp_points = resource_xp(&mut tx, resource_id).await?;
        let current = profile_xp(&mut tx, user_id).await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO user_progress (user_id, resource_id, xp_awarded)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, resource_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(resource_id)
        .bind(xp_points)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.commit().await?;
            return Ok(RecordOutcome::AlreadyRecorded { xp_total: current });
        }

        let xp_total: i32 = sqlx::query_scalar(
            "UPDATE profiles SET xp_total = xp_total + $1, updated_at = now() WHERE id = $2 RETURNING xp_total",
        )
        .bind(xp_points)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(RecordOutcome::Recorded { xp_total })
    }

    async fn remove_completion(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
    ) -> Result<RemoveOutcome, AppError> {
        let mut tx = self.pool.begin().await?;
        resource_xp(&mut tx, resource_id).await?;
        let current = profile_xp(&mut tx, user_id).await?;

        // Refund what was granted at completion, not the resource's current value.
        let awarded: Option<i32> = sqlx::query_scalar(
            "DELETE FROM user_progress WHERE user_id = $1 AND resource_id = $2 RETURNING xp_awarded",
        )
        .bind(user_id)
        .bind(resource_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(awarded) = awarded else {
            tx.commit().await?;
            return Ok(RemoveOutcome::NotRecorded { xp_total: current });
        };

        let xp_total: i32 = sqlx::query_scalar(
            "UPDATE profiles SET xp_total = GREATEST(xp_total - $1, 0), updated_at = now() WHERE id = $2 RETURNING xp_total",
        )
        .bind(awarded)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(RemoveOutcome::Removed { xp_total })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryState {
        /// (user, resource) → xp granted at completion
        completions: BTreeMap<(Uuid, Uuid), i32>,
        xp: HashMap<Uuid, i32>,
        resources: HashMap<Uuid, i32>,
    }

    /// In-memory store; one mutex makes each call atomic.
    #[derive(Default)]
    struct MemoryProgressStore {
        state: Mutex<MemoryState>,
    }

    impl MemoryProgressStore {
        fn with(user_id: Uuid, resources: &[(Uuid, i32)]) -> Self {
            let store = Self::default();
            {
                let mut state = store.state.lock().unwrap();
                state.xp.insert(user_id, 0);
                state.resources.extend(resources.iter().copied());
            }
            store
        }
    }

    #[async_trait]
    impl ProgressStore for MemoryProgressStore {
        async fn completed_resources(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
            let state = self.state.lock().unwrap();
            Ok(state
                .completions
                .keys()
                .filter(|(u, _)| *u == user_id)
                .map(|(_, r)| *r)
                .collect())
        }

        async fn xp_total(&self, user_id: Uuid) -> Result<i32, AppError> {
            let state = self.state.lock().unwrap();
            state
                .xp
                .get(&user_id)
                .copied()
                .ok_or_else(|| AppError::NotFound("profile".into()))
        }

        async fn record_completion(
            &self,
            user_id: Uuid,
            resource_id: Uuid,
        ) -> Result<RecordOutcome, AppError> {
            let mut state = self.state.lock().unwrap();
            let points = *state
                .resources
                .get(&resource_id)
                .ok_or_else(|| AppError::NotFound("resource".into()))?;
            let current = *state
                .xp
                .get(&user_id)
                .ok_or_else(|| AppError::NotFound("profile".into()))?;
            if state.completions.contains_key(&(user_id, resource_id)) {
                return Ok(RecordOutcome::AlreadyRecorded { xp_total: current });
            }
            state.completions.insert((user_id, resource_id), points);
            let total = current + points;
            state.xp.insert(user_id, total);
            Ok(RecordOutcome::Recorded { xp_total: total })
        }

        async fn remove_completion(
            &self,
            user_id: Uuid,
            resource_id: Uuid,
        ) -> Result<RemoveOutcome, AppError> {
            let mut state = self.state.lock().unwrap();
            if !state.resources.contains_key(&resource_id) {
                return Err(AppError::NotFound("resource".into()));
            }
            let current = *state
                .xp
                .get(&user_id)
                .ok_or_else(|| AppError::NotFound("profile".into()))?;
            let Some(awarded) = state.completions.remove(&(user_id, resource_id)) else {
                return Ok(RemoveOutcome::NotRecorded { xp_total: current });
            };
            let total = (current - awarded).max(0);
            state.xp.insert(user_id, total);
            Ok(RemoveOutcome::Removed { xp_total: total })
        }
    }

    #[tokio::test]
    async fn test_completing_twice_awards_xp_once() {
        let user = Uuid::new_v4();
        let resource = Uuid::new_v4();
        let store = MemoryProgressStore::with(user, &[(resource, 50)]);

        let first = set_completion(&store, user, resource, true).await.unwrap();
        let second = set_completion(&store, user, resource, true).await.unwrap();

        assert!(first.changed);
        assert_eq!(first.xp_total, 50);
        assert!(!second.changed);
        assert_eq!(second.xp_total, 50);
        assert_eq!(store.xp_total(user).await.unwrap(), 50);
    }

    #[tokio::test]
    async fn test_uncompleting_refunds_xp() {
        let user = Uuid::new_v4();
        let resource = Uuid::new_v4();
        let store = MemoryProgressStore::with(user, &[(resource, 30)]);

        set_completion(&store, user, resource, true).await.unwrap();
        let update = set_completion(&store, user, resource, false).await.unwrap();

        assert!(update.changed);
        assert!(!update.completed);
        assert_eq!(update.xp_total, 0);
    }

    #[tokio::test]
    async fn test_uncompleting_refunds_points_granted_at_completion() {
        let user = Uuid::new_v4();
        let resource = Uuid::new_v4();
        let store = MemoryProgressStore::with(user, &[(resource, 30)]);

        set_completion(&store, user, resource, true).await.unwrap();
        store.state.lock().unwrap().resources.insert(resource, 80);
        let update = set_completion(&store, user, resource, false).await.unwrap();

        assert!(update.changed);
        assert_eq!(update.xp_total, 0);
    }

    #[tokio::test]
    async fn test_uncompleting_unknown_completion_is_noop() {
        let user = Uuid::new_v4();
        let resource = Uuid::new_v4();
        let store = MemoryProgressStore::with(user, &[(resource, 30)]);

        let update = set_completion(&store, user, resource, false).await.unwrap();
        assert!(!update.changed);
        assert_eq!(update.xp_total, 0);
    }

    #[tokio::test]
    async fn test_unknown_resource_is_not_found() {
        let user = Uuid::new_v4();
        let store = MemoryProgressStore::with(user, &[]);

        let err = set_completion(&store, user, Uuid::new_v4(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_completed_reports_ids_and_total() {
        let user = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let store = MemoryProgressStore::with(user, &[(a, 10), (b, 20)]);

        set_completion(&store, user, a, true).await.unwrap();
        set_completion(&store, user, b, true).await.unwrap();

        let summary = list_completed(&store, user).await.unwrap();
        assert_eq!(summary.xp_total, 30);
        assert_eq!(summary.completed.len(), 2);
        assert!(summary.completed.contains(&a));
        assert!(summary.completed.contains(&b));
    }

    /// Runs against a throwaway database created by `sqlx::test` from
    /// `DATABASE_URL`; run with `cargo test -- --ignored`.
    mod postgres {
        use sqlx::PgPool;
        use uuid::Uuid;

        use crate::errors::AppError;
        use crate::learning::progress::{
            PgProgressStore, ProgressStore, RecordOutcome, RemoveOutcome,
        };

        async fn seed(pool: &PgPool, xp_points: i32) -> (Uuid, Uuid) {
            let user = Uuid::new_v4();
            sqlx::query("INSERT INTO profiles (id) VALUES ($1)")
                .bind(user)
                .execute(pool)
                .await
                .unwrap();
            let resource: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO learning_resources (title, url, xp_points, skill_name, difficulty)
                VALUES ('Tour of Go', 'https://go.dev/tour', $1, 'Go', 'beginner')
                RETURNING id
                "#,
            )
            .bind(xp_points)
            .fetch_one(pool)
            .await
            .unwrap();
            (user, resource)
        }

        #[sqlx::test]
        #[ignore = "needs a Postgres DATABASE_URL"]
        async fn test_pg_completing_twice_awards_xp_once(pool: PgPool) {
            let (user, resource) = seed(&pool, 50).await;
            let store = PgProgressStore::new(pool);

            assert_eq!(
                store.record_completion(user, resource).await.unwrap(),
                RecordOutcome::Recorded { xp_total: 50 }
            );
            assert_eq!(
                store.record_completion(user, resource).await.unwrap(),
                RecordOutcome::AlreadyRecorded { xp_total: 50 }
            );
            assert_eq!(store.xp_total(user).await.unwrap(), 50);
            assert_eq!(store.completed_resources(user).await.unwrap(), vec![resource]);
        }

        #[sqlx::test]
        #[ignore = "needs a Postgres DATABASE_URL"]
        async fn test_pg_removal_refunds_awarded_points(pool: PgPool) {
            let (user, resource) = seed(&pool, 30).await;
            let store = PgProgressStore::new(pool.clone());

            store.record_completion(user, resource).await.unwrap();
            sqlx::query("UPDATE learning_resources SET xp_points = 80 WHERE id = $1")
                .bind(resource)
                .execute(&pool)
                .await
                .unwrap();

            assert_eq!(
                store.remove_completion(user, resource).await.unwrap(),
                RemoveOutcome::Removed { xp_total: 0 }
            );
            assert_eq!(
                store.remove_completion(user, resource).await.unwrap(),
                RemoveOutcome::NotRecorded { xp_total: 0 }
            );
        }

        #[sqlx::test]
        #[ignore = "needs a Postgres DATABASE_URL"]
        async fn test_pg_unknown_resource_is_not_found(pool: PgPool) {
            let (user, _) = seed(&pool, 10).await;
            let store = PgProgressStore::new(pool);

            let err = store
                .record_completion(user, Uuid::new_v4())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)));
        }
    }
}
