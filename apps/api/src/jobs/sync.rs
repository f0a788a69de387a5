//! Job board sync — stores scraped listings, keyed by `apply_link`.
//!
//! Re-running a sync over the same listings inserts nothing.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::jobs::scraper::JobScraper;
use crate::models::job::{JobPostingRow, NewJobPosting};

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn existing_links(&self) -> Result<HashSet<String>, AppError>;

    /// Inserts the postings, skipping any whose `apply_link` already exists.
    /// Returns the number of rows written.
    async fn insert_postings(&self, postings: &[NewJobPosting]) -> Result<u64, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub scraped: usize,
    pub inserted: u64,
}

/// Drops listings already stored or repeated within the batch, then inserts the rest.
pub async fn sync_job_board(
    store: &dyn JobStore,
    listings: Vec<NewJobPosting>,
) -> Result<SyncReport, AppError> {
    let scraped = listings.len();
    let mut seen = store.existing_links().await?;

    let fresh: Vec<NewJobPosting> = listings
        .into_iter()
        .filter(|listing| seen.insert(listing.apply_link.clone()))
        .collect();

    if fresh.is_empty() {
        info!("No new jobs found; job board is up to date");
        return Ok(SyncReport {
            scraped,
            inserted: 0,
        });
    }

    let inserted = store.insert_postings(&fresh).await?;
    info!("Inserted {inserted} new job postings ({scraped} scraped)");
    Ok(SyncReport { scraped, inserted })
}

/// Scrapes the listing site once and syncs the results.
pub async fn run_sync(scraper: &JobScraper, store: &dyn JobStore) -> Result<SyncReport, AppError> {
    let listings = scraper.fetch_listings().await?;
    sync_job_board(store, listings).await
}

/// Runs `run_sync` every `interval` until the process exits. Failures are logged
/// and the loop carries on with the next tick.
pub fn spawn_periodic_sync(scraper: JobScraper, pool: PgPool, interval: Duration) {
    tokio::spawn(async move {
        let store = PgJobStore::new(pool);
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = run_sync(&scraper, &store).await {
                warn!("Scheduled job board sync failed: {e}");
            }
        }
    });
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres store
// ────────────────────────────────────────────────────────────────────────────

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All stored postings, newest first.
    pub async fn list(&self) -> Result<Vec<JobPostingRow>, AppError> {
        Ok(sqlx::query_as::<_, JobPostingRow>(
            "SELECT * FROM job_postings ORDER BY created_at DESC, title",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn existing_links(&self) -> Result<HashSet<String>, AppError> {
        let links: Vec<String> = sqlx::query_scalar("SELECT apply_link FROM job_postings")
            .fetch_all(&self.pool)
            .await?;
        Ok(links.into_iter().collect())
    }

    async fn insert_postings(&self, postings: &[NewJobPosting]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for posting in postings {
            inserted += sqlx::query(
                r#"
                INSERT INTO job_postings (title, company_name, location, apply_link, tags)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (apply_link) DO NOTHING
                "#,
            )
            .bind(&posting.title)
            .bind(&posting.company_name)
            .bind(&posting.location)
            .bind(&posting.apply_link)
            .bind(&posting.tags)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryJobStore {
        rows: Mutex<Vec<NewJobPosting>>,
    }

    #[async_trait]
    impl JobStore for MemoryJobStore {
        async fn existing_links(&self) -> Result<HashSet<String>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.apply_link.clone())
                .collect())
        }

        async fn insert_postings(&self, postings: &[NewJobPosting]) -> Result<u64, AppError> {
            let mut rows = self.rows.lock().unwrap();
            let mut inserted = 0;
            for posting in postings {
                if rows.iter().all(|r| r.apply_link != posting.apply_link) {
                    rows.push(posting.clone());
                    inserted += 1;
                }
            }
            Ok(inserted)
        }
    }

    fn listing(title: &str, link: &str) -> NewJobPosting {
        NewJobPosting {
            title: title.to_string(),
            company_name: "Acme".to_string(),
            location: "Remote".to_string(),
            apply_link: link.to_string(),
            tags: vec!["Internship".to_string()],
        }
    }

    #[tokio::test]
    async fn test_first_sync_inserts_everything() {
        let store = MemoryJobStore::default();
        let report = sync_job_board(&store, vec![listing("A", "/a"), listing("B", "/b")])
            .await
            .unwrap();
        assert_eq!(report, SyncReport { scraped: 2, inserted: 2 });
    }

    #[tokio::test]
    async fn test_resync_is_idempotent() {
        let store = MemoryJobStore::default();
        let batch = vec![listing("A", "/a"), listing("B", "/b")];
        sync_job_board(&store, batch.clone()).await.unwrap();

        let report = sync_job_board(&store, batch).await.unwrap();
        assert_eq!(report.inserted, 0);
        assert_eq!(store.rows.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_only_new_links_inserted() {
        let store = MemoryJobStore::default();
        sync_job_board(&store, vec![listing("A", "/a")]).await.unwrap();

        let report = sync_job_board(&store, vec![listing("A again", "/a"), listing("C", "/c")])
            .await
            .unwrap();
        assert_eq!(report, SyncReport { scraped: 2, inserted: 1 });
        let rows = store.rows.lock().unwrap();
        assert_eq!(rows[0].title, "A");
        assert_eq!(rows[1].apply_link, "/c");
    }

    #[tokio::test]
    async fn test_duplicates_within_batch_collapse() {
        let store = MemoryJobStore::default();
        let report = sync_job_board(&store, vec![listing("A", "/a"), listing("A2", "/a")])
            .await
            .unwrap();
        assert_eq!(report.inserted, 1);
    }

    #[tokio::test]
    async fn test_empty_scrape_inserts_nothing() {
        let store = MemoryJobStore::default();
        let report = sync_job_board(&store, vec![]).await.unwrap();
        assert_eq!(report, SyncReport { scraped: 0, inserted: 0 });
    }
}
