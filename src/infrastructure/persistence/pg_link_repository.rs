//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{IncrementOutcome, LinkRepository};
use crate::error::AppError;
use crate::utils::db_error::{is_undefined_function, is_unique_violation_on_code};

/// Row shape shared by every `links` query.
#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    owner_id: String,
    short_code: String,
    original_url: String,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.owner_id,
            r.short_code,
            r.original_url,
            r.click_count,
            r.created_at,
        )
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses bound parameters for every query. Click counting prefers the
/// `increment_click_count` stored function installed by the migrations.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let short_code = new_link.short_code.clone();

        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (owner_id, short_code, original_url, click_count)
            VALUES ($1, $2, $3, 0)
            RETURNING id, owner_id, short_code, original_url, click_count, created_at
            "#,
        )
        .bind(&new_link.owner_id)
        .bind(&new_link.short_code)
        .bind(&new_link.original_url)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_code(&e) {
                AppError::AllocationConflict(short_code)
            } else {
                AppError::persistence(format!("Failed to create link: {e}"))
            }
        })?;

        Ok(row.into())
    }

    async fn exists(&self, short_code: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM links WHERE short_code = $1)",
        )
        .bind(short_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, owner_id, short_code, original_url, click_count, created_at
            FROM links
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn increment_click_count(
        &self,
        short_code: &str,
    ) -> Result<IncrementOutcome, AppError> {
        let result = sqlx::query_scalar::<_, bool>("SELECT increment_click_count($1)")
            .bind(short_code)
            .fetch_one(self.pool.as_ref())
            .await;

        match result {
            Ok(true) => Ok(IncrementOutcome::Incremented),
            Ok(false) => Ok(IncrementOutcome::NotFound),
            Err(e) if is_undefined_function(&e) => Ok(IncrementOutcome::Unsupported),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_click_count(&self, short_code: &str) -> Result<Option<i64>, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT click_count FROM links WHERE short_code = $1",
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn set_click_count(&self, short_code: &str, click_count: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE links SET click_count = $2 WHERE short_code = $1")
            .bind(short_code)
            .bind(click_count)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, owner_id, short_code, original_url, click_count, created_at
            FROM links
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
