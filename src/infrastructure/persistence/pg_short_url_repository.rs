//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Insertion, NewShortUrl, OWNER_URL_CAP, ShortUrl};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct ShortUrlRow {
    id: i64,
    owner: String,
    long_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
}

impl From<ShortUrlRow> for ShortUrl {
    fn from(r: ShortUrlRow) -> Self {
        ShortUrl::new(r.id, r.owner, r.long_url, r.short_code, r.created_at)
    }
}

/// PostgreSQL repository for short URL records.
///
/// Creation runs in a single transaction guarded by a per-owner advisory lock,
/// so two concurrent creations by the same owner cannot both observe a stale
/// count and over-evict.
pub struct PgShortUrlRepository {
    pool: Arc<PgPool>,
}

impl PgShortUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<Insertion, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&new_url.owner)
            .execute(&mut *tx)
            .await?;

        let created: ShortUrlRow = sqlx::query_as(
            r#"
            INSERT INTO short_urls (owner, long_url, short_code)
            VALUES ($1, $2, $3)
            RETURNING id, owner, long_url, short_code, created_at
            "#,
        )
        .bind(&new_url.owner)
        .bind(&new_url.long_url)
        .bind(&new_url.short_code)
        .fetch_one(&mut *tx)
        .await?;

        let evicted: Vec<ShortUrlRow> = sqlx::query_as(
            r#"
            DELETE FROM short_urls
            WHERE id IN (
                SELECT id
                FROM short_urls
                WHERE owner = $1
                ORDER BY created_at DESC, id DESC
                OFFSET $2
            )
            RETURNING id, owner, long_url, short_code, created_at
            "#,
        )
        .bind(&new_url.owner)
        .bind(OWNER_URL_CAP as i64)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Insertion {
            created: created.into(),
            evicted: evicted.into_iter().map(ShortUrl::from).collect(),
        })
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortUrl>, AppError> {
        let row: Option<ShortUrlRow> = sqlx::query_as(
            r#"
            SELECT id, owner, long_url, short_code, created_at
            FROM short_urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<ShortUrl>, AppError> {
        let rows: Vec<ShortUrlRow> = sqlx::query_as(
            r#"
            SELECT id, owner, long_url, short_code, created_at
            FROM short_urls
            WHERE owner = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ShortUrl::from).collect())
    }

    async fn delete_by_id(&self, id: i64, owner: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_urls WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
