//! Postgres stores
//!
//! sqlx-backed persistence for `rate_locks` and `currencies`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CurrencyStore, RateLockStore, StoreError};
use crate::domain::{Currency, RateLock};

type RateLockRow = (
    Uuid,
    String,
    String,
    Decimal,
    DateTime<Utc>,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn from_row(
    (id, user_id, pair, locked_rate, expires_at, created_at, updated_at): RateLockRow,
) -> RateLock {
    RateLock {
        id,
        user_id,
        pair,
        locked_rate,
        expires_at,
        created_at,
        updated_at,
    }
}

/// Rate lock repository over the `rate_locks` table.
///
/// No unique constraint guards active locks; uniqueness is the manager's
/// check-then-insert.
#[derive(Debug, Clone)]
pub struct PgRateLockStore {
    pool: PgPool,
}

impl PgRateLockStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLockStore for PgRateLockStore {
    async fn insert(&self, lock: &RateLock) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO rate_locks (id, user_id, pair, locked_rate, expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(lock.id)
        .bind(&lock.user_id)
        .bind(&lock.pair)
        .bind(lock.locked_rate)
        .bind(lock.expires_at)
        .bind(lock.created_at)
        .bind(lock.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_latest_active(
        &self,
        user_id: &str,
        pair: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RateLock>, StoreError> {
        let row: Option<RateLockRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, pair, locked_rate, expires_at, created_at, updated_at
            FROM rate_locks
            WHERE user_id = $1 AND pair = $2 AND expires_at > $3
            ORDER BY expires_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(pair)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RateLock>, StoreError> {
        let row: Option<RateLockRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, pair, locked_rate, expires_at, created_at, updated_at
            FROM rate_locks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let rows = sqlx::query(
            r#"
            DELETE FROM rate_locks
            WHERE expires_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows)
    }
}

/// Currency lookup over the `currencies` table
#[derive(Debug, Clone)]
pub struct PgCurrencyStore {
    pool: PgPool,
}

impl PgCurrencyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CurrencyStore for PgCurrencyStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Currency>, StoreError> {
        let row: Option<(String, Option<Decimal>)> = sqlx::query_as(
            r#"
            SELECT code, rate FROM currencies WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(code, rate)| Currency { code, rate }))
    }
}
