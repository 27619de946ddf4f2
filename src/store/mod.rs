//! Store module
//!
//! Persistence contracts for rate locks and currency lookups, with
//! Postgres and in-memory implementations.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Currency, RateLock};

pub use memory::{InMemoryCurrencyStore, InMemoryRateLockStore};
pub use postgres::{PgCurrencyStore, PgRateLockStore};

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Rate lock persistence. Records are inserted and deleted, never updated.
#[async_trait]
pub trait RateLockStore: Send + Sync {
    /// Persist a new lock
    async fn insert(&self, lock: &RateLock) -> Result<(), StoreError>;

    /// Lock for `(user_id, pair)` with `expires_at > now`, latest expiry first
    async fn find_latest_active(
        &self,
        user_id: &str,
        pair: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RateLock>, StoreError>;

    /// Lookup by id regardless of expiry
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RateLock>, StoreError>;

    /// Delete every lock with `expires_at < cutoff`, returning the count
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}

/// Read-only currency lookup
#[async_trait]
pub trait CurrencyStore: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<Currency>, StoreError>;
}
