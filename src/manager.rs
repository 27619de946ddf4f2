//! Rate Lock Manager
//!
//! Creates, resolves and purges rate locks.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SharedClock, SystemClock};
use crate::domain::{cross_rate, CurrencyPair, PairPolicy, RateLock, RateLockError, RateLockResult};
use crate::store::{CurrencyStore, RateLockStore};

/// Default lock time-to-live (5 minutes)
pub const DEFAULT_LOCK_DURATION_MS: i64 = 300_000;

/// Configuration for the rate lock manager
#[derive(Debug, Clone)]
pub struct RateLockConfig {
    /// How long a new lock stays active
    pub lock_duration: Duration,
    /// Treatment of caller-supplied pair strings
    pub pair_policy: PairPolicy,
}

impl Default for RateLockConfig {
    fn default() -> Self {
        Self {
            lock_duration: Duration::milliseconds(DEFAULT_LOCK_DURATION_MS),
            pair_policy: PairPolicy::Raw,
        }
    }
}

/// Rate lock manager
///
/// All store calls are independent; nothing here spans a transaction.
pub struct RateLockManager {
    locks: Arc<dyn RateLockStore>,
    currencies: Arc<dyn CurrencyStore>,
    clock: SharedClock,
    config: RateLockConfig,
}

impl RateLockManager {
    /// Create a manager on the wall clock with default configuration
    pub fn new(locks: Arc<dyn RateLockStore>, currencies: Arc<dyn CurrencyStore>) -> Self {
        Self::with_config(locks, currencies, Arc::new(SystemClock), RateLockConfig::default())
    }

    /// Create with custom clock and configuration
    pub fn with_config(
        locks: Arc<dyn RateLockStore>,
        currencies: Arc<dyn CurrencyStore>,
        clock: SharedClock,
        config: RateLockConfig,
    ) -> Self {
        Self {
            locks,
            currencies,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &RateLockConfig {
        &self.config
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // =========================================================================
    // lock_rate
    // =========================================================================

    /// Lock the current rate of `pair` for `user_id`.
    ///
    /// Uniqueness is a read followed by an insert. Two concurrent calls for
    /// the same key can both pass the read and leave two active locks;
    /// `get_valid_rate_lock` then returns the one expiring last.
    ///
    /// # Errors
    /// - `Validation` for an empty user id or malformed pair
    /// - `Conflict` if an unexpired lock exists for the key
    /// - `CurrencyNotFound` / `DataIntegrity` from pricing
    /// - `DurationOutOfRange` if the configured duration overflows the expiry
    pub async fn lock_rate(&self, user_id: &str, pair: &str) -> RateLockResult<RateLock> {
        if user_id.trim().is_empty() {
            return Err(RateLockError::Validation("user id must not be empty".to_string()));
        }

        let parsed = CurrencyPair::parse(pair, self.config.pair_policy)?;
        let pair_key = self.pair_key(pair, &parsed);

        let now = self.clock.now();
        if self
            .locks
            .find_latest_active(user_id, &pair_key, now)
            .await?
            .is_some()
        {
            warn!(user_id = %user_id, pair = %pair_key, "Rate lock already active");
            return Err(RateLockError::conflict(user_id, pair_key));
        }

        let locked_rate = self.rate_for(&parsed).await?;
        let lock = RateLock::new(user_id, pair_key, locked_rate, now, self.config.lock_duration)?;

        self.locks.insert(&lock).await?;

        debug!(
            lock_id = %lock.id,
            user_id = %lock.user_id,
            pair = %lock.pair,
            rate = %lock.locked_rate,
            expires_at = %lock.expires_at,
            "Created rate lock"
        );

        Ok(lock)
    }

    // =========================================================================
    // get_rate_for_pair
    // =========================================================================

    /// Current cross rate for a `FROM/TO` pair, without locking it.
    pub async fn get_rate_for_pair(&self, pair: &str) -> RateLockResult<Decimal> {
        let parsed = CurrencyPair::parse(pair, self.config.pair_policy)?;
        self.rate_for(&parsed).await
    }

    async fn rate_for(&self, pair: &CurrencyPair) -> RateLockResult<Decimal> {
        let (from, to) = tokio::try_join!(
            self.currencies.find_by_code(&pair.from),
            self.currencies.find_by_code(&pair.to),
        )?;

        let from = from.ok_or_else(|| RateLockError::CurrencyNotFound(pair.from.clone()))?;
        let to = to.ok_or_else(|| RateLockError::CurrencyNotFound(pair.to.clone()))?;

        cross_rate(&from, &to)
    }

    // =========================================================================
    // get_valid_rate_lock / find_by_id
    // =========================================================================

    /// Unexpired lock for the key, latest expiry first. `None` is not an error.
    pub async fn get_valid_rate_lock(
        &self,
        user_id: &str,
        pair: &str,
    ) -> RateLockResult<Option<RateLock>> {
        let pair_key = match self.config.pair_policy {
            PairPolicy::Raw => pair.to_string(),
            PairPolicy::Normalized => match CurrencyPair::parse(pair, PairPolicy::Normalized) {
                Ok(parsed) => parsed.to_string(),
                // A malformed pair can never have been locked
                Err(_) => return Ok(None),
            },
        };

        let lock = self
            .locks
            .find_latest_active(user_id, &pair_key, self.clock.now())
            .await?;

        Ok(lock)
    }

    /// Lookup by id, expired or not.
    pub async fn find_by_id(&self, id: Uuid) -> RateLockResult<Option<RateLock>> {
        Ok(self.locks.find_by_id(id).await?)
    }

    // =========================================================================
    // cleanup_expired_locks
    // =========================================================================

    /// Delete every lock expiring strictly before `before`. Idempotent.
    pub async fn cleanup_expired_locks(&self, before: DateTime<Utc>) -> RateLockResult<u64> {
        let rows_deleted = self.locks.delete_expired_before(before).await?;

        if rows_deleted > 0 {
            info!(
                rows_deleted = rows_deleted,
                before = %before,
                "Cleaned up expired rate locks"
            );
        }

        Ok(rows_deleted)
    }

    /// Key under which locks for `pair` are stored
    fn pair_key(&self, raw: &str, parsed: &CurrencyPair) -> String {
        match self.config.pair_policy {
            PairPolicy::Raw => raw.to_string(),
            PairPolicy::Normalized => parsed.to_string(),
        }
    }
}

/// Shared rate lock manager
pub type SharedRateLockManager = Arc<RateLockManager>;
