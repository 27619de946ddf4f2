//! Rate Lock
//!
//! A short-lived commitment to an exchange rate for one user and pair.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{RateLockError, RateLockResult};

/// Fractional-second digits kept on lock timestamps (TIMESTAMPTZ resolution)
pub const TIMESTAMP_PRECISION: u16 = 6;

/// Lifecycle state of a persisted lock. Purged locks no longer exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Active,
    Expired,
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockState::Active => write!(f, "active"),
            LockState::Expired => write!(f, "expired"),
        }
    }
}

/// Stored rate lock.
///
/// # Invariants
/// - `locked_rate` and `expires_at` never change after creation
/// - At most one lock per `(user_id, pair)` is active, as far as sequential
///   callers are concerned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLock {
    pub id: Uuid,
    pub user_id: String,
    pub pair: String,
    pub locked_rate: Decimal,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RateLock {
    /// Build a new lock created at `now` and valid for `duration`.
    ///
    /// Timestamps are truncated to microseconds so the returned lock equals
    /// what the Postgres store reads back.
    ///
    /// # Errors
    /// - `RateLockError::DurationOutOfRange` if `now + duration` is not a
    ///   representable timestamp
    pub fn new(
        user_id: impl Into<String>,
        pair: impl Into<String>,
        locked_rate: Decimal,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> RateLockResult<Self> {
        let now = now.trunc_subsecs(TIMESTAMP_PRECISION);
        let expires_at = now
            .checked_add_signed(duration)
            .ok_or_else(|| {
                RateLockError::DurationOutOfRange(format!(
                    "{} ms from {}",
                    duration.num_milliseconds(),
                    now
                ))
            })?
            .trunc_subsecs(TIMESTAMP_PRECISION);

        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            pair: pair.into(),
            locked_rate,
            expires_at,
            created_at: now,
            updated_at: now,
        })
    }

    /// Valid strictly while `now < expires_at`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> LockState {
        if self.is_active_at(now) {
            LockState::Active
        } else {
            LockState::Expired
        }
    }

    /// Remaining validity, zero once expired.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        let remaining = self.expires_at.signed_duration_since(now);
        if remaining < Duration::zero() {
            Duration::zero()
        } else {
            remaining
        }
    }
}
