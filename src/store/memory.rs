//! In-memory stores
//!
//! Process-local implementations used by tests and embedded deployments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{CurrencyStore, RateLockStore, StoreError};
use crate::domain::{Currency, RateLock};

/// Rate locks keyed by id. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateLockStore {
    locks: Arc<RwLock<HashMap<Uuid, RateLock>>>,
}

impl InMemoryRateLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.read().is_empty()
    }

    /// Snapshot of every stored lock
    pub fn all(&self) -> Vec<RateLock> {
        self.locks.read().values().cloned().collect()
    }
}

#[async_trait]
impl RateLockStore for InMemoryRateLockStore {
    async fn insert(&self, lock: &RateLock) -> Result<(), StoreError> {
        self.locks.write().insert(lock.id, lock.clone());
        Ok(())
    }

    async fn find_latest_active(
        &self,
        user_id: &str,
        pair: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RateLock>, StoreError> {
        let found = self
            .locks
            .read()
            .values()
            .filter(|lock| lock.user_id == user_id && lock.pair == pair)
            .filter(|lock| lock.expires_at > now)
            .max_by_key(|lock| lock.expires_at)
            .cloned();

        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RateLock>, StoreError> {
        Ok(self.locks.read().get(&id).cloned())
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut locks = self.locks.write();
        let before = locks.len();
        locks.retain(|_, lock| lock.expires_at >= cutoff);
        Ok((before - locks.len()) as u64)
    }
}

/// Currencies keyed by exact code
#[derive(Debug, Clone, Default)]
pub struct InMemoryCurrencyStore {
    currencies: Arc<RwLock<HashMap<String, Currency>>>,
}

impl InMemoryCurrencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currencies(currencies: impl IntoIterator<Item = Currency>) -> Self {
        let store = Self::new();
        for currency in currencies {
            store.upsert(currency);
        }
        store
    }

    pub fn upsert(&self, currency: Currency) {
        self.currencies
            .write()
            .insert(currency.code.clone(), currency);
    }
}

#[async_trait]
impl CurrencyStore for InMemoryCurrencyStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Currency>, StoreError> {
        Ok(self.currencies.read().get(code).cloned())
    }
}
