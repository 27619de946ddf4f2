//! fx_rate_lock Library
//!
//! Time-boxed exchange rate commitments per user and currency pair.

pub mod clock;
pub mod domain;
pub mod jobs;
pub mod manager;
pub mod store;

pub mod config;
pub mod db;
mod error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use domain::{Currency, CurrencyPair, LockState, PairPolicy, RateLock, RateLockError, RateLockResult};
pub use error::{AppError, AppResult};
pub use manager::{RateLockConfig, RateLockManager, SharedRateLockManager};
