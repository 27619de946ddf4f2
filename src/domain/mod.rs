//! Domain module
//!
//! Core rate lock types and pricing rules.

pub mod currency;
pub mod error;
pub mod pair;
pub mod rate_lock;

pub use currency::{cross_rate, Currency};
pub use error::{RateLockError, RateLockResult};
pub use pair::{CurrencyPair, PairPolicy};
pub use rate_lock::{LockState, RateLock};
