//! Domain Error Types
//!
//! Errors reported by rate lock operations.

use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by the rate lock manager.
///
/// Each kind is reported synchronously and never retried internally.
#[derive(Debug, Error)]
pub enum RateLockError {
    /// An unexpired lock already exists for the user and pair
    #[error("Active rate lock already exists for user {user_id} and currency pair {pair}")]
    Conflict { user_id: String, pair: String },

    /// Malformed input (pair string, user id)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Currency code has no record
    #[error("Currency not found: {0}")]
    CurrencyNotFound(String),

    /// A currency record is unusable for pricing
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Configured lock duration pushes expiry past the representable range
    #[error("Lock duration out of range: {0}")]
    DurationOutOfRange(String),

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for rate lock operations
pub type RateLockResult<T> = Result<T, RateLockError>;

impl RateLockError {
    /// Create a conflict error
    pub fn conflict(user_id: impl Into<String>, pair: impl Into<String>) -> Self {
        Self::Conflict {
            user_id: user_id.into(),
            pair: pair.into(),
        }
    }

    /// Check if this is a client error (caller's input or timing)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. } | Self::Validation(_) | Self::CurrencyNotFound(_)
        )
    }

    /// Check if this is a conflict error (retry after expiry may help)
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_error() {
        let err = RateLockError::conflict("user-1", "USD/NGN");

        assert!(err.is_client_error());
        assert!(err.is_conflict());
        assert!(err.to_string().contains("user-1"));
        assert!(err.to_string().contains("USD/NGN"));
    }

    #[test]
    fn test_data_integrity_is_not_client_error() {
        let err = RateLockError::DataIntegrity("NGN has no rate".to_string());

        assert!(!err.is_client_error());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_store_error_conversion() {
        let err: RateLockError = StoreError::Unavailable("down".to_string()).into();
        assert!(matches!(err, RateLockError::Store(_)));
        assert!(!err.is_client_error());
    }
}
