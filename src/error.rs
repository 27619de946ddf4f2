//! Error handling module
//!
//! Application-level error aggregate for the service binary.

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    RateLock(#[from] crate::domain::RateLockError),

    #[error(transparent)]
    Job(#[from] crate::jobs::JobError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database schema incomplete, run migrations/0001_rate_locks.sql")]
    SchemaIncomplete,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Error code for structured logs
    pub fn error_code(&self) -> &'static str {
        use crate::domain::RateLockError;

        match self {
            AppError::RateLock(err) => match err {
                RateLockError::Conflict { .. } => "rate_lock_conflict",
                RateLockError::Validation(_) => "validation_error",
                RateLockError::CurrencyNotFound(_) => "currency_not_found",
                RateLockError::DataIntegrity(_) => "data_integrity_error",
                RateLockError::DurationOutOfRange(_) => "duration_out_of_range",
                RateLockError::Store(_) => "store_error",
            },
            AppError::Job(_) => "job_error",
            AppError::Database(_) => "database_error",
            AppError::SchemaIncomplete => "schema_incomplete",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
        }
    }
}
