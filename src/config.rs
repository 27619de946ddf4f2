//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::PairPolicy;
use crate::jobs::JobSchedulerConfig;
use crate::manager::{RateLockConfig, DEFAULT_LOCK_DURATION_MS};

/// Longest accepted lock time-to-live (24 hours)
pub const MAX_LOCK_DURATION_MS: i64 = 86_400_000;

/// Longest accepted retention for expired locks (365 days)
pub const MAX_RETENTION_SECS: i64 = 31_536_000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Environment (development, production)
    pub environment: String,

    /// Rate lock time-to-live in milliseconds
    pub rate_lock_duration_ms: i64,

    /// Trim and uppercase pair strings before use
    pub normalize_pairs: bool,

    /// Seconds between expired lock sweeps
    pub cleanup_interval_secs: u64,

    /// Seconds an expired lock is kept before the sweep removes it
    pub retention_secs: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10)?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let rate_lock_duration_ms = parse_env("RATE_LOCK_DURATION_MS", DEFAULT_LOCK_DURATION_MS)?;
        let normalize_pairs = parse_env("RATE_LOCK_NORMALIZE_PAIRS", false)?;
        let cleanup_interval_secs = parse_env("RATE_LOCK_CLEANUP_INTERVAL_SECS", 300)?;
        let retention_secs = parse_env("RATE_LOCK_RETENTION_SECS", 0)?;

        let config = Self {
            database_url,
            database_max_connections,
            environment,
            rate_lock_duration_ms,
            normalize_pairs,
            cleanup_interval_secs,
            retention_secs,
        };
        config.validate()?;

        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_LOCK_DURATION_MS).contains(&self.rate_lock_duration_ms) {
            return Err(ConfigError::InvalidValue("RATE_LOCK_DURATION_MS"));
        }

        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue("RATE_LOCK_CLEANUP_INTERVAL_SECS"));
        }

        if !(0..=MAX_RETENTION_SECS).contains(&self.retention_secs) {
            return Err(ConfigError::InvalidValue("RATE_LOCK_RETENTION_SECS"));
        }

        Ok(())
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Settings injected into the rate lock manager
    pub fn rate_lock_config(&self) -> Result<RateLockConfig, ConfigError> {
        if self.rate_lock_duration_ms > MAX_LOCK_DURATION_MS {
            return Err(ConfigError::InvalidValue("RATE_LOCK_DURATION_MS"));
        }
        let lock_duration = chrono::Duration::try_milliseconds(self.rate_lock_duration_ms)
            .filter(|duration| *duration > chrono::Duration::zero())
            .ok_or(ConfigError::InvalidValue("RATE_LOCK_DURATION_MS"))?;

        Ok(RateLockConfig {
            lock_duration,
            pair_policy: if self.normalize_pairs {
                PairPolicy::Normalized
            } else {
                PairPolicy::Raw
            },
        })
    }

    /// Settings for the cleanup scheduler
    pub fn job_scheduler_config(&self) -> Result<JobSchedulerConfig, ConfigError> {
        if self.retention_secs > MAX_RETENTION_SECS {
            return Err(ConfigError::InvalidValue("RATE_LOCK_RETENTION_SECS"));
        }
        let rate_lock_retention = chrono::Duration::try_seconds(self.retention_secs)
            .filter(|retention| *retention >= chrono::Duration::zero())
            .ok_or(ConfigError::InvalidValue("RATE_LOCK_RETENTION_SECS"))?;

        Ok(JobSchedulerConfig {
            rate_lock_cleanup_interval: Duration::from_secs(self.cleanup_interval_secs),
            rate_lock_retention,
        })
    }
}

/// Read an optional variable, falling back to `default` when unset
fn parse_env<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            database_url: "postgres://localhost/fx".to_string(),
            database_max_connections: 10,
            environment: "production".to_string(),
            rate_lock_duration_ms: 1_500,
            normalize_pairs: true,
            cleanup_interval_secs: 60,
            retention_secs: 120,
        }
    }

    #[test]
    fn test_rate_lock_config_from_config() {
        let config = sample().rate_lock_config().unwrap();
        assert_eq!(config.lock_duration, chrono::Duration::milliseconds(1_500));
        assert_eq!(config.pair_policy, PairPolicy::Normalized);
    }

    #[test]
    fn test_job_scheduler_config_from_config() {
        let config = sample().job_scheduler_config().unwrap();
        assert_eq!(config.rate_lock_cleanup_interval, Duration::from_secs(60));
        assert_eq!(config.rate_lock_retention, chrono::Duration::seconds(120));
    }

    #[test]
    fn test_sample_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_lock_duration_out_of_range() {
        for ms in [0, -1, MAX_LOCK_DURATION_MS + 1, i64::MAX] {
            let config = Config {
                rate_lock_duration_ms: ms,
                ..sample()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidValue("RATE_LOCK_DURATION_MS"))),
                "duration {}",
                ms
            );
            assert!(config.rate_lock_config().is_err(), "duration {}", ms);
        }

        let config = Config {
            rate_lock_duration_ms: MAX_LOCK_DURATION_MS,
            ..sample()
        };
        assert!(config.validate().is_ok());
        assert_eq!(
            config.rate_lock_config().unwrap().lock_duration,
            chrono::Duration::hours(24)
        );
    }

    #[test]
    fn test_retention_out_of_range() {
        for secs in [-1, MAX_RETENTION_SECS + 1, i64::MAX] {
            let config = Config {
                retention_secs: secs,
                ..sample()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidValue("RATE_LOCK_RETENTION_SECS"))),
                "retention {}",
                secs
            );
            assert!(config.job_scheduler_config().is_err(), "retention {}", secs);
        }
    }

    #[test]
    fn test_zero_cleanup_interval_rejected() {
        let config = Config {
            cleanup_interval_secs: 0,
            ..sample()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        assert!(sample().is_production());
    }

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: i64 = parse_env("FX_RATE_LOCK_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
