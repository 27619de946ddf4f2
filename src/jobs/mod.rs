//! Scheduled Jobs
//!
//! Periodic sweep that purges expired rate locks.
//! Runs are not mutually excluded; the delete is idempotent.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;
use tokio::time::interval;

use crate::domain::RateLockError;
use crate::manager::SharedRateLockManager;

// =========================================================================
// Expired Rate Lock Cleanup Job
// =========================================================================

/// Delete rate locks that expired more than `retention` ago
pub async fn cleanup_expired_rate_locks(
    manager: &SharedRateLockManager,
    retention: ChronoDuration,
) -> Result<u64, JobError> {
    let cutoff = manager.clock().now() - retention;
    let rows_deleted = manager.cleanup_expired_locks(cutoff).await?;
    Ok(rows_deleted)
}

// =========================================================================
// Job Scheduler
// =========================================================================

/// Configuration for job scheduler
#[derive(Debug, Clone)]
pub struct JobSchedulerConfig {
    /// Interval for rate lock cleanup (default: 5 minutes)
    pub rate_lock_cleanup_interval: Duration,
    /// How long expired locks are kept before purging (default: none)
    pub rate_lock_retention: ChronoDuration,
}

impl Default for JobSchedulerConfig {
    fn default() -> Self {
        Self {
            rate_lock_cleanup_interval: Duration::from_secs(300),
            rate_lock_retention: ChronoDuration::zero(),
        }
    }
}

/// Job Scheduler - runs periodic maintenance tasks
pub struct JobScheduler {
    manager: SharedRateLockManager,
    config: JobSchedulerConfig,
}

impl JobScheduler {
    /// Create a new job scheduler
    pub fn new(manager: SharedRateLockManager) -> Self {
        Self {
            manager,
            config: JobSchedulerConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(manager: SharedRateLockManager, config: JobSchedulerConfig) -> Self {
        Self { manager, config }
    }

    /// Start the job scheduler in the background
    /// Returns a handle that can be used to abort the scheduler
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the scheduler loop
    async fn run(&self) {
        tracing::info!(
            interval_secs = self.config.rate_lock_cleanup_interval.as_secs(),
            "Job scheduler started"
        );

        let mut cleanup_interval = interval(self.config.rate_lock_cleanup_interval);

        loop {
            cleanup_interval.tick().await;
            if let Err(e) =
                cleanup_expired_rate_locks(&self.manager, self.config.rate_lock_retention).await
            {
                tracing::error!(error = %e, "Rate lock cleanup failed");
            }
        }
    }

    /// Run all maintenance jobs once (for manual trigger or testing)
    pub async fn run_once(&self) -> MaintenanceReport {
        let mut report = MaintenanceReport::default();

        match cleanup_expired_rate_locks(&self.manager, self.config.rate_lock_retention).await {
            Ok(count) => report.rate_locks_deleted = count,
            Err(e) => report.errors.push(format!("Rate lock cleanup: {}", e)),
        }

        report.completed_at = self.manager.clock().now();
        report
    }
}

/// Report from running maintenance jobs
#[derive(Debug, Clone, Default)]
pub struct MaintenanceReport {
    pub rate_locks_deleted: u64,
    pub errors: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Job execution errors
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Rate lock error: {0}")]
    RateLock(#[from] RateLockError),
}

// =========================================================================
// Tests
// =========================================================================
