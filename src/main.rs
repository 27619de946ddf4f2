//! fx_rate_lock - Rate lock maintenance worker
//!
//! Connects to the rate lock database and periodically purges expired locks.

use std::sync::Arc;

use fx_rate_lock::clock::SystemClock;
use fx_rate_lock::jobs::JobScheduler;
use fx_rate_lock::store::{PgCurrencyStore, PgRateLockStore};
use fx_rate_lock::{db, AppError, Config, RateLockManager};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fx_rate_lock=debug,sqlx=warn".into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.is_production());

    tracing::info!("Starting fx_rate_lock worker");
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    db::verify_connection(&pool).await?;
    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(AppError::SchemaIncomplete.into());
    }

    tracing::info!("Database connected successfully");

    let rate_lock_config = config.rate_lock_config()?;
    tracing::info!(
        lock_duration_ms = rate_lock_config.lock_duration.num_milliseconds(),
        pair_policy = ?rate_lock_config.pair_policy,
        "Rate lock manager configured"
    );

    let manager = Arc::new(RateLockManager::with_config(
        Arc::new(PgRateLockStore::new(pool.clone())),
        Arc::new(PgCurrencyStore::new(pool.clone())),
        Arc::new(SystemClock),
        rate_lock_config,
    ));

    let scheduler = JobScheduler::with_config(manager, config.job_scheduler_config()?);
    let handle = scheduler.start();

    shutdown_signal().await;

    // Cleanup
    tracing::info!("Worker shutting down...");
    handle.abort();
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
